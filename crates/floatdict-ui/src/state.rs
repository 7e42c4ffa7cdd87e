use std::time::{Duration, Instant};

use floatdict_config::ui::UiConfig;
use floatdict_types::{Anchor, AppEvent, Point, UiEvent};
use uuid::Uuid;

use crate::format::{NO_TEXT, TooltipContent};
use crate::overlay::{Modifiers, OverlayModel, SelectionOutcome};

#[derive(Debug, Clone)]
pub struct TooltipState {
    /// `None` for notices not tied to a capture
    pub request_id: Option<Uuid>,
    pub anchor: Anchor,
    pub content: TooltipContent,
    pub shown_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiFlow {
    Continue,
    Exit,
}

/// Everything on screen, independent of the toolkit drawing it
pub struct UiState {
    overlay: OverlayModel,
    /// Request the overlay's current drag or word picking belongs to
    selection_id: Option<Uuid>,
    tooltip: Option<TooltipState>,
    timeout: Duration,
}

impl UiState {
    pub fn new(config: &UiConfig) -> Self {
        Self {
            overlay: OverlayModel::default(),
            selection_id: None,
            tooltip: None,
            timeout: Duration::from_millis(config.tooltip_timeout_ms),
        }
    }

    pub fn overlay(&self) -> &OverlayModel {
        &self.overlay
    }

    pub fn tooltip(&self) -> Option<&TooltipState> {
        self.tooltip.as_ref()
    }

    /// Esc is only needed while something is on screen
    pub fn cancel_armed(&self) -> bool {
        self.overlay.is_visible() || self.tooltip.is_some()
    }

    fn show(&mut self, request_id: Option<Uuid>, anchor: Anchor, content: TooltipContent, now: Instant) {
        match anchor.highlight() {
            Some(region) => self.overlay.highlight(region),
            None if !self.overlay.is_interactive() => self.overlay.hide(),
            None => {}
        }
        self.tooltip = Some(TooltipState {
            request_id,
            anchor,
            content,
            shown_at: now,
        });
    }

    fn hide_all(&mut self) {
        self.tooltip = None;
        self.selection_id = None;
        self.overlay.hide();
    }

    pub fn show_notice(&mut self, content: TooltipContent, at: Point, now: Instant) {
        self.show(None, Anchor::Cursor(at), content, now);
    }

    pub fn apply(&mut self, event: AppEvent, now: Instant) -> UiFlow {
        match event {
            AppEvent::BackendReady => {
                tracing::info!("[UI] Backend ready");
            }
            AppEvent::EnterRegionSelection { request_id } => {
                self.tooltip = None;
                self.selection_id = Some(request_id);
                self.overlay.enter_selection();
                tracing::debug!("[UI] Region selection started for {}", request_id);
            }
            AppEvent::EnterWordSelection {
                request_id,
                region,
                words,
            } => {
                tracing::debug!("[UI] Picking from {} words for {}", words.len(), request_id);
                self.tooltip = None;
                self.selection_id = Some(request_id);
                self.overlay.enter_word_selection(region, words);
            }
            AppEvent::ShowStatus {
                request_id,
                anchor,
                status,
            } => {
                self.show(Some(request_id), anchor, TooltipContent::status(&status), now);
            }
            AppEvent::ShowResult {
                request_id,
                anchor,
                result,
            } => {
                tracing::debug!("[UI] Showing {} entries for '{}'", result.entries.len(), result.query);
                self.show(Some(request_id), anchor, TooltipContent::from_result(&result), now);
            }
            AppEvent::ShowNoText { request_id, anchor } => {
                self.show(Some(request_id), anchor, TooltipContent::message(NO_TEXT), now);
            }
            AppEvent::ShowError {
                request_id,
                anchor,
                message,
            } => {
                self.show(Some(request_id), anchor, TooltipContent::message(&message), now);
            }
            AppEvent::UiEvent(UiEvent::Hide) => {
                self.hide_all();
                tracing::debug!("[UI] Hidden");
            }
            AppEvent::UiEvent(UiEvent::Close) => {
                self.hide_all();
                return UiFlow::Exit;
            }
            AppEvent::Hotkey(_)
            | AppEvent::RegionSelected { .. }
            | AppEvent::WordsSelected { .. }
            | AppEvent::SelectionAborted(_)
            | AppEvent::Dismissed(_) => {
                tracing::trace!("[UI] Ignoring backend-bound event");
            }
        }
        UiFlow::Continue
    }

    fn dismiss(&mut self) -> Option<AppEvent> {
        let tooltip = self.tooltip.take()?;
        if !self.overlay.is_interactive() {
            self.overlay.hide();
        }
        tooltip.request_id.map(AppEvent::Dismissed)
    }

    /// Auto-hides finished tooltips once the timeout has passed
    pub fn tick(&mut self, now: Instant) -> Option<AppEvent> {
        let expired = self.tooltip.as_ref().is_some_and(|t| {
            t.content.transient && now.saturating_duration_since(t.shown_at) >= self.timeout
        });
        if expired { self.dismiss() } else { None }
    }

    /// Click outside the tooltip; pending status stays up
    pub fn click_away(&mut self) -> Option<AppEvent> {
        if self.tooltip.as_ref().is_some_and(|t| t.content.transient) {
            self.dismiss()
        } else {
            None
        }
    }

    /// Tags an overlay outcome with the request it answers
    fn selection_event(&mut self, outcome: Option<SelectionOutcome>) -> Option<AppEvent> {
        let outcome = outcome?;
        let Some(request_id) = self.selection_id.take() else {
            tracing::warn!("[UI] Selection finished without a request, dropping {:?}", outcome);
            return None;
        };
        Some(match outcome {
            SelectionOutcome::Selected { region, action } => AppEvent::RegionSelected {
                request_id,
                region,
                action,
            },
            SelectionOutcome::WordsPicked(words) => AppEvent::WordsSelected { request_id, words },
            SelectionOutcome::Aborted => AppEvent::SelectionAborted(request_id),
        })
    }

    pub fn pointer_pressed(&mut self, point: Point, modifiers: Modifiers) -> Option<AppEvent> {
        let outcome = self.overlay.press(point, modifiers);
        self.selection_event(outcome)
    }

    pub fn pointer_moved(&mut self, point: Point) {
        self.overlay.drag(point);
    }

    pub fn pointer_released(&mut self, point: Point, modifiers: Modifiers) -> Option<AppEvent> {
        let outcome = self.overlay.release(point, modifiers);
        self.selection_event(outcome)
    }

    /// Enter finishes word picking
    pub fn confirm_selection(&mut self) -> Option<AppEvent> {
        let outcome = self.overlay.confirm();
        self.selection_event(outcome)
    }

    pub fn abort_selection(&mut self) -> Option<AppEvent> {
        let outcome = self.overlay.abort();
        self.selection_event(outcome)
    }
}

#[cfg(test)]
mod tests {
    use floatdict_types::{CaptureMode, CaptureRegion, RegionAction, TranslationResult, WordBox};

    use super::*;
    use crate::format::LOADING;
    use crate::overlay::OverlayMode;

    fn ui() -> UiState {
        UiState::new(&UiConfig {
            tooltip_timeout_ms: 1_000,
            ..UiConfig::default()
        })
    }

    fn word_anchor() -> Anchor {
        Anchor::Word(CaptureRegion::new(10, 10, 40, 20))
    }

    fn result() -> TranslationResult {
        TranslationResult {
            query: "run".to_string(),
            mode: CaptureMode::Word,
            source_lang: "en".to_string(),
            detected_lang: None,
            target_lang: "th".to_string(),
            entries: Vec::new(),
            failures: Vec::new(),
            consulted: Vec::new(),
        }
    }

    #[test]
    fn test_status_then_result_highlights_word() {
        let mut ui = ui();
        let id = Uuid::new_v4();
        let now = Instant::now();

        ui.apply(
            AppEvent::ShowStatus {
                request_id: id,
                anchor: word_anchor(),
                status: LOADING.to_string(),
            },
            now,
        );
        assert_eq!(*ui.overlay().mode(), OverlayMode::Highlight(CaptureRegion::new(10, 10, 40, 20)));
        assert!(ui.cancel_armed());

        // Status never times out
        assert!(ui.tick(now + Duration::from_secs(60)).is_none());

        ui.apply(
            AppEvent::ShowResult {
                request_id: id,
                anchor: word_anchor(),
                result: result(),
            },
            now,
        );
        assert!(ui.tick(now + Duration::from_millis(500)).is_none());
        assert!(matches!(
            ui.tick(now + Duration::from_millis(1_000)),
            Some(AppEvent::Dismissed(dismissed)) if dismissed == id
        ));
        assert!(ui.tooltip().is_none());
        assert!(!ui.cancel_armed());
    }

    #[test]
    fn test_click_away_dismisses_finished_tooltip_only() {
        let mut ui = ui();
        let id = Uuid::new_v4();
        let now = Instant::now();

        ui.apply(
            AppEvent::ShowStatus {
                request_id: id,
                anchor: word_anchor(),
                status: LOADING.to_string(),
            },
            now,
        );
        assert!(ui.click_away().is_none());

        ui.apply(AppEvent::ShowNoText { request_id: id, anchor: word_anchor() }, now);
        assert!(matches!(ui.click_away(), Some(AppEvent::Dismissed(_))));
    }

    const NONE: Modifiers = Modifiers::NONE;

    #[test]
    fn test_region_selection_round_trip() {
        let mut ui = ui();
        let id = Uuid::new_v4();
        ui.apply(AppEvent::EnterRegionSelection { request_id: id }, Instant::now());
        assert!(ui.cancel_armed());

        assert!(ui.pointer_pressed(Point::new(100, 100), NONE).is_none());
        ui.pointer_moved(Point::new(150, 130));
        assert!(ui.pointer_released(Point::new(200, 160), NONE).is_none());
        assert!(ui.cancel_armed());

        // "Translate All" sits left of "Select Words" under the region
        assert!(matches!(
            ui.pointer_pressed(Point::new(50, 180), NONE),
            Some(AppEvent::RegionSelected { request_id, region, action: RegionAction::TranslateAll })
                if request_id == id && region == CaptureRegion::new(100, 100, 100, 60)
        ));
        assert!(!ui.cancel_armed());
    }

    #[test]
    fn test_abort_selection_names_request() {
        let mut ui = ui();
        let id = Uuid::new_v4();
        ui.apply(AppEvent::EnterRegionSelection { request_id: id }, Instant::now());
        assert!(matches!(ui.abort_selection(), Some(AppEvent::SelectionAborted(aborted)) if aborted == id));
        assert!(ui.abort_selection().is_none());
    }

    #[test]
    fn test_word_picking_reports_words_for_request() {
        let mut ui = ui();
        let id = Uuid::new_v4();
        let words = vec![
            WordBox {
                text: "hello".to_string(),
                region: CaptureRegion::new(0, 0, 40, 20),
                confidence: 90.0,
                line_key: (1, 1, 1),
            },
            WordBox {
                text: "world".to_string(),
                region: CaptureRegion::new(50, 0, 40, 20),
                confidence: 90.0,
                line_key: (1, 1, 1),
            },
        ];
        ui.apply(
            AppEvent::EnterWordSelection {
                request_id: id,
                region: CaptureRegion::new(0, 0, 100, 30),
                words: words.clone(),
            },
            Instant::now(),
        );
        assert!(ui.cancel_armed());

        // A late status must not pull the overlay out of picking
        ui.apply(
            AppEvent::ShowStatus {
                request_id: id,
                anchor: word_anchor(),
                status: LOADING.to_string(),
            },
            Instant::now(),
        );
        assert!(matches!(ui.overlay().mode(), OverlayMode::WordSelection(_)));

        ui.pointer_pressed(Point::new(10, 10), NONE);
        ui.pointer_moved(Point::new(60, 10));
        match ui.pointer_released(Point::new(60, 10), NONE) {
            Some(AppEvent::WordsSelected { request_id, words: picked }) => {
                assert_eq!(request_id, id);
                assert_eq!(picked, words);
            }
            other => panic!("Wrong event: {other:?}"),
        }
        assert!(ui.confirm_selection().is_none());
    }

    #[test]
    fn test_hide_and_close() {
        let mut ui = ui();
        let now = Instant::now();
        ui.apply(
            AppEvent::ShowError {
                request_id: Uuid::new_v4(),
                anchor: Anchor::Cursor(Point::new(5, 5)),
                message: "tesseract failed".to_string(),
            },
            now,
        );
        assert_eq!(ui.apply(AppEvent::UiEvent(UiEvent::Hide), now), UiFlow::Continue);
        assert!(!ui.cancel_armed());
        assert_eq!(ui.apply(AppEvent::UiEvent(UiEvent::Close), now), UiFlow::Exit);
    }

    #[test]
    fn test_notice_times_out_without_dismissal_event() {
        let mut ui = ui();
        let now = Instant::now();
        ui.show_notice(TooltipContent::notice("FloatingDictionary", &[]), Point::new(0, 0), now);
        assert!(ui.tooltip().is_some());
        assert!(ui.tick(now + Duration::from_secs(2)).is_none());
        assert!(ui.tooltip().is_none());
    }
}
