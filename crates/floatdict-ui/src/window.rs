use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use floatdict_capture::{HotkeyBindings, HotkeyManager};
use floatdict_config::Config;
use floatdict_types::{AppEvent, CaptureRegion, Point, RegionAction};
use slint::{ComponentHandle, ModelRc, PhysicalPosition, PhysicalSize, Timer, TimerMode, VecModel, Weak};
use windows::Win32::Foundation::POINT;
use windows::Win32::Graphics::Gdi::{GetMonitorInfoW, MONITOR_DEFAULTTONEAREST, MONITORINFO, MonitorFromPoint};
use windows::Win32::UI::Input::KeyboardAndMouse::{GetAsyncKeyState, VK_LBUTTON};
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetSystemMetrics, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN, SM_XVIRTUALSCREEN,
    SM_YVIRTUALSCREEN,
};

use crate::bridge::UiBridgeHandle;
use crate::format::{TooltipContent, startup_notice};
use crate::layout::{Size, max_tooltip_size, tooltip_geometry};
use crate::overlay::{ActionButtons, Modifiers, OverlayMode};
use crate::state::{UiFlow, UiState};
use crate::tray::Tray;

slint::include_modules!();

/// Horizontal padding inside the tooltip panel, logical px
const PANEL_PADDING: f32 = 24.0;

fn virtual_screen() -> CaptureRegion {
    unsafe {
        CaptureRegion::new(
            GetSystemMetrics(SM_XVIRTUALSCREEN),
            GetSystemMetrics(SM_YVIRTUALSCREEN),
            GetSystemMetrics(SM_CXVIRTUALSCREEN).max(0) as u32,
            GetSystemMetrics(SM_CYVIRTUALSCREEN).max(0) as u32,
        )
    }
}

/// Work area (taskbar excluded) of the monitor nearest to `point`
fn work_area_at(point: Point) -> CaptureRegion {
    unsafe {
        let monitor = MonitorFromPoint(POINT { x: point.x, y: point.y }, MONITOR_DEFAULTTONEAREST);
        let mut info = MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };
        if !GetMonitorInfoW(monitor, &mut info).as_bool() {
            return virtual_screen();
        }
        let r = info.rcWork;
        CaptureRegion::new(
            r.left,
            r.top,
            (r.right - r.left).max(0) as u32,
            (r.bottom - r.top).max(0) as u32,
        )
    }
}

fn cursor_position() -> Option<Point> {
    let mut point = POINT::default();
    unsafe { GetCursorPos(&mut point).ok()? };
    Some(Point::new(point.x, point.y))
}

fn left_button_down() -> bool {
    unsafe { (GetAsyncKeyState(VK_LBUTTON.0 as i32) as u16 & 0x8000) != 0 }
}

fn place(window: &slint::Window, region: CaptureRegion) {
    window.set_position(PhysicalPosition::new(region.x, region.y));
    window.set_size(PhysicalSize::new(region.width.max(1), region.height.max(1)));
}

/// Weak handles to every window, cheap to clone into callbacks
#[derive(Clone)]
struct Views {
    tooltip: Weak<TooltipWindow>,
    highlight: Weak<HighlightWindow>,
    overlay: Weak<OverlayWindow>,
    /// Physical origin of the overlay, which spans the virtual screen
    overlay_origin: Rc<Cell<Point>>,
    overlay_shown: Rc<Cell<bool>>,
    /// Last tooltip rectangle on screen, for click-away detection
    tooltip_rect: Rc<Cell<Option<CaptureRegion>>>,
    fade_ms: u64,
}

impl Views {
    fn overlay_to_screen(&self, x: f32, y: f32) -> Option<Point> {
        let overlay = self.overlay.upgrade()?;
        let scale = overlay.window().scale_factor();
        let origin = self.overlay_origin.get();
        Some(Point::new(
            origin.x + (x * scale).round() as i32,
            origin.y + (y * scale).round() as i32,
        ))
    }

    /// Overlay-local logical length for a physical screen distance
    fn logical(&self, overlay: &OverlayWindow, physical: i32) -> f32 {
        physical as f32 / overlay.window().scale_factor()
    }

    fn render_overlay(&self, state: &UiState) {
        let Some(overlay) = self.overlay.upgrade() else {
            return;
        };
        if !state.overlay().is_interactive() {
            if self.overlay_shown.replace(false) {
                overlay.hide().ok();
            }
            return;
        }

        if !self.overlay_shown.replace(true) {
            let screen = virtual_screen();
            self.overlay_origin.set(screen.top_left());
            place(overlay.window(), screen);
            overlay.set_has_selection(false);
            overlay.show().ok();
        }
        let origin = self.overlay_origin.get();

        let mode = state.overlay().mode();
        let frame = match mode {
            OverlayMode::WordSelection(picker) => Some(picker.region()),
            _ => state.overlay().selection(),
        };
        match frame {
            Some(frame) => {
                overlay.set_has_selection(true);
                overlay.set_sel_x(self.logical(&overlay, frame.x - origin.x));
                overlay.set_sel_y(self.logical(&overlay, frame.y - origin.y));
                overlay.set_sel_width(self.logical(&overlay, frame.width as i32));
                overlay.set_sel_height(self.logical(&overlay, frame.height as i32));
            }
            None => overlay.set_has_selection(false),
        }

        match mode {
            OverlayMode::AwaitingAction { region, hovered } => {
                let buttons = ActionButtons::below(*region);
                overlay.set_show_actions(true);
                overlay.set_all_x(self.logical(&overlay, buttons.translate_all.x - origin.x));
                overlay.set_words_x(self.logical(&overlay, buttons.select_words.x - origin.x));
                overlay.set_buttons_y(self.logical(&overlay, buttons.translate_all.y - origin.y));
                overlay.set_button_width(self.logical(&overlay, buttons.translate_all.width as i32));
                overlay.set_button_height(self.logical(&overlay, buttons.translate_all.height as i32));
                overlay.set_hovered_action(match hovered {
                    None => 0,
                    Some(RegionAction::TranslateAll) => 1,
                    Some(RegionAction::SelectWords) => 2,
                });
            }
            _ => overlay.set_show_actions(false),
        }

        match mode {
            OverlayMode::WordSelection(picker) => {
                let marks: Vec<WordMark> = picker
                    .words()
                    .iter()
                    .enumerate()
                    .map(|(i, word)| WordMark {
                        x: self.logical(&overlay, word.region.x - origin.x),
                        y: self.logical(&overlay, word.region.y - origin.y),
                        width: self.logical(&overlay, word.region.width as i32),
                        height: self.logical(&overlay, word.region.height as i32),
                        state: if picker.is_selected(i) {
                            2
                        } else if picker.hovered() == Some(i) {
                            1
                        } else {
                            0
                        },
                    })
                    .collect();
                overlay.set_picking(true);
                overlay.set_words(ModelRc::new(VecModel::from(marks)));
            }
            _ => {
                overlay.set_picking(false);
                overlay.set_words(ModelRc::default());
            }
        }
    }

    fn render_highlight(&self, state: &UiState) {
        let Some(highlight) = self.highlight.upgrade() else {
            return;
        };
        match state.overlay().mode() {
            OverlayMode::Highlight(region) => {
                place(highlight.window(), *region);
                highlight.show().ok();
            }
            _ => {
                highlight.hide().ok();
            }
        }
    }

    fn render_tooltip(&self, state: &UiState) {
        let Some(window) = self.tooltip.upgrade() else {
            return;
        };
        let Some(tooltip) = state.tooltip() else {
            window.set_shown(false);
            window.hide().ok();
            self.tooltip_rect.set(None);
            return;
        };

        let anchor = tooltip.anchor.point();
        let work_area = work_area_at(anchor);
        let scale = window.window().scale_factor();
        let max = max_tooltip_size(&work_area);

        window.set_fade(self.fade_ms as i64);
        window.set_max_text_width((max.width as f32 / scale - PANEL_PADDING).max(50.0));
        window.set_lines(lines_model(&tooltip.content));

        let content = Size::new(
            (window.get_content_width() * scale).ceil() as u32,
            (window.get_content_height() * scale).ceil() as u32,
        );
        let rect = tooltip_geometry(anchor, content, &work_area);
        place(window.window(), rect);
        self.tooltip_rect.set(Some(rect));

        window.show().ok();
        window.set_shown(true);
    }

    fn render(&self, state: &UiState) {
        self.render_overlay(state);
        self.render_highlight(state);
        self.render_tooltip(state);
    }
}

fn lines_model(content: &TooltipContent) -> ModelRc<StyledLine> {
    let lines: Vec<StyledLine> = content
        .lines
        .iter()
        .map(|line| StyledLine {
            text: line.text.as_str().into(),
            kind: line.kind.as_index(),
        })
        .collect();
    ModelRc::new(VecModel::from(lines))
}

/// Redraws after an overlay callback and forwards what it produced
fn dispatch(views: &Views, state: &Rc<RefCell<UiState>>, handle: &UiBridgeHandle, event: Option<AppEvent>) {
    views.render(&state.borrow());
    if let Some(event) = event {
        handle.send(event);
    }
}

fn wire_overlay(overlay: &OverlayWindow, views: &Views, state: &Rc<RefCell<UiState>>, handle: &Rc<UiBridgeHandle>) {
    {
        let (views, state, handle) = (views.clone(), state.clone(), handle.clone());
        overlay.on_pressed(move |x, y, shift, ctrl| {
            let Some(point) = views.overlay_to_screen(x, y) else {
                return;
            };
            let event = state.borrow_mut().pointer_pressed(point, Modifiers { shift, ctrl });
            dispatch(&views, &state, &handle, event);
        });
    }
    {
        let (views, state) = (views.clone(), state.clone());
        overlay.on_moved(move |x, y| {
            if let Some(point) = views.overlay_to_screen(x, y) {
                state.borrow_mut().pointer_moved(point);
                views.render_overlay(&state.borrow());
            }
        });
    }
    {
        let (views, state, handle) = (views.clone(), state.clone(), handle.clone());
        overlay.on_released(move |x, y, shift, ctrl| {
            let Some(point) = views.overlay_to_screen(x, y) else {
                return;
            };
            let event = state.borrow_mut().pointer_released(point, Modifiers { shift, ctrl });
            dispatch(&views, &state, &handle, event);
        });
    }
    {
        let (views, state, handle) = (views.clone(), state.clone(), handle.clone());
        overlay.on_confirmed(move || {
            let event = state.borrow_mut().confirm_selection();
            dispatch(&views, &state, &handle, event);
        });
    }
    {
        let (views, state, handle) = (views.clone(), state.clone(), handle.clone());
        overlay.on_aborted(move || {
            let event = state.borrow_mut().abort_selection();
            dispatch(&views, &state, &handle, event);
        });
    }
}

pub fn run(config: &Config, handle: UiBridgeHandle) -> anyhow::Result<()> {
    // Hotkeys and tray need this thread's message pump
    let bindings = HotkeyBindings::from_config(&config.hotkeys)?;
    let hotkeys = RefCell::new(HotkeyManager::new(&bindings)?);
    let tray = Tray::new()?;

    let tooltip = TooltipWindow::new()?;
    let highlight = HighlightWindow::new()?;
    let overlay = OverlayWindow::new()?;

    let views = Views {
        tooltip: tooltip.as_weak(),
        highlight: highlight.as_weak(),
        overlay: overlay.as_weak(),
        overlay_origin: Rc::new(Cell::new(Point::default())),
        overlay_shown: Rc::new(Cell::new(false)),
        tooltip_rect: Rc::new(Cell::new(None)),
        fade_ms: config.ui.fade_ms,
    };
    let state = Rc::new(RefCell::new(UiState::new(&config.ui)));
    let handle = Rc::new(handle);

    wire_overlay(&overlay, &views, &state, &handle);

    if config.ui.show_startup_notification {
        let corner = work_area_at(Point::default());
        let at = Point::new(corner.right(), corner.bottom());
        state
            .borrow_mut()
            .show_notice(startup_notice(&config.hotkeys), at, Instant::now());
        views.render(&state.borrow());
    }

    let mouse_was_down = Cell::new(false);
    let timer = Timer::default();
    {
        let (views, state, handle) = (views.clone(), state.clone(), handle.clone());
        timer.start(
            TimerMode::Repeated,
            Duration::from_millis(config.poll_interval_ms.max(1)),
            move || {
                let mut changed = false;

                loop {
                    match handle.to_ui_rx.try_recv() {
                        Ok(Some(event)) => {
                            changed = true;
                            if state.borrow_mut().apply(event, Instant::now()) == UiFlow::Exit {
                                views.render(&state.borrow());
                                slint::quit_event_loop().ok();
                                return;
                            }
                        }
                        Ok(None) => break,
                        Err(_) => {
                            tracing::info!("[SLINT] Backend channel closed");
                            slint::quit_event_loop().ok();
                            return;
                        }
                    }
                }

                if let Some(action) = hotkeys.borrow().poll() {
                    tracing::debug!("[SLINT] Hotkey {:?}", action);
                    handle.send(AppEvent::Hotkey(action));
                }
                if let Some(action) = tray.poll() {
                    handle.send(AppEvent::Hotkey(action));
                }

                if let Some(event) = state.borrow_mut().tick(Instant::now()) {
                    changed = true;
                    handle.send(event);
                }

                // Press outside the tooltip hides it
                let down = left_button_down();
                if down && !mouse_was_down.get() {
                    let inside = match (views.tooltip_rect.get(), cursor_position()) {
                        (Some(rect), Some(cursor)) => rect.contains(cursor),
                        _ => true,
                    };
                    if !inside && let Some(event) = state.borrow_mut().click_away() {
                        changed = true;
                        handle.send(event);
                    }
                }
                mouse_was_down.set(down);

                if changed {
                    views.render(&state.borrow());
                }
                hotkeys
                    .borrow_mut()
                    .set_cancel_armed(state.borrow().cancel_armed());
            },
        );
    }

    tracing::info!("[SLINT] Event loop starting");
    slint::run_event_loop_until_quit()?;
    tracing::info!("[SLINT] Event loop finished");

    Ok(())
}
