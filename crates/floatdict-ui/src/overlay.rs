use floatdict_capture::reading_order;
use floatdict_types::{CaptureRegion, Point, RegionAction, WordBox};

/// Drags no larger than this on either side abort the selection
pub const MIN_SELECTION: u32 = 5;

const BUTTON_WIDTH: u32 = 100;
const BUTTON_HEIGHT: u32 = 30;
const BUTTON_GAP: i32 = 5;

/// Keyboard modifiers held during a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
    };

    fn any(self) -> bool {
        self.shift || self.ctrl
    }
}

/// "Translate All" and "Select Words", right-aligned under the region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionButtons {
    pub translate_all: CaptureRegion,
    pub select_words: CaptureRegion,
}

impl ActionButtons {
    pub fn below(region: CaptureRegion) -> Self {
        let y = region.bottom() + BUTTON_GAP;
        let select_x = region.right() - BUTTON_WIDTH as i32;
        Self {
            translate_all: CaptureRegion::new(
                select_x - BUTTON_GAP - BUTTON_WIDTH as i32,
                y,
                BUTTON_WIDTH,
                BUTTON_HEIGHT,
            ),
            select_words: CaptureRegion::new(select_x, y, BUTTON_WIDTH, BUTTON_HEIGHT),
        }
    }

    pub fn at(&self, point: Point) -> Option<RegionAction> {
        if self.translate_all.contains(point) {
            Some(RegionAction::TranslateAll)
        } else if self.select_words.contains(point) {
            Some(RegionAction::SelectWords)
        } else {
            None
        }
    }
}

/// Word-by-word selection over a pre-read region, like selecting text in an editor
#[derive(Debug, Clone, PartialEq)]
pub struct WordPicker {
    region: CaptureRegion,
    words: Vec<WordBox>,
    selected: Vec<usize>,
    /// Start of shift-click ranges and drags
    anchor: Option<usize>,
    hovered: Option<usize>,
    dragging: bool,
}

impl WordPicker {
    fn new(region: CaptureRegion, words: Vec<WordBox>) -> Self {
        Self {
            region,
            words,
            selected: Vec::new(),
            anchor: None,
            hovered: None,
            dragging: false,
        }
    }

    fn index_at(&self, point: Point) -> Option<usize> {
        self.words.iter().position(|w| w.region.contains(point))
    }

    fn select_range(&mut self, from: usize, to: usize) {
        let (start, end) = if from <= to { (from, to) } else { (to, from) };
        self.selected = (start..=end).collect();
    }

    pub fn region(&self) -> CaptureRegion {
        self.region
    }

    pub fn words(&self) -> &[WordBox] {
        &self.words
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn selected_words(&self) -> Vec<WordBox> {
        let mut indices = self.selected.clone();
        indices.sort_unstable();
        indices.into_iter().map(|i| self.words[i].clone()).collect()
    }

    fn press(&mut self, point: Point, modifiers: Modifiers) {
        let Some(index) = self.index_at(point) else {
            return;
        };
        match (modifiers, self.anchor) {
            (Modifiers { shift: true, .. }, Some(anchor)) => self.select_range(anchor, index),
            (Modifiers { ctrl: true, .. }, _) => {
                match self.selected.iter().position(|&i| i == index) {
                    Some(pos) => {
                        self.selected.remove(pos);
                    }
                    None => self.selected.push(index),
                }
                self.anchor = Some(index);
            }
            _ => {
                self.selected = vec![index];
                self.anchor = Some(index);
                self.dragging = true;
            }
        }
    }

    fn hover(&mut self, point: Point) {
        self.hovered = self.index_at(point);
        if let (true, Some(anchor), Some(index)) = (self.dragging, self.anchor, self.hovered) {
            self.select_range(anchor, index);
        }
    }

    /// Picked words in reading order
    fn finish(&self) -> Vec<WordBox> {
        reading_order(self.selected_words()).into_iter().flatten().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum OverlayMode {
    #[default]
    Hidden,
    /// Drag-to-select; `origin` is set once the button goes down
    RegionSelection {
        origin: Option<Point>,
        current: Point,
    },
    /// Region dragged; waiting for the user to choose what to do with it
    AwaitingAction {
        region: CaptureRegion,
        hovered: Option<RegionAction>,
    },
    WordSelection(WordPicker),
    Highlight(CaptureRegion),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    Selected {
        region: CaptureRegion,
        action: RegionAction,
    },
    WordsPicked(Vec<WordBox>),
    Aborted,
}

#[derive(Debug, Default)]
pub struct OverlayModel {
    mode: OverlayMode,
}

impl OverlayModel {
    pub fn mode(&self) -> &OverlayMode {
        &self.mode
    }

    pub fn is_visible(&self) -> bool {
        self.mode != OverlayMode::Hidden
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self.mode, OverlayMode::RegionSelection { .. })
    }

    /// The user is still dragging, choosing or picking; highlights wait
    pub fn is_interactive(&self) -> bool {
        matches!(
            self.mode,
            OverlayMode::RegionSelection { .. }
                | OverlayMode::AwaitingAction { .. }
                | OverlayMode::WordSelection(_)
        )
    }

    pub fn enter_selection(&mut self) {
        self.mode = OverlayMode::RegionSelection {
            origin: None,
            current: Point::default(),
        };
    }

    pub fn enter_word_selection(&mut self, region: CaptureRegion, words: Vec<WordBox>) {
        self.mode = OverlayMode::WordSelection(WordPicker::new(region, words));
    }

    pub fn highlight(&mut self, region: CaptureRegion) {
        if !self.is_interactive() {
            self.mode = OverlayMode::Highlight(region);
        }
    }

    pub fn hide(&mut self) {
        self.mode = OverlayMode::Hidden;
    }

    pub fn press(&mut self, point: Point, modifiers: Modifiers) -> Option<SelectionOutcome> {
        match &mut self.mode {
            OverlayMode::RegionSelection { .. } => {
                self.mode = OverlayMode::RegionSelection {
                    origin: Some(point),
                    current: point,
                };
                None
            }
            OverlayMode::AwaitingAction { region, .. } => {
                let region = *region;
                let action = ActionButtons::below(region).at(point)?;
                tracing::debug!("[UI] {:?} chosen for {:?}", action, region);
                self.mode = OverlayMode::Hidden;
                Some(SelectionOutcome::Selected { region, action })
            }
            OverlayMode::WordSelection(picker) => {
                picker.press(point, modifiers);
                None
            }
            OverlayMode::Hidden | OverlayMode::Highlight(_) => None,
        }
    }

    /// Pointer moved: extends a drag or updates hover feedback
    pub fn drag(&mut self, point: Point) -> Option<CaptureRegion> {
        match &mut self.mode {
            OverlayMode::RegionSelection { origin, .. } => {
                let origin = *origin;
                self.mode = OverlayMode::RegionSelection {
                    origin,
                    current: point,
                };
                self.selection()
            }
            OverlayMode::AwaitingAction { region, hovered } => {
                *hovered = ActionButtons::below(*region).at(point);
                None
            }
            OverlayMode::WordSelection(picker) => {
                picker.hover(point);
                None
            }
            OverlayMode::Hidden | OverlayMode::Highlight(_) => None,
        }
    }

    pub fn selection(&self) -> Option<CaptureRegion> {
        match self.mode {
            OverlayMode::RegionSelection {
                origin: Some(origin),
                current,
            } => Some(CaptureRegion::from_corners(origin, current)),
            OverlayMode::AwaitingAction { region, .. } => Some(region),
            _ => None,
        }
    }

    /// Ends a drag. A usable region moves on to the action choice; a picked
    /// set of words is handed back unless a modifier keeps the picking open.
    pub fn release(&mut self, point: Point, modifiers: Modifiers) -> Option<SelectionOutcome> {
        match &mut self.mode {
            OverlayMode::RegionSelection { origin, .. } => {
                let Some(origin) = *origin else {
                    self.mode = OverlayMode::Hidden;
                    return Some(SelectionOutcome::Aborted);
                };
                let region = CaptureRegion::from_corners(origin, point);
                if region.width <= MIN_SELECTION || region.height <= MIN_SELECTION {
                    tracing::debug!("Selection {:?} too small, aborting", region);
                    self.mode = OverlayMode::Hidden;
                    return Some(SelectionOutcome::Aborted);
                }
                self.mode = OverlayMode::AwaitingAction {
                    region,
                    hovered: None,
                };
                None
            }
            OverlayMode::WordSelection(picker) => {
                picker.dragging = false;
                if modifiers.any() {
                    return None;
                }
                self.confirm()
            }
            _ => None,
        }
    }

    /// Enter while picking words
    pub fn confirm(&mut self) -> Option<SelectionOutcome> {
        let OverlayMode::WordSelection(picker) = &self.mode else {
            return None;
        };
        let words = picker.finish();
        self.mode = OverlayMode::Hidden;
        Some(SelectionOutcome::WordsPicked(words))
    }

    /// Esc or right click while dragging, choosing or picking
    pub fn abort(&mut self) -> Option<SelectionOutcome> {
        if !self.is_interactive() {
            return None;
        }
        self.mode = OverlayMode::Hidden;
        Some(SelectionOutcome::Aborted)
    }
}
