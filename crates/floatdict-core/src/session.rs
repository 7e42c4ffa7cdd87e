use floatdict_types::CaptureMode;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    /// Waiting for the user to drag a region
    Selecting { id: Uuid },
    /// Capture, OCR and lookup running
    Processing { id: Uuid },
    /// Region read; waiting for the user to pick words from it
    Picking { id: Uuid },
    /// Tooltip on screen
    Showing { id: Uuid },
}

impl SessionState {
    pub fn id(&self) -> Option<Uuid> {
        match self {
            Self::Idle => None,
            Self::Selecting { id }
            | Self::Processing { id }
            | Self::Picking { id }
            | Self::Showing { id } => Some(*id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("capture {0} still in progress")]
    Busy(Uuid),
    #[error("not waiting for a region")]
    NotSelecting,
    #[error("not waiting for picked words")]
    NotPicking,
    #[error("request {0} is no longer active")]
    Stale(Uuid),
}

/// Tracks the single capture allowed at a time.
///
/// A new hotkey press while Selecting, Processing or Picking is refused with
/// [`SessionError::Busy`] and dropped by the caller. Showing may be replaced.
#[derive(Debug, Default)]
pub struct CaptureSession {
    state: SessionState,
    mode: Option<CaptureMode>,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> Option<CaptureMode> {
        self.mode
    }

    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    pub fn begin(&mut self, mode: CaptureMode) -> Result<Uuid, SessionError> {
        match self.state {
            SessionState::Selecting { id }
            | SessionState::Processing { id }
            | SessionState::Picking { id } => {
                return Err(SessionError::Busy(id));
            }
            SessionState::Idle | SessionState::Showing { .. } => {}
        }

        let id = Uuid::new_v4();
        self.state = match mode {
            CaptureMode::Word => SessionState::Processing { id },
            CaptureMode::Sentence => SessionState::Selecting { id },
        };
        self.mode = Some(mode);
        tracing::debug!("Session {:?} -> {:?}", mode, self.state);
        Ok(id)
    }

    fn check(&self, id: Uuid) -> Result<(), SessionError> {
        if self.is_current(id) { Ok(()) } else { Err(SessionError::Stale(id)) }
    }

    /// Selecting -> Processing for the region dragged under request `id`
    pub fn region_selected(&mut self, id: Uuid) -> Result<(), SessionError> {
        self.check(id)?;
        if self.state != (SessionState::Selecting { id }) {
            return Err(SessionError::NotSelecting);
        }
        self.state = SessionState::Processing { id };
        Ok(())
    }

    /// Processing -> Picking once the region's words are on screen
    pub fn await_words(&mut self, id: Uuid) -> bool {
        if self.state != (SessionState::Processing { id }) {
            return false;
        }
        self.state = SessionState::Picking { id };
        true
    }

    /// Picking -> Processing with the words the user chose
    pub fn words_selected(&mut self, id: Uuid) -> Result<(), SessionError> {
        self.check(id)?;
        if self.state != (SessionState::Picking { id }) {
            return Err(SessionError::NotPicking);
        }
        self.state = SessionState::Processing { id };
        Ok(())
    }

    /// Still waiting on the user (dragging or picking) for `id`
    pub fn is_interactive(&self, id: Uuid) -> bool {
        matches!(
            self.state,
            SessionState::Selecting { id: current } | SessionState::Picking { id: current }
                if current == id
        )
    }

    /// Processing -> Showing; false when `id` was cancelled or replaced
    pub fn show(&mut self, id: Uuid) -> bool {
        match self.state {
            SessionState::Processing { id: current } | SessionState::Showing { id: current }
                if current == id =>
            {
                self.state = SessionState::Showing { id };
                true
            }
            _ => false,
        }
    }

    pub fn is_current(&self, id: Uuid) -> bool {
        self.state.id() == Some(id)
    }

    /// Back to Idle from anywhere; returns the abandoned request
    pub fn cancel(&mut self) -> Option<Uuid> {
        let cancelled = self.state.id();
        self.state = SessionState::Idle;
        self.mode = None;
        if let Some(id) = cancelled {
            tracing::debug!("Session {} cancelled", id);
        }
        cancelled
    }

    /// Back to Idle if `id` is still the active request
    pub fn finish(&mut self, id: Uuid) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.state = SessionState::Idle;
        self.mode = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_capture_lifecycle() {
        let mut session = CaptureSession::new();
        let id = session.begin(CaptureMode::Word).unwrap();
        assert_eq!(session.state(), SessionState::Processing { id });

        assert!(session.show(id));
        assert_eq!(session.state(), SessionState::Showing { id });

        assert!(session.finish(id));
        assert!(session.is_idle());
    }

    #[test]
    fn test_sentence_capture_waits_for_region() {
        let mut session = CaptureSession::new();
        let id = session.begin(CaptureMode::Sentence).unwrap();
        assert_eq!(session.state(), SessionState::Selecting { id });
        assert!(!session.show(id));

        assert_eq!(session.region_selected(id), Ok(()));
        assert_eq!(session.state(), SessionState::Processing { id });
        assert_eq!(session.region_selected(id), Err(SessionError::NotSelecting));
    }

    #[test]
    fn test_region_from_another_request_is_refused() {
        let mut session = CaptureSession::new();
        let stale = session.begin(CaptureMode::Sentence).unwrap();
        session.cancel();
        let id = session.begin(CaptureMode::Sentence).unwrap();

        assert_eq!(session.region_selected(stale), Err(SessionError::Stale(stale)));
        assert_eq!(session.state(), SessionState::Selecting { id });
        assert_eq!(session.region_selected(id), Ok(()));
    }

    #[test]
    fn test_word_picking_lifecycle() {
        let mut session = CaptureSession::new();
        let id = session.begin(CaptureMode::Sentence).unwrap();
        assert!(session.is_interactive(id));
        session.region_selected(id).unwrap();
        assert!(!session.is_interactive(id));

        assert_eq!(session.words_selected(id), Err(SessionError::NotPicking));
        assert!(session.await_words(id));
        assert_eq!(session.state(), SessionState::Picking { id });
        assert!(session.is_interactive(id));
        assert_eq!(session.begin(CaptureMode::Word), Err(SessionError::Busy(id)));

        assert_eq!(session.words_selected(id), Ok(()));
        assert!(session.show(id));
        assert!(!session.await_words(id));
    }

    #[test]
    fn test_second_press_while_busy_is_refused() {
        let mut session = CaptureSession::new();
        let id = session.begin(CaptureMode::Word).unwrap();

        assert_eq!(session.begin(CaptureMode::Word), Err(SessionError::Busy(id)));
        assert_eq!(session.begin(CaptureMode::Sentence), Err(SessionError::Busy(id)));
        assert_eq!(session.state(), SessionState::Processing { id });
    }

    #[test]
    fn test_new_capture_replaces_visible_tooltip() {
        let mut session = CaptureSession::new();
        let first = session.begin(CaptureMode::Word).unwrap();
        session.show(first);

        let second = session.begin(CaptureMode::Sentence).unwrap();
        assert_ne!(first, second);
        assert!(!session.is_current(first));
        assert!(!session.finish(first));
        assert_eq!(session.mode(), Some(CaptureMode::Sentence));
    }

    #[test]
    fn test_cancel_drops_late_results() {
        let mut session = CaptureSession::new();
        let id = session.begin(CaptureMode::Word).unwrap();

        assert_eq!(session.cancel(), Some(id));
        assert!(session.is_idle());
        assert!(!session.is_current(id));
        assert!(!session.show(id));
        assert!(session.is_idle());
        assert_eq!(session.cancel(), None);
    }
}
