use std::time::Instant;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Anchor, CaptureRegion, Point};

/// Source names as shown in the tooltip sections
pub const GOOGLE_TRANSLATE: &str = "Google Translate";
pub const LONGDO_DICT: &str = "Longdo Dict";

#[derive(Debug, Clone)]
pub enum AppEvent {
    // ui -> app
    Hotkey(HotkeyAction),
    RegionSelected {
        request_id: Uuid,
        region: CaptureRegion,
        action: RegionAction,
    },
    /// Words picked in reading order; empty when the user picked nothing
    WordsSelected {
        request_id: Uuid,
        words: Vec<WordBox>,
    },
    /// Esc, right click or a drag too small to use
    SelectionAborted(Uuid),
    /// Tooltip for this request hidden by timeout or click-away
    Dismissed(Uuid),

    // app -> ui
    BackendReady,
    EnterRegionSelection {
        request_id: Uuid,
    },
    /// Pre-OCR finished; let the user pick from `words`
    EnterWordSelection {
        request_id: Uuid,
        region: CaptureRegion,
        words: Vec<WordBox>,
    },
    ShowStatus {
        request_id: Uuid,
        anchor: Anchor,
        status: String,
    },
    ShowResult {
        request_id: Uuid,
        anchor: Anchor,
        result: TranslationResult,
    },
    ShowNoText {
        request_id: Uuid,
        anchor: Anchor,
    },
    ShowError {
        request_id: Uuid,
        anchor: Anchor,
        message: String,
    },
    UiEvent(UiEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// Hide overlay and tooltip
    Hide,
    /// Tear down the UI and leave the event loop
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HotkeyAction {
    CaptureWord,
    CaptureSentence,
    Cancel,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureMode {
    Word,
    Sentence,
}

/// What to do with a dragged region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionAction {
    TranslateAll,
    SelectWords,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOrigin {
    Point(Point),
    Region(CaptureRegion),
}

#[derive(Debug, Clone)]
pub struct CaptureRequest {
    pub id: Uuid,
    pub mode: CaptureMode,
    pub origin: CaptureOrigin,
    pub created_at: Instant,
}

impl CaptureRequest {
    pub fn new(id: Uuid, mode: CaptureMode, origin: CaptureOrigin) -> Self {
        Self {
            id,
            mode,
            origin,
            created_at: Instant::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordBox {
    pub text: String,
    pub region: CaptureRegion,
    pub confidence: f32,
    /// (block, paragraph, line) as reported by the OCR engine
    pub line_key: (u32, u32, u32),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecognizedText {
    pub text: String,
    pub words: Vec<WordBox>,
}

impl RecognizedText {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub source_text: String,
    pub translated_text: String,
}

/// One meaning, with the providers that gave it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub text: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    /// Providers that contributed this entry, in order
    pub sources: Vec<String>,
    pub headword: String,
    pub part_of_speech: Option<String>,
    pub definitions: Vec<Definition>,
    #[serde(default)]
    pub examples: Vec<Example>,
    /// Provider specific label, e.g. the Longdo sub-dictionary
    #[serde(default)]
    pub dictionary: Option<String>,
}

impl TranslationEntry {
    pub fn new(source: &str, headword: impl Into<String>) -> Self {
        Self {
            sources: vec![source.to_string()],
            headword: headword.into(),
            part_of_speech: None,
            definitions: Vec::new(),
            examples: Vec::new(),
            dictionary: None,
        }
    }

    pub fn from_source(&self, source: &str) -> bool {
        self.sources.iter().any(|s| s == source)
    }

    /// Adds a definition credited to the entry's own provider
    pub fn push_definition(&mut self, text: impl Into<String>) {
        self.definitions.push(Definition {
            text: text.into(),
            sources: self.sources.iter().take(1).cloned().collect(),
        });
    }

    pub fn definition_texts(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.text.as_str()).collect()
    }

    /// Definitions `source` contributed, even after merging
    pub fn definitions_from<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a str> {
        self.definitions
            .iter()
            .filter(move |d| d.sources.iter().any(|s| s == source))
            .map(|d| d.text.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub source: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub query: String,
    pub mode: CaptureMode,
    pub source_lang: String,
    pub detected_lang: Option<String>,
    pub target_lang: String,
    pub entries: Vec<TranslationEntry>,
    #[serde(default)]
    pub failures: Vec<SourceFailure>,
    /// Sources that were asked, whether or not they answered
    #[serde(default)]
    pub consulted: Vec<String>,
}

impl TranslationResult {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries_from<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a TranslationEntry> {
        self.entries.iter().filter(move |e| e.from_source(source))
    }

    pub fn failure_of(&self, source: &str) -> Option<&SourceFailure> {
        self.failures.iter().find(|f| f.source == source)
    }

    pub fn consulted(&self, source: &str) -> bool {
        self.consulted.iter().any(|s| s == source)
    }
}
