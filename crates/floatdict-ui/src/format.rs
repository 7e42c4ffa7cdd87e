use floatdict_config::hotkey::HotkeyConfig;
use floatdict_types::{
    CaptureMode, GOOGLE_TRANSLATE, LONGDO_DICT, TranslationEntry, TranslationResult,
};

pub const LOADING: &str = "Loading...";
pub const READING_SENTENCE: &str = "Reading sentence...";
pub const TRANSLATING_SENTENCE: &str = "Translating sentence...";
pub const NO_TEXT: &str = "No text found";

const NOT_AVAILABLE: &str = "(Translation not available)";
const NO_TRANSLATION: &str = "(No translation found)";
const CONNECTION_FAILED: &str = "(Connection failed)";
const MAX_EXAMPLES: usize = 2;
const BULLET: &str = "\u{2022}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// The looked-up word
    Header,
    /// Section title
    Title,
    Body,
    /// Placeholders and status text, rendered italic
    Muted,
}

impl LineKind {
    pub fn as_index(self) -> i32 {
        match self {
            LineKind::Header => 0,
            LineKind::Title => 1,
            LineKind::Body => 2,
            LineKind::Muted => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipLine {
    pub kind: LineKind,
    pub text: String,
}

/// What the tooltip shows, as styled lines
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TooltipContent {
    pub lines: Vec<TooltipLine>,
    /// Status text stays up until replaced; results auto-hide
    pub transient: bool,
}

impl TooltipContent {
    fn push(&mut self, kind: LineKind, text: impl Into<String>) {
        self.lines.push(TooltipLine {
            kind,
            text: text.into(),
        });
    }

    pub fn status(text: &str) -> Self {
        let mut content = Self::default();
        content.push(LineKind::Muted, text);
        content
    }

    /// A final message (no text, errors) that times out like a result
    pub fn message(text: &str) -> Self {
        Self {
            transient: true,
            ..Self::status(text)
        }
    }

    pub fn notice(title: &str, lines: &[String]) -> Self {
        let mut content = Self {
            transient: true,
            ..Self::default()
        };
        content.push(LineKind::Title, title);
        for line in lines {
            content.push(LineKind::Body, line.as_str());
        }
        content
    }

    pub fn from_result(result: &TranslationResult) -> Self {
        match result.mode {
            CaptureMode::Word => word_content(result),
            CaptureMode::Sentence => sentence_content(result),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn to_plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Shown once at startup so the user knows which keys to press
pub fn startup_notice(hotkeys: &HotkeyConfig) -> TooltipContent {
    TooltipContent::notice(
        "FloatingDictionary is running",
        &[
            format!("{}: translate word under cursor", hotkeys.capture_word),
            format!("{}: select an area to translate", hotkeys.capture_sentence),
            format!("{}: close", hotkeys.cancel),
            format!("{}: quit", hotkeys.quit),
        ],
    )
}

fn source_label(result: &TranslationResult) -> String {
    result
        .detected_lang
        .as_deref()
        .unwrap_or(result.source_lang.as_str())
        .to_uppercase()
}

/// Google's plain translations: entries without a part of speech
fn google_translations(result: &TranslationResult) -> Vec<&str> {
    let query = result.query.trim();
    result
        .entries_from(GOOGLE_TRANSLATE)
        .filter(|e| e.part_of_speech.is_none())
        .flat_map(|e| e.definitions_from(GOOGLE_TRANSLATE))
        .map(str::trim)
        .filter(|d| !d.is_empty() && !d.eq_ignore_ascii_case(query))
        .collect()
}

/// One bullet per entry, listing only what `source` said about it
fn entry_line(entry: &TranslationEntry, source: &str) -> String {
    let pos = entry.part_of_speech.as_deref().unwrap_or("N/A");
    let definitions: Vec<_> = entry.definitions_from(source).collect();
    let mut line = format!(
        "{BULLET} {} [{}] {}",
        entry.headword,
        pos,
        definitions.join(", ")
    );
    if let Some(dictionary) = &entry.dictionary {
        line.push_str(&format!(" ({dictionary})"));
    }
    line
}

fn has_definitions(entry: &TranslationEntry, source: &str) -> bool {
    entry.definitions_from(source).next().is_some()
}

fn word_content(result: &TranslationResult) -> TooltipContent {
    let mut content = TooltipContent {
        transient: true,
        ..TooltipContent::default()
    };
    content.push(LineKind::Header, result.query.as_str());

    content.push(LineKind::Title, "Google Translate:");
    let translations = google_translations(result);
    if translations.is_empty() {
        content.push(LineKind::Muted, NOT_AVAILABLE);
    }
    for translation in translations {
        content.push(LineKind::Body, format!("{BULLET} {translation}"));
    }
    if let Some(failure) = result.failure_of(GOOGLE_TRANSLATE) {
        content.push(LineKind::Muted, format!("({})", failure.message));
    }

    let senses: Vec<_> = result
        .entries_from(GOOGLE_TRANSLATE)
        .filter(|e| e.part_of_speech.is_some() && has_definitions(e, GOOGLE_TRANSLATE))
        .collect();
    if !senses.is_empty() {
        content.push(LineKind::Title, "Dictionary:");
        for entry in senses {
            content.push(LineKind::Body, entry_line(entry, GOOGLE_TRANSLATE));
        }
    }

    if result.consulted(LONGDO_DICT) {
        content.push(LineKind::Title, "Longdo Dict:");
        let entries: Vec<_> = result
            .entries_from(LONGDO_DICT)
            .filter(|e| has_definitions(e, LONGDO_DICT))
            .collect();
        if result.failure_of(LONGDO_DICT).is_some() {
            content.push(LineKind::Muted, CONNECTION_FAILED);
        } else if entries.is_empty() {
            content.push(LineKind::Muted, NO_TRANSLATION);
        }
        for entry in entries {
            content.push(LineKind::Body, entry_line(entry, LONGDO_DICT));
        }
    }

    let examples: Vec<_> = result
        .entries
        .iter()
        .flat_map(|e| e.examples.iter())
        .take(MAX_EXAMPLES)
        .collect();
    if !examples.is_empty() {
        let src = source_label(result);
        let dst = result.target_lang.to_uppercase();
        content.push(LineKind::Title, "Example Sentences (Longdo):");
        for example in examples {
            content.push(
                LineKind::Body,
                format!("{BULLET} {src}: {}", example.source_text),
            );
            content.push(
                LineKind::Body,
                format!("  \u{2192} {dst}: {}", example.translated_text),
            );
        }
    }

    content
}

fn sentence_content(result: &TranslationResult) -> TooltipContent {
    let mut content = TooltipContent {
        transient: true,
        ..TooltipContent::default()
    };
    let src = source_label(result);
    let dst = result.target_lang.to_uppercase();

    content.push(LineKind::Body, format!("{src}: {}", result.query));

    let translation = google_translations(result).join(" ");
    match result.failure_of(GOOGLE_TRANSLATE) {
        Some(failure) if translation.is_empty() => {
            content.push(LineKind::Muted, format!("{dst}: {}", failure.message));
        }
        _ if translation.is_empty() => {
            content.push(LineKind::Muted, format!("{dst}: {NOT_AVAILABLE}"));
        }
        _ => content.push(LineKind::Body, format!("{dst}: {translation}")),
    }

    content
}
