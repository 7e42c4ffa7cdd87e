use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use self::cache::CacheConfig;
use self::history::HistoryConfig;
use self::hotkey::HotkeyConfig;
use self::ocr::OcrConfig;
use self::translator::TranslatorConfig;
use self::ui::UiConfig;

pub mod cache;
pub mod history;
pub mod hotkey;
pub mod ocr;
pub mod translator;
pub mod ui;

fn default_log_level() -> String {
    "info".to_string()
}

fn default_poll_interval_ms() -> u64 {
    50
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub hotkeys: HotkeyConfig,
    pub ocr: OcrConfig,
    pub translator: TranslatorConfig,
    pub ui: UiConfig,
    pub cache: CacheConfig,
    pub history: HistoryConfig,

    /// Filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// How often the UI thread drains hotkey and tray events
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hotkeys: HotkeyConfig::default(),
            ocr: OcrConfig::default(),
            translator: TranslatorConfig::default(),
            ui: UiConfig::default(),
            cache: CacheConfig::default(),
            history: HistoryConfig::default(),
            log_level: default_log_level(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Applies `FLOATDICT_*` overrides from `lookup`; unparsable values are ignored
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(lang) = lookup("FLOATDICT_SOURCE_LANG") {
            self.translator.source_lang = lang;
        }
        if let Some(lang) = lookup("FLOATDICT_TARGET_LANG") {
            self.translator.target_lang = lang;
        }
        if let Some(raw) = lookup("FLOATDICT_TIMEOUT_MS") {
            match raw.parse() {
                Ok(ms) => self.translator.timeout_ms = ms,
                Err(_) => tracing::warn!("Ignoring FLOATDICT_TIMEOUT_MS={raw}: not a number"),
            }
        }
        if let Some(path) = lookup("FLOATDICT_TESSERACT") {
            self.ocr.tesseract_path = Some(PathBuf::from(path));
        }
        if let Some(level) = lookup("FLOATDICT_LOG") {
            self.log_level = level;
        }
    }
}
