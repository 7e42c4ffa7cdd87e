use serde::{Deserialize, Serialize};

fn default_capture_word() -> String {
    "ctrl+alt+KeyD".to_string()
}

fn default_capture_sentence() -> String {
    "ctrl+alt+KeyS".to_string()
}

fn default_cancel() -> String {
    "Escape".to_string()
}

fn default_quit() -> String {
    "ctrl+alt+KeyQ".to_string()
}

/// Accelerator strings, e.g. `ctrl+alt+KeyD`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct HotkeyConfig {
    #[serde(default = "default_capture_word")]
    pub capture_word: String,
    #[serde(default = "default_capture_sentence")]
    pub capture_sentence: String,
    #[serde(default = "default_cancel")]
    pub cancel: String,
    #[serde(default = "default_quit")]
    pub quit: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            capture_word: default_capture_word(),
            capture_sentence: default_capture_sentence(),
            cancel: default_cancel(),
            quit: default_quit(),
        }
    }
}
