use serde::{Deserialize, Serialize};

fn default_source_lang() -> String {
    "ja".to_string()
}

fn default_target_lang() -> String {
    "th".to_string()
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_enabled() -> bool {
    true
}

fn default_google_url() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_longdo_url() -> String {
    "https://dict.longdo.com/mobile.php".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TranslatorConfig {
    /// ISO 639-1 code of the on-screen text, also picks the OCR language
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    /// Per-source request budget
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_enabled")]
    pub google_enabled: bool,
    #[serde(default = "default_google_url")]
    pub google_url: String,
    #[serde(default = "default_enabled")]
    pub longdo_enabled: bool,
    #[serde(default = "default_longdo_url")]
    pub longdo_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            timeout_ms: default_timeout_ms(),
            google_enabled: default_enabled(),
            google_url: default_google_url(),
            longdo_enabled: default_enabled(),
            longdo_url: default_longdo_url(),
            user_agent: default_user_agent(),
        }
    }
}
