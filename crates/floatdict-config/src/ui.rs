use serde::{Deserialize, Serialize};

fn default_tooltip_timeout_ms() -> u64 {
    10_000
}

fn default_fade_ms() -> u64 {
    150
}

fn default_show_startup_notification() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Tooltip hides itself after this long; 0 keeps it until dismissed
    #[serde(default = "default_tooltip_timeout_ms")]
    pub tooltip_timeout_ms: u64,
    #[serde(default = "default_fade_ms")]
    pub fade_ms: u64,
    #[serde(default = "default_show_startup_notification")]
    pub show_startup_notification: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tooltip_timeout_ms: default_tooltip_timeout_ms(),
            fade_ms: default_fade_ms(),
            show_startup_notification: default_show_startup_notification(),
        }
    }
}
