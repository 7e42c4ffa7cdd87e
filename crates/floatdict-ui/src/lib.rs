mod bridge;
pub mod format;
pub mod layout;
pub mod overlay;
pub mod state;

#[cfg(not(windows))]
mod headless;
#[cfg(windows)]
mod tray;
#[cfg(windows)]
mod window;

use floatdict_config::Config;

pub use bridge::{UiBridge, UiBridgeHandle};
pub use format::TooltipContent;
pub use state::{UiFlow, UiState};

/// Runs the UI on the calling thread until `UiEvent::Close` or the backend hangs up.
///
/// On Windows this is the Slint event loop, which also owns the global hotkeys
/// and the tray icon.
pub fn run_ui(config: &Config, handle: UiBridgeHandle) -> anyhow::Result<()> {
    #[cfg(windows)]
    {
        window::run(config, handle)
    }
    #[cfg(not(windows))]
    {
        headless::run(config, handle)
    }
}
