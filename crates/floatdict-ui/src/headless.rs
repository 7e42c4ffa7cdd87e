use std::time::{Duration, Instant};

use floatdict_config::Config;

use crate::bridge::UiBridgeHandle;
use crate::state::{UiFlow, UiState};

/// Stand-in frontend for platforms without the native overlay: tooltips are logged
pub fn run(config: &Config, handle: UiBridgeHandle) -> anyhow::Result<()> {
    let poll = Duration::from_millis(config.poll_interval_ms.max(1));
    let mut state = UiState::new(&config.ui);
    tracing::info!("[UI] Headless mode, tooltips go to the log");

    loop {
        match handle.to_ui_rx.try_recv() {
            Ok(Some(event)) => {
                let flow = state.apply(event, Instant::now());
                if let Some(tooltip) = state.tooltip() {
                    tracing::info!("[UI] Tooltip at {:?}:\n{}", tooltip.anchor.point(), tooltip.content.to_plain_text());
                }
                if flow == UiFlow::Exit {
                    tracing::info!("[UI] Closing");
                    break;
                }
                continue;
            }
            Ok(None) => {}
            Err(_) => {
                tracing::info!("[UI] Backend channel closed");
                break;
            }
        }

        if let Some(event) = state.tick(Instant::now()) {
            handle.send(event);
        }
        std::thread::sleep(poll);
    }

    Ok(())
}
