use std::sync::Arc;

use floatdict_capture::{CursorLocator, ScreenCapturer, TextRecognizer};
use floatdict_core::state::AppState;
use floatdict_translator::TranslationService;
use floatdict_types::AppEvent;
use floatdict_ui::UiBridge;
use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::context::PipelineContext;
use crate::events::event_loop;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_ui: kanal::bounded_async(256),
            ui_to_app: kanal::bounded_async(64),
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Backend services the pipeline runs on
pub struct Services {
    pub capturer: Arc<dyn ScreenCapturer>,
    pub recognizer: Arc<dyn TextRecognizer>,
    pub cursor: Arc<dyn CursorLocator>,
    pub translator: Arc<TranslationService>,
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Sender into the event loop, e.g. for Ctrl+C
    pub fn backend_sender(&self) -> AsyncSender<AppEvent> {
        self.channels.ui_to_app.0.clone()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn context(&self, services: Services) -> PipelineContext {
        PipelineContext::new(
            self.state.clone(),
            self.channels.app_to_ui.0.clone(),
            services.capturer,
            services.recognizer,
            services.cursor,
            services.translator,
        )
    }

    /// Event loop plus the two bridge forwarders; must run inside a runtime
    pub fn spawn_tasks(
        &self,
        services: Services,
        bridge: Arc<UiBridge>,
    ) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Event loop
        tasks.spawn(event_loop(
            self.context(services),
            self.channels.ui_to_app.1.clone(),
            self.cancel_token.child_token(),
        ));

        // Backend -> UI thread
        let down = bridge.clone();
        let app_to_ui_rx = self.channels.app_to_ui.1.clone();
        let cancel = self.cancel_token.child_token();
        tasks.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = down.forward_from_backend(app_to_ui_rx) => {}
            }
            Ok(())
        });

        // UI thread -> backend
        let ui_to_app_tx = self.channels.ui_to_app.0.clone();
        let cancel = self.cancel_token.child_token();
        tasks.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = bridge.forward_to_backend(ui_to_app_tx) => {}
            }
            Ok(())
        });

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
