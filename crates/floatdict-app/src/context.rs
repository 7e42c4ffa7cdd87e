use std::sync::{Arc, Mutex};

use anyhow::Context;
use floatdict_capture::{CursorLocator, ScreenCapturer, TextRecognizer};
use floatdict_core::state::AppState;
use floatdict_translator::TranslationService;
use floatdict_types::{AppEvent, CaptureRegion, WordBox};
use kanal::AsyncSender;
use tokio::task::AbortHandle;
use uuid::Uuid;

/// Everything a capture pipeline needs, bundled so handlers take one argument
#[derive(Clone)]
pub struct PipelineContext {
    pub state: Arc<AppState>,
    pub event_tx: AsyncSender<AppEvent>,
    pub capturer: Arc<dyn ScreenCapturer>,
    pub recognizer: Arc<dyn TextRecognizer>,
    pub cursor: Arc<dyn CursorLocator>,
    pub translator: Arc<TranslationService>,
    inflight: Arc<Mutex<Option<(Uuid, AbortHandle)>>>,
}

impl PipelineContext {
    pub fn new(
        state: Arc<AppState>,
        event_tx: AsyncSender<AppEvent>,
        capturer: Arc<dyn ScreenCapturer>,
        recognizer: Arc<dyn TextRecognizer>,
        cursor: Arc<dyn CursorLocator>,
        translator: Arc<TranslationService>,
    ) -> Self {
        Self {
            state,
            event_tx,
            capturer,
            recognizer,
            cursor,
            translator,
            inflight: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn send(&self, event: AppEvent) -> anyhow::Result<()> {
        self.event_tx
            .send(event)
            .await
            .context("UI channel closed")
    }

    pub async fn is_current(&self, id: Uuid) -> bool {
        self.state.session.lock().await.is_current(id)
    }

    /// Sends `event` only while `id` is still the active request
    pub async fn send_if_current(&self, id: Uuid, event: AppEvent) -> anyhow::Result<bool> {
        if !self.is_current(id).await {
            tracing::debug!("Dropping update for stale request {id}");
            return Ok(false);
        }
        self.send(event).await?;
        Ok(true)
    }

    /// Moves the session to Showing, then sends the result
    pub async fn show(&self, id: Uuid, event: AppEvent) -> anyhow::Result<bool> {
        if !self.state.session.lock().await.show(id) {
            tracing::debug!("Dropping result for stale request {id}");
            return Ok(false);
        }
        self.send(event).await?;
        Ok(true)
    }

    /// Ends the request with a final message (no text, error)
    pub async fn finish(&self, id: Uuid, event: AppEvent) -> anyhow::Result<()> {
        let current = self.state.session.lock().await.finish(id);
        if current {
            self.send(event).await?;
        }
        Ok(())
    }

    /// Screenshot plus OCR on the blocking pool
    pub async fn recognize(&self, region: CaptureRegion) -> anyhow::Result<Vec<WordBox>> {
        let capturer = self.capturer.clone();
        let recognizer = self.recognizer.clone();

        tokio::task::spawn_blocking(move || {
            let image = capturer.capture(region)?;
            let words = recognizer.recognize(&image, region.top_left())?;
            Ok::<_, anyhow::Error>(words)
        })
        .await
        .context("OCR task failed")?
    }

    /// Runs a capture pipeline for `id` in the background so cancel can abort it.
    ///
    /// The abort handle is stored under the same lock the finished task takes to
    /// clear it, so a task that completes at once never leaves a stale handle.
    pub fn spawn_pipeline<F, Fut>(&self, id: Uuid, label: &'static str, pipeline: F)
    where
        F: FnOnce(PipelineContext) -> Fut,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let work = pipeline(self.clone());
        let task_ctx = self.clone();

        let mut slot = match self.inflight.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        let handle = tokio::spawn(async move {
            if let Err(e) = work.await {
                tracing::error!(">>> [{label}] Pipeline {id} failed: {e:#}");
            }
            task_ctx.clear_inflight(id);
        });
        *slot = Some((id, handle.abort_handle()));
    }

    /// Request whose pipeline is still running, if any
    pub fn inflight(&self) -> Option<Uuid> {
        self.inflight.lock().ok()?.as_ref().map(|(id, _)| *id)
    }

    fn clear_inflight(&self, id: Uuid) {
        if let Ok(mut slot) = self.inflight.lock()
            && slot.as_ref().is_some_and(|(current, _)| *current == id)
        {
            *slot = None;
        }
    }

    /// Aborts the tracked pipeline, if any
    pub fn abort_inflight(&self) -> Option<Uuid> {
        let (id, handle) = self.inflight.lock().ok()?.take()?;
        handle.abort();
        Some(id)
    }
}
