//! Pipeline tests driven through the real event loop with fake capture, OCR and sources

mod channel_tests;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use floatdict_capture::{CaptureError, CursorLocator, OcrError, ScreenCapturer, TextRecognizer};
use floatdict_config::Config;
use floatdict_core::state::AppState;
use floatdict_translator::{
    LookupRequest, SourceReply, TranslateError, TranslationService, TranslationSource,
};
use floatdict_types::{AppEvent, CaptureRegion, HotkeyAction, Point, TranslationEntry, WordBox};
use image::RgbaImage;
use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::context::PipelineContext;
use crate::events::event_loop;

pub struct FakeCapturer;

impl ScreenCapturer for FakeCapturer {
    fn capture(&self, region: CaptureRegion) -> Result<RgbaImage, CaptureError> {
        Ok(RgbaImage::new(region.width, region.height))
    }
}

/// Returns canned words after an optional (blocking) delay
pub struct FakeRecognizer {
    pub words: Vec<WordBox>,
    pub delay: Duration,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeRecognizer {
    pub fn new(words: Vec<WordBox>) -> Self {
        Self {
            words,
            delay: Duration::ZERO,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextRecognizer for FakeRecognizer {
    fn recognize(&self, _image: &RgbaImage, _origin: Point) -> Result<Vec<WordBox>, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        if self.fail {
            return Err(OcrError::Failed {
                status: "exit code: 1".to_string(),
                stderr: "Failed loading language 'jpn'".to_string(),
            });
        }
        Ok(self.words.clone())
    }
}

pub struct FakeCursor(pub Point);

impl CursorLocator for FakeCursor {
    fn cursor_position(&self) -> Option<Point> {
        Some(self.0)
    }
}

/// Answers every lookup with the same entries
pub struct FakeSource {
    pub name: &'static str,
    pub entries: Vec<TranslationEntry>,
}

impl FakeSource {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Vec::new(),
        }
    }

    pub fn answering(mut self, headword: &str, pos: Option<&str>, definition: &str) -> Self {
        let mut entry = TranslationEntry::new(self.name, headword);
        entry.part_of_speech = pos.map(str::to_string);
        entry.push_definition(definition);
        self.entries.push(entry);
        self
    }
}

#[async_trait]
impl TranslationSource for FakeSource {
    fn name(&self) -> &str {
        self.name
    }

    fn supports(&self, _from: &str, _to: &str) -> bool {
        true
    }

    fn handles_sentences(&self) -> bool {
        true
    }

    async fn lookup(&self, _request: &LookupRequest) -> Result<SourceReply, TranslateError> {
        Ok(SourceReply {
            entries: self.entries.clone(),
            detected_lang: None,
        })
    }
}

pub fn word(text: &str, x: i32, y: i32, line: u32) -> WordBox {
    WordBox {
        text: text.to_string(),
        region: CaptureRegion::new(x, y, 60, 20),
        confidence: 90.0,
        line_key: (1, 1, line),
    }
}

/// A running event loop with its channel ends
pub struct Harness {
    pub ctx: PipelineContext,
    pub to_app: AsyncSender<AppEvent>,
    pub from_app: AsyncReceiver<AppEvent>,
    pub cancel: CancellationToken,
    pub task: JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    pub async fn start(recognizer: Arc<FakeRecognizer>, sources: Vec<FakeSource>) -> Self {
        let sources: Vec<Arc<dyn TranslationSource>> = sources
            .into_iter()
            .map(|s| Arc::new(s) as Arc<dyn TranslationSource>)
            .collect();
        let translator = TranslationService::new(sources, Duration::from_secs(1));

        let (app_to_ui_tx, app_to_ui_rx) = kanal::unbounded_async();
        let (ui_to_app_tx, ui_to_app_rx) = kanal::unbounded_async();

        let ctx = PipelineContext::new(
            Arc::new(AppState::new(Config::default())),
            app_to_ui_tx,
            Arc::new(FakeCapturer),
            recognizer,
            Arc::new(FakeCursor(Point::new(1000, 800))),
            Arc::new(translator),
        );

        let cancel = CancellationToken::new();
        let task = tokio::spawn(event_loop(ctx.clone(), ui_to_app_rx, cancel.clone()));

        let harness = Self {
            ctx,
            to_app: ui_to_app_tx,
            from_app: app_to_ui_rx,
            cancel,
            task,
        };
        assert!(matches!(harness.next().await, AppEvent::BackendReady));
        harness
    }

    pub async fn send(&self, event: AppEvent) {
        self.to_app.send(event).await.unwrap();
    }

    /// Next event the pipeline emitted towards the UI
    pub async fn next(&self) -> AppEvent {
        timeout(Duration::from_secs(2), self.from_app.recv())
            .await
            .expect("Timeout - event never arrived!")
            .expect("channel closed")
    }

    /// True if nothing reaches the UI within `wait`
    pub async fn quiet_for(&self, wait: Duration) -> bool {
        timeout(wait, self.from_app.recv()).await.is_err()
    }

    /// Presses the capture-sentence hotkey and returns the request id the UI was given
    pub async fn start_selection(&self) -> Uuid {
        self.send(AppEvent::Hotkey(HotkeyAction::CaptureSentence)).await;
        match self.next().await {
            AppEvent::EnterRegionSelection { request_id } => request_id,
            other => panic!("Wrong event: {other:?}"),
        }
    }

    /// Polls the session until it is idle
    pub async fn wait_idle(&self) -> bool {
        for _ in 0..50 {
            if self.ctx.state.session.lock().await.is_idle() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}
