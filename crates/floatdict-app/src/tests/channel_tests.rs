use std::sync::Arc;
use std::time::Duration;

use floatdict_config::Config;
use floatdict_core::state::AppState;
use floatdict_translator::TranslationService;
use floatdict_types::{AppEvent, HotkeyAction, Point, UiEvent};
use floatdict_ui::UiBridge;
use tokio::time::timeout;
use uuid::Uuid;

use super::{FakeCapturer, FakeCursor, FakeRecognizer};
use crate::controller::{AppController, ChannelSet, Services};

fn services() -> Services {
    Services {
        capturer: Arc::new(FakeCapturer),
        recognizer: Arc::new(FakeRecognizer::new(Vec::new())),
        cursor: Arc::new(FakeCursor(Point::new(10, 10))),
        translator: Arc::new(TranslationService::new(Vec::new(), Duration::from_secs(1))),
    }
}

#[tokio::test]
async fn test_channel_set_is_bounded() {
    let channels = ChannelSet::new();
    let (tx, _rx) = &channels.ui_to_app;

    for _ in 0..64 {
        assert!(tx.try_send(AppEvent::Dismissed(Uuid::nil())).unwrap());
    }
    // Full: the UI side drops instead of blocking
    assert!(!tx.try_send(AppEvent::Dismissed(Uuid::nil())).unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_controller_round_trip_through_ui_bridge() {
    let controller = AppController::new(Arc::new(AppState::new(Config::default())));
    let (bridge, handle) = UiBridge::new();
    let mut tasks = controller.spawn_tasks(services(), Arc::new(bridge));

    // Plays the UI thread: waits for the backend, asks to quit, waits for Close
    let ui = tokio::task::spawn_blocking(move || {
        let mut seen = Vec::new();
        while let Ok(event) = handle.to_ui_rx.recv() {
            let done = matches!(event, AppEvent::UiEvent(UiEvent::Close));
            if matches!(event, AppEvent::BackendReady) {
                handle.send(AppEvent::Hotkey(HotkeyAction::Quit));
            }
            seen.push(event);
            if done {
                break;
            }
        }
        seen
    });

    let seen = timeout(Duration::from_secs(2), ui).await.unwrap().unwrap();
    assert!(matches!(seen.first(), Some(AppEvent::BackendReady)));
    assert!(matches!(seen.last(), Some(AppEvent::UiEvent(UiEvent::Close))));

    controller.shutdown();
    let drained = timeout(Duration::from_secs(2), async {
        while let Some(joined) = tasks.join_next().await {
            assert!(joined.unwrap().is_ok());
        }
    })
    .await;
    assert!(drained.is_ok(), "tasks did not stop after shutdown");
}

#[tokio::test]
async fn test_sync_ui_sender_reaches_async_backend() {
    let (tx, rx) = kanal::bounded_async::<AppEvent>(4);
    let sync_tx = tx.to_sync();

    tokio::task::spawn_blocking(move || {
        sync_tx.send(AppEvent::Dismissed(uuid::Uuid::nil())).unwrap();
    })
    .await
    .unwrap();

    match timeout(Duration::from_secs(1), rx.recv()).await {
        Ok(Ok(AppEvent::Dismissed(id))) => assert!(id.is_nil()),
        Ok(Ok(other)) => panic!("Wrong event type: {other:?}"),
        Ok(Err(e)) => panic!("Channel error: {e}"),
        Err(_) => panic!("Timeout - event never arrived!"),
    }
}
