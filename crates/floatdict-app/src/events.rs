use floatdict_types::{AppEvent, HotkeyAction, UiEvent};
use kanal::AsyncReceiver;
use tokio_util::sync::CancellationToken;

use crate::context::PipelineContext;

pub mod cancel;
pub mod capture_sentence;
pub mod capture_word;

use cancel::handle_cancel;
use capture_sentence::{handle_region_selected, handle_sentence_hotkey, handle_words_selected};
use capture_word::handle_word_hotkey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// App's main loop
pub async fn event_loop(
    ctx: PipelineContext,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    ctx.send(AppEvent::BackendReady).await?;

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("[EVENT_LOOP] Cancelled");
                break;
            }
            event = ui_to_app_rx.recv() => event?,
        };

        tracing::debug!("[EVENT_LOOP] Event received: {:?}", std::mem::discriminant(&event));
        if handle_events(&ctx, event).await? == Flow::Quit {
            cancel.cancel();
            break;
        }
    }

    handle_cancel(&ctx).await;
    Ok(())
}

pub async fn handle_events(ctx: &PipelineContext, event: AppEvent) -> anyhow::Result<Flow> {
    match event {
        AppEvent::Hotkey(HotkeyAction::CaptureWord) => handle_word_hotkey(ctx).await?,
        AppEvent::Hotkey(HotkeyAction::CaptureSentence) => handle_sentence_hotkey(ctx).await?,
        AppEvent::Hotkey(HotkeyAction::Cancel) => {
            handle_cancel(ctx).await;
            ctx.send(AppEvent::UiEvent(UiEvent::Hide)).await?;
        }
        AppEvent::Hotkey(HotkeyAction::Quit) => {
            tracing::info!("Quit requested");
            ctx.send(AppEvent::UiEvent(UiEvent::Close)).await?;
            return Ok(Flow::Quit);
        }
        AppEvent::RegionSelected {
            request_id,
            region,
            action,
        } => handle_region_selected(ctx, request_id, region, action).await?,
        AppEvent::WordsSelected { request_id, words } => {
            handle_words_selected(ctx, request_id, words).await?
        }
        AppEvent::SelectionAborted(id) => {
            let mut session = ctx.state.session.lock().await;
            if session.is_interactive(id) {
                session.cancel();
                tracing::info!("Selection aborted ({id})");
            }
        }
        AppEvent::Dismissed(id) => {
            if ctx.state.session.lock().await.finish(id) {
                tracing::debug!("Tooltip for {id} dismissed");
            }
        }
        AppEvent::BackendReady
        | AppEvent::EnterRegionSelection { .. }
        | AppEvent::EnterWordSelection { .. }
        | AppEvent::ShowStatus { .. }
        | AppEvent::ShowResult { .. }
        | AppEvent::ShowNoText { .. }
        | AppEvent::ShowError { .. }
        | AppEvent::UiEvent(_) => {
            // UI-only events, ignore in backend
        }
    }

    Ok(Flow::Continue)
}
