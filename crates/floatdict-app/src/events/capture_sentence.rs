use floatdict_capture::{bounding_region, recognized_text, selected_text};
use floatdict_core::preprocess::{Preprocessor, SentencePreprocessor};
use floatdict_core::session::SessionError;
use floatdict_types::{
    Anchor, AppEvent, CaptureMode, CaptureOrigin, CaptureRegion, CaptureRequest, RegionAction,
    WordBox,
};
use uuid::Uuid;

use crate::context::PipelineContext;
use crate::status;

/// Capture-sentence hotkey: put the UI into drag-to-select mode
pub async fn handle_sentence_hotkey(ctx: &PipelineContext) -> anyhow::Result<()> {
    let id = match ctx.state.session.lock().await.begin(CaptureMode::Sentence) {
        Ok(id) => id,
        Err(SessionError::Busy(active)) => {
            tracing::info!("Capture {active} in progress, ignoring capture-sentence");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(">>> [SENTENCE] {id} waiting for a region");
    ctx.send(AppEvent::EnterRegionSelection { request_id: id }).await
}

/// The user dragged a region and chose what to do with it
pub async fn handle_region_selected(
    ctx: &PipelineContext,
    id: Uuid,
    region: CaptureRegion,
    action: RegionAction,
) -> anyhow::Result<()> {
    if let Err(e) = ctx.state.session.lock().await.region_selected(id) {
        tracing::debug!("Ignoring region {:?}: {e}", region);
        return Ok(());
    }

    let request = CaptureRequest::new(id, CaptureMode::Sentence, CaptureOrigin::Region(region));
    match action {
        RegionAction::TranslateAll => {
            ctx.spawn_pipeline(id, "SENTENCE", move |ctx| async move {
                handle_sentence_capture(&ctx, request).await
            });
        }
        RegionAction::SelectWords => {
            ctx.spawn_pipeline(id, "PRE-OCR", move |ctx| async move {
                handle_pre_ocr(&ctx, request).await
            });
        }
    }
    Ok(())
}

/// Reads the region and hands its words to the UI for picking
pub async fn handle_pre_ocr(ctx: &PipelineContext, request: CaptureRequest) -> anyhow::Result<()> {
    let id = request.id;
    let CaptureOrigin::Region(region) = request.origin else {
        anyhow::bail!("pre-OCR needs a region");
    };
    let anchor = Anchor::Region(region);

    if !status::progress(ctx, id, anchor, status::READING_SENTENCE).await? {
        return Ok(());
    }

    let words = match ctx.recognize(region).await {
        Ok(words) => words,
        Err(e) => {
            tracing::error!(">>> [PRE-OCR] OCR failed: {e:#}");
            return status::fail(ctx, id, anchor, format!("{e:#}")).await;
        }
    };
    if words.is_empty() {
        tracing::info!(">>> [PRE-OCR] No words in {:?}", region);
        return status::no_text(ctx, id, anchor).await;
    }

    // Held across the send so a cancel cannot slip in between
    let mut session = ctx.state.session.lock().await;
    if !session.await_words(id) {
        tracing::debug!("Dropping words for stale request {id}");
        return Ok(());
    }
    tracing::debug!(">>> [PRE-OCR] {} words ready for picking", words.len());
    ctx.send(AppEvent::EnterWordSelection {
        request_id: id,
        region,
        words,
    })
    .await
}

/// The user finished picking; translate the words as one sentence
pub async fn handle_words_selected(
    ctx: &PipelineContext,
    id: Uuid,
    words: Vec<WordBox>,
) -> anyhow::Result<()> {
    let Some(bounds) = bounding_region(&words) else {
        if ctx.state.session.lock().await.finish(id) {
            tracing::info!(">>> [SENTENCE] {id} no words picked");
        }
        return Ok(());
    };
    if let Err(e) = ctx.state.session.lock().await.words_selected(id) {
        tracing::debug!("Ignoring {} picked words: {e}", words.len());
        return Ok(());
    }

    let text = selected_text(words);
    let request = CaptureRequest::new(id, CaptureMode::Sentence, CaptureOrigin::Region(bounds));
    ctx.spawn_pipeline(id, "SENTENCE", move |ctx| async move {
        translate_sentence(&ctx, &request, Anchor::Region(bounds), &text).await
    });
    Ok(())
}

pub async fn handle_sentence_capture(
    ctx: &PipelineContext,
    request: CaptureRequest,
) -> anyhow::Result<()> {
    let id = request.id;
    let CaptureOrigin::Region(region) = request.origin else {
        anyhow::bail!("sentence capture needs a region");
    };
    let anchor = Anchor::Region(region);

    if !status::progress(ctx, id, anchor, status::READING_SENTENCE).await? {
        return Ok(());
    }

    let words = match ctx.recognize(region).await {
        Ok(words) => words,
        Err(e) => {
            tracing::error!(">>> [SENTENCE] OCR failed: {e:#}");
            return status::fail(ctx, id, anchor, format!("{e:#}")).await;
        }
    };

    let text = recognized_text(words);
    translate_sentence(ctx, &request, anchor, &text.text).await
}

/// Cleans OCR text and shows its translation at `anchor`
async fn translate_sentence(
    ctx: &PipelineContext,
    request: &CaptureRequest,
    anchor: Anchor,
    raw: &str,
) -> anyhow::Result<()> {
    let id = request.id;
    let sentence = SentencePreprocessor.process(raw);
    if sentence.is_empty() {
        tracing::info!(">>> [SENTENCE] No text at {:?}", anchor);
        return status::no_text(ctx, id, anchor).await;
    }
    tracing::debug!(">>> [SENTENCE] Got text: {} chars", sentence.chars().count());

    let (from, to) = {
        let config = ctx.state.config.read().await;
        (
            config.translator.source_lang.clone(),
            config.translator.target_lang.clone(),
        )
    };

    if !status::progress(ctx, id, anchor, status::TRANSLATING_SENTENCE).await? {
        return Ok(());
    }

    let result = ctx
        .translator
        .translate(&sentence, CaptureMode::Sentence, &from, &to)
        .await;
    tracing::debug!(
        ">>> [SENTENCE] {} entries, {} failures in {:?}",
        result.entries.len(),
        result.failures.len(),
        request.created_at.elapsed()
    );

    ctx.show(
        id,
        AppEvent::ShowResult {
            request_id: id,
            anchor,
            result,
        },
    )
    .await?;
    Ok(())
}
