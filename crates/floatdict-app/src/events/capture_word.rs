use floatdict_capture::{region_around, word_at};
use floatdict_core::preprocess::{Preprocessor, WordPreprocessor};
use floatdict_core::session::SessionError;
use floatdict_types::{
    Anchor, AppEvent, CaptureMode, CaptureOrigin, CaptureRequest, Point, WordBox,
};

use crate::context::PipelineContext;
use crate::status;

/// Capture-word hotkey: start a request at the cursor unless one is running
pub async fn handle_word_hotkey(ctx: &PipelineContext) -> anyhow::Result<()> {
    let id = match ctx.state.session.lock().await.begin(CaptureMode::Word) {
        Ok(id) => id,
        Err(SessionError::Busy(active)) => {
            tracing::info!("Capture {active} in progress, ignoring capture-word");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let Some(cursor) = ctx.cursor.cursor_position() else {
        ctx.finish(
            id,
            AppEvent::ShowError {
                request_id: id,
                anchor: Anchor::Cursor(Point::default()),
                message: "Could not read the cursor position".to_string(),
            },
        )
        .await?;
        return Ok(());
    };

    let request = CaptureRequest::new(id, CaptureMode::Word, CaptureOrigin::Point(cursor));
    ctx.spawn_pipeline(id, "WORD", move |ctx| async move {
        handle_word_capture(&ctx, request).await
    });
    Ok(())
}

/// Screenshot around the cursor, OCR, pick the word under it, look it up
pub async fn handle_word_capture(
    ctx: &PipelineContext,
    request: CaptureRequest,
) -> anyhow::Result<()> {
    let id = request.id;
    let CaptureOrigin::Point(cursor) = request.origin else {
        anyhow::bail!("word capture needs a cursor origin");
    };

    let (width, height, from, to) = {
        let config = ctx.state.config.read().await;
        (
            config.ocr.capture_width,
            config.ocr.capture_height,
            config.translator.source_lang.clone(),
            config.translator.target_lang.clone(),
        )
    };

    let region = region_around(cursor, width, height);
    tracing::debug!(">>> [WORD] {id} capturing {:?} around {:?}", region, cursor);

    let words = match ctx.recognize(region).await {
        Ok(words) => words,
        Err(e) => {
            tracing::error!(">>> [WORD] OCR failed: {e:#}");
            return status::fail(ctx, id, Anchor::Cursor(cursor), format!("{e:#}")).await;
        }
    };

    let Some(word) = word_at(&words, cursor).cloned() else {
        tracing::info!(">>> [WORD] No word under the cursor ({} words read)", words.len());
        return status::no_text(ctx, id, Anchor::Cursor(cursor)).await;
    };

    lookup_word(ctx, &request, word, &from, &to).await
}

async fn lookup_word(
    ctx: &PipelineContext,
    request: &CaptureRequest,
    word: WordBox,
    from: &str,
    to: &str,
) -> anyhow::Result<()> {
    let id = request.id;
    let anchor = Anchor::Word(word.region);

    let query = WordPreprocessor.process(&word.text);
    if query.is_empty() {
        tracing::info!(">>> [WORD] '{}' is only punctuation", word.text);
        return status::no_text(ctx, id, anchor).await;
    }

    if !status::progress(ctx, id, anchor, status::LOADING).await? {
        return Ok(());
    }

    tracing::info!(">>> [WORD] Looking up '{query}' ({from} -> {to})");
    let result = ctx.translator.translate(&query, CaptureMode::Word, from, to).await;
    tracing::debug!(
        ">>> [WORD] {} entries, {} failures in {:?}",
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
