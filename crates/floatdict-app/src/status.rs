use floatdict_types::{Anchor, AppEvent};
use uuid::Uuid;

use crate::context::PipelineContext;

pub use floatdict_ui::format::{LOADING, READING_SENTENCE, TRANSLATING_SENTENCE};

/// Interim tooltip text; false once the request is no longer current
pub async fn progress(
    ctx: &PipelineContext,
    id: Uuid,
    anchor: Anchor,
    status: &str,
) -> anyhow::Result<bool> {
    ctx.send_if_current(
        id,
        AppEvent::ShowStatus {
            request_id: id,
            anchor,
            status: status.to_string(),
        },
    )
    .await
}

/// "No text found" and back to Idle
pub async fn no_text(ctx: &PipelineContext, id: Uuid, anchor: Anchor) -> anyhow::Result<()> {
    ctx.finish(
        id,
        AppEvent::ShowNoText {
            request_id: id,
            anchor,
        },
    )
    .await
}

pub async fn fail(
    ctx: &PipelineContext,
    id: Uuid,
    anchor: Anchor,
    message: String,
) -> anyhow::Result<()> {
    ctx.finish(
        id,
        AppEvent::ShowError {
            request_id: id,
            anchor,
            message,
        },
    )
    .await
}
