use crate::context::PipelineContext;

/// Drops the active request; its late results are discarded
pub async fn handle_cancel(ctx: &PipelineContext) {
    let cancelled = ctx.state.session.lock().await.cancel();
    let aborted = ctx.abort_inflight();

    match (cancelled, aborted) {
        (Some(id), _) => tracing::info!("Cancelled request {id}"),
        (None, Some(id)) => tracing::debug!("Aborted leftover pipeline {id}"),
        (None, None) => {}
    }
}
