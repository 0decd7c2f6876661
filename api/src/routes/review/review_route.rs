use std::sync::Arc;

use axum::extract::{Json, State};
use code_reviewer::{
    ReviewReport,
    provider::{CompletionProvider, RepositoryContentProvider},
};
use tracing::{info, instrument};

use crate::{
    app::app_state::AppState, error_handler::AppResult,
    routes::review::review_request::ReviewRequest,
};

/// Runs a review of a GitHub repository or pull request.
///
/// Invalid URLs and out-of-range settings are rejected with 400, missing
/// repositories with 404 and other GitHub failures with 502. Completion
/// problems never fail the request; the report is degraded instead.
#[instrument(
    name = "review_route",
    skip(state, body),
    fields(url = %body.url, mock = state.pipeline.is_mock())
)]
pub async fn review_route<R, C>(
    State(state): State<Arc<AppState<R, C>>>,
    Json(body): Json<ReviewRequest>,
) -> AppResult<Json<ReviewReport>>
where
    R: RepositoryContentProvider + Clone + 'static,
    C: CompletionProvider + 'static,
{
    let settings = body.settings.unwrap_or_default();
    let report = state
        .pipeline
        .run(&body.url, body.file_paths.as_deref(), &settings)
        .await?;

    info!(
        files = report.total_files_analyzed,
        issues = report.issues.len(),
        latency_ms = (report.analysis_time_seconds * 1000.0) as u64,
        "review completed"
    );
    Ok(Json(report))
}
