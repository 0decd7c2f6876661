use axum::extract::Json;
use code_reviewer::{ReviewReport, markdown};
use serde::Serialize;
use tracing::{debug, instrument};

#[derive(Debug, Serialize)]
pub struct ExportReviewResponse {
    pub markdown: String,
}

/// Renders a previously returned report as Markdown.
#[instrument(name = "export_review_route", skip_all, fields(issues = report.issues.len()))]
pub async fn export_review_route(Json(report): Json<ReviewReport>) -> Json<ExportReviewResponse> {
    let markdown = markdown::render(&report);
    debug!(bytes = markdown.len(), "report rendered");
    Json(ExportReviewResponse { markdown })
}
