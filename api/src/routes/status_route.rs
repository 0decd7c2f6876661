use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
}

/// Liveness probe.
pub async fn status_route() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Code Review Assistant API is running",
    })
}
