use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use code_reviewer::{Error as ReviewError, RepositoryError};
use git_context_engine::GitContextEngineError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    GitProvider(#[from] GitContextEngineError),

    // --- IO / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / review ---
    #[error(transparent)]
    Review(#[from] ReviewError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::Review(ReviewError::InvalidUrl(_) | ReviewError::Validation(_)) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Review(ReviewError::Repository(RepositoryError::NotFound(_))) => {
                StatusCode::NOT_FOUND
            }

            // upstream
            AppError::Review(ReviewError::Repository(_)) => StatusCode::BAD_GATEWAY,

            // 5xx, startup-only
            AppError::GitProvider(_)
            | AppError::Bind(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failure body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        }
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;
