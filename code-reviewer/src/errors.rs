//! Crate-wide error hierarchy for code-reviewer.
//!
//! - Single root [`Error`] for everything that may abort a review request.
//! - [`RepositoryError`] is the failure vocabulary of the repository
//!   collaborator; provider crates map their HTTP failures into it.
//! - [`CompletionError`] and [`DegradedReason`] never escape the pipeline:
//!   they are turned into a fallback report at the boundary.

use std::fmt;

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type ReviewResult<T> = Result<T, Error>;

/// Root error type for the code-reviewer crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The input is neither a pull-request nor a repository URL.
    #[error("invalid GitHub URL: {0}")]
    InvalidUrl(String),

    /// Listing-level repository failure (file fetch failures are recovered per file).
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Request settings out of range.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Failures reported by a [`RepositoryContentProvider`](crate::provider::RepositoryContentProvider).
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// Repository, pull request or path does not exist (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Credentials missing or rejected (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Access denied (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// Rate limited (HTTP 429).
    #[error("rate limited")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Network failure, timeout or unexpected status.
    #[error("transport error: {0}")]
    Transport(String),

    /// Provider answered with a payload of unexpected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Failure of the completion collaborator. Recovered by the pipeline, never surfaced.
#[derive(Debug, Clone, Error)]
#[error("completion provider failed: {0}")]
pub struct CompletionError(pub String);

impl From<ai_llm_service::AiLlmError> for CompletionError {
    fn from(e: ai_llm_service::AiLlmError) -> Self {
        CompletionError(e.to_string())
    }
}

/// Label string outside of the [`IssueLabel`](crate::report::IssueLabel) enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown issue label: {0:?}")]
pub struct UnknownLabelError(pub String);

/// Why a review ended up as a synthetic report instead of the model's answer.
#[derive(Debug, Clone)]
pub enum DegradedReason {
    /// The completion provider failed; a fallback completion was used.
    Completion(CompletionError),
    /// The completion text was not a decodable JSON object.
    MalformedResponse(String),
}

impl fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradedReason::Completion(e) => write!(f, "{e}"),
            DegradedReason::MalformedResponse(msg) => f.write_str(msg),
        }
    }
}
