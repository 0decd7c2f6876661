//! Crate-wide error hierarchy for git-context-engine.

use code_reviewer::RepositoryError;
use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type GitContextEngineResult<T> = Result<T, GitContextEngineError>;

/// Root error type for the git-context-engine crate.
#[derive(Debug, Error)]
pub enum GitContextEngineError {
    /// GitHub related failure.
    #[error(transparent)]
    Provider(#[from] GitContextEngineProviderError),

    /// Configuration problems (bad base URL, unusable token).
    #[error(transparent)]
    Config(#[from] GitContextEngineConfigError),
}

/// Provider-specific error used inside the provider layer.
#[derive(Debug, Error)]
pub enum GitContextEngineProviderError {
    /// Unauthorized (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// Not found (HTTP 404); carries the requested URL.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limited (HTTP 429, or 403 with an exhausted quota).
    #[error("rate limited")]
    RateLimited {
        /// Optional `Retry-After` hint in seconds when available.
        retry_after_secs: Option<u64>,
    },

    /// Gateway / server error (HTTP 5xx).
    #[error("server error: status {0}")]
    Server(u16),

    /// Other HTTP status (non-2xx) not covered by specific variants.
    #[error("http status error: status {0}")]
    HttpStatus(u16),

    /// Timeout at transport level.
    #[error("timeout")]
    Timeout,

    /// Network/transport failure without HTTP status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),

    /// Unexpected/invalid shape of provider response.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Configuration and setup errors.
#[derive(Debug, Error)]
pub enum GitContextEngineConfigError {
    /// Token contains characters that cannot be sent in a header.
    #[error("invalid provider token")]
    InvalidToken,

    /// Invalid base API URL.
    #[error("invalid base api url: {0}")]
    InvalidBaseUrl(String),
}

impl GitContextEngineProviderError {
    /// Maps a non-success status to the matching variant.
    pub fn from_status(code: u16, url: &str, retry_after_secs: Option<u64>) -> Self {
        match code {
            401 => Self::Unauthorized,
            403 if retry_after_secs.is_some() => Self::RateLimited { retry_after_secs },
            403 => Self::Forbidden,
            404 => Self::NotFound(url.to_string()),
            429 => Self::RateLimited { retry_after_secs },
            500..=599 => Self::Server(code),
            _ => Self::HttpStatus(code),
        }
    }
}

// ===== Conversions for `?` ergonomics at the crate root =====

impl From<reqwest::Error> for GitContextEngineError {
    fn from(e: reqwest::Error) -> Self {
        GitContextEngineError::Provider(GitContextEngineProviderError::from(e))
    }
}

impl From<reqwest::Error> for GitContextEngineProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return GitContextEngineProviderError::Timeout;
        }
        if let Some(status) = e.status() {
            let url = e.url().map(|u| u.to_string()).unwrap_or_default();
            return GitContextEngineProviderError::from_status(status.as_u16(), &url, None);
        }
        if e.is_decode() {
            return GitContextEngineProviderError::InvalidResponse(e.to_string());
        }
        GitContextEngineProviderError::Network(e.to_string())
    }
}

// ===== Into the reviewer's collaborator vocabulary =====

impl From<GitContextEngineProviderError> for RepositoryError {
    fn from(e: GitContextEngineProviderError) -> Self {
        use GitContextEngineProviderError as P;
        match e {
            P::Unauthorized => RepositoryError::Unauthorized,
            P::Forbidden => RepositoryError::Forbidden,
            P::NotFound(what) => RepositoryError::NotFound(what),
            P::RateLimited { retry_after_secs } => RepositoryError::RateLimited { retry_after_secs },
            P::InvalidResponse(msg) => RepositoryError::InvalidResponse(msg),
            other @ (P::Server(_) | P::HttpStatus(_) | P::Timeout | P::Network(_)) => {
                RepositoryError::Transport(other.to_string())
            }
        }
    }
}

impl From<GitContextEngineError> for RepositoryError {
    fn from(e: GitContextEngineError) -> Self {
        match e {
            GitContextEngineError::Provider(p) => p.into(),
            GitContextEngineError::Config(c) => RepositoryError::Transport(c.to_string()),
        }
    }
}
