//! Git hosting providers.
//!
//! Only GitHub is supported; the client implements the reviewer's
//! `RepositoryContentProvider` contract directly.

pub mod github;

use tracing::debug;

use crate::errors::{GitContextEngineConfigError, GitContextEngineResult};

pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";

/// Runtime configuration for the GitHub client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// API base, e.g. "https://api.github.com" or a GHES `/api/v3` root.
    pub base_api: String,
    /// Optional access token; requests are anonymous without it.
    pub token: Option<String>,
}

impl ProviderConfig {
    /// Reads `GITHUB_API_BASE` and `GITHUB_TOKEN`.
    pub fn from_env() -> GitContextEngineResult<Self> {
        let base_api = std::env::var("GITHUB_API_BASE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GITHUB_API.to_string());
        let token = std::env::var("GITHUB_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let cfg = Self { base_api, token };
        cfg.validate()?;
        debug!(base_api = %cfg.base_api, has_token = cfg.token.is_some(), "GitHub config loaded");
        Ok(cfg)
    }

    pub fn validate(&self) -> GitContextEngineResult<()> {
        let b = self.base_api.trim();
        if b.starts_with("http://") || b.starts_with("https://") {
            Ok(())
        } else {
            Err(GitContextEngineConfigError::InvalidBaseUrl(self.base_api.clone()).into())
        }
    }
}
