//! Process configuration, read once at startup.
//!
//! # Environment variables
//! - `API_ADDRESS` = bind address (default `0.0.0.0:8000`)
//! - `MOCK_MODE`   = `true`/`1`/`yes`/`on` forces synthetic reviews
//! - `GITHUB_API_BASE`, `GITHUB_TOKEN` = see [`ProviderConfig::from_env`]
//! - `LLM_PROVIDER` and the provider variables = see
//!   [`ai_llm_service::config::default_config`]

use ai_llm_service::{AiLlmError, LlmModelConfig, config::default_config::config_from_env};
use git_context_engine::ProviderConfig;
use tracing::{info, warn};

use crate::error_handler::AppResult;

const DEFAULT_ADDRESS: &str = "0.0.0.0:8000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub address: String,
    pub github: ProviderConfig,
    /// Completion backend; `None` selects mock reviews for the process lifetime.
    pub llm: Option<LlmModelConfig>,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let address = std::env::var("API_ADDRESS")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());

        let mock_mode = std::env::var("MOCK_MODE")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let github = ProviderConfig::from_env()?;
        let llm = choose_llm(mock_mode, config_from_env);

        Ok(Self {
            address,
            github,
            llm,
        })
    }
}

/// Loose boolean used for feature flags in env.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Live config unless mock mode is on or the LLM env cannot be loaded.
fn choose_llm<F>(mock_mode: bool, load: F) -> Option<LlmModelConfig>
where
    F: FnOnce() -> Result<LlmModelConfig, AiLlmError>,
{
    if mock_mode {
        info!("MOCK_MODE enabled, reviews will be synthetic");
        return None;
    }
    match load() {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!(error = %e, "LLM config unavailable, falling back to mock reviews");
            None
        }
    }
}
