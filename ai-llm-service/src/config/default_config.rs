//! Default LLM config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_PROVIDER`     = provider kind (`openai` | `ollama`, default `openai`)
//! - `LLM_TIMEOUT_SECS` = optional request timeout (default 120)
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY`   = API key (mandatory)
//! - `OPENAI_BASE_URL`  = endpoint base (default `https://api.openai.com`)
//! - `OPENAI_MODEL`     = model id (default `gpt-3.5-turbo`)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = model id (default `qwen3:14b`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ConfigError, env_opt_u64, must_env, opt_env, validate_http_endpoint},
};

const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_OLLAMA_MODEL: &str = "qwen3:14b";

/// Builds the review model config for whichever provider `LLM_PROVIDER` names.
///
/// # Errors
/// - [`ConfigError::UnsupportedProvider`] for an unknown `LLM_PROVIDER`
/// - any error from the provider-specific constructors
pub fn config_from_env() -> Result<LlmModelConfig, AiLlmError> {
    let provider = match opt_env("LLM_PROVIDER") {
        Some(v) => v.parse::<LlmProvider>()?,
        None => LlmProvider::OpenAI,
    };
    match provider {
        LlmProvider::OpenAI => config_openai(),
        LlmProvider::Ollama => config_ollama(),
    }
}

/// Constructs a config for an OpenAI-compatible endpoint.
///
/// # Defaults
/// - `temperature = Some(0.1)`
/// - `max_tokens = Some(2000)`
pub fn config_openai() -> Result<LlmModelConfig, AiLlmError> {
    let api_key = must_env("OPENAI_API_KEY")?;
    let endpoint = opt_env("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE.to_string());
    validate_http_endpoint("OPENAI_BASE_URL", &endpoint)?;
    let model = opt_env("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens: Some(2000),
        temperature: Some(0.1),
        top_p: None,
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    })
}

/// Constructs a config for a local Ollama model.
pub fn config_ollama() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = ollama_endpoint()?;
    let model = opt_env("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string());

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens: Some(2000),
        temperature: Some(0.1),
        top_p: None,
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    })
}

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Some(url) = opt_env("OLLAMA_URL") {
        validate_http_endpoint("OLLAMA_URL", &url)?;
        return Ok(url);
    }
    if let Some(port) = opt_env("OLLAMA_PORT") {
        let _ = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{}", port.trim()));
    }
    Err(AiLlmError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}
