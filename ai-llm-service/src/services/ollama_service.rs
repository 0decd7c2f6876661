//! Ollama client for local review generation.
//!
//! Uses `POST {endpoint}/api/chat` with `stream=false` so the system prompt
//! travels as a proper `system` message instead of being glued onto the
//! user prompt.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    config::{
        llm_model_config::{GenerationOptions, LlmModelConfig},
        llm_provider::LlmProvider,
    },
    error_handler::{AiLlmError, Provider, ProviderError, ProviderErrorKind},
    services::{check_endpoint, status_error},
};

/// Thin client for Ollama.
#[derive(Debug)]
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    timeout: Duration,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - `InvalidProvider` if `cfg.provider` is not `Ollama`
    /// - `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(
                ProviderError::new(Provider::Ollama, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        let base = check_endpoint(Provider::Ollama, &cfg.endpoint)?;
        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(60));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        let url_chat = format!("{base}/api/chat");

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "OllamaService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
            timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Performs a non-streaming chat request via `/api/chat`.
    ///
    /// Mapped options:
    /// - `num_predict` ← `opts.max_tokens` or `cfg.max_tokens`
    /// - `temperature` ← `opts.temperature` or `cfg.temperature`
    /// - `top_p`       ← `cfg.top_p`
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        opts: GenerationOptions,
    ) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = ChatRequest::build(&self.cfg, prompt, system, opts);

        debug!("POST {}", self.url_chat);
        let resp = self
            .client
            .post(&self.url_chat)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiLlmError::from_transport(e, self.timeout))?;

        if !resp.status().is_success() {
            let err = status_error(Provider::Ollama, &self.url_chat, resp).await;
            error!(error = %err, "ollama chat returned non-success status");
            return Err(err.into());
        }

        let out: ChatResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::Decode(format!(
                    "serde error: {e}; ensure `stream=false` is used"
                )),
            )
        })?;

        let content = out.message.content;
        if content.trim().is_empty() {
            return Err(ProviderError::new(Provider::Ollama, ProviderErrorKind::EmptyChoices).into());
        }

        info!(
            latency_ms = started.elapsed().as_millis(),
            reply_len = content.len(),
            "ollama chat completed"
        );
        Ok(content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

impl<'a> ChatRequest<'a> {
    fn build(
        cfg: &'a LlmModelConfig,
        prompt: &'a str,
        system: Option<&'a str>,
        opts: GenerationOptions,
    ) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(sys) = system {
            messages.push(ChatMessage {
                role: "system",
                content: sys,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let (num_predict, temperature) = opts.resolve(cfg);
        Self {
            model: &cfg.model,
            messages,
            stream: false,
            options: ChatOptions {
                temperature,
                top_p: cfg.top_p,
                num_predict,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Subset of Ollama `options`.
#[derive(Debug, Default, Serialize)]
struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_maps_max_tokens_to_num_predict() {
        let cfg = LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "qwen3:14b".into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: Some(2000),
            temperature: Some(0.1),
            top_p: Some(0.9),
            timeout_secs: None,
        };
        let req = ChatRequest::build(&cfg, "hi", None, GenerationOptions::default());
        let v = serde_json::to_value(&req).unwrap();

        assert_eq!(v["stream"], false);
        assert_eq!(v["messages"].as_array().unwrap().len(), 1);
        assert_eq!(v["options"]["num_predict"], 2000);
    }

    #[test]
    fn response_without_content_decodes_to_empty() {
        let r: ChatResponse =
            serde_json::from_str(r#"{"model":"m","message":{"role":"assistant"},"done":true}"#)
                .unwrap();
        assert!(r.message.content.is_empty());
    }
}
