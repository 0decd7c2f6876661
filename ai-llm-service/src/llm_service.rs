//! Provider-agnostic facade over the concrete LLM clients.

use tracing::{debug, info};

use crate::{
    config::{
        llm_model_config::{GenerationOptions, LlmModelConfig},
        llm_provider::LlmProvider,
    },
    error_handler::AiLlmError,
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

#[derive(Debug)]
enum Client {
    OpenAI(OpenAiService),
    Ollama(OllamaService),
}

/// Single entry point for chat-style completions regardless of backend.
///
/// The concrete client is picked once from [`LlmModelConfig::provider`].
#[derive(Debug)]
pub struct LlmService {
    client: Client,
    provider: LlmProvider,
}

impl LlmService {
    /// Builds the client matching `cfg.provider`.
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let provider = cfg.provider;
        let client = match provider {
            LlmProvider::OpenAI => Client::OpenAI(OpenAiService::new(cfg)?),
            LlmProvider::Ollama => Client::Ollama(OllamaService::new(cfg)?),
        };
        info!(?provider, "LLM service ready");
        Ok(Self { client, provider })
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    pub fn model(&self) -> &str {
        match &self.client {
            Client::OpenAI(c) => c.model(),
            Client::Ollama(c) => c.model(),
        }
    }

    /// Sends `[system, user]` and returns the assistant text.
    pub async fn complete(
        &self,
        system: &str,
        prompt: &str,
        opts: GenerationOptions,
    ) -> Result<String, AiLlmError> {
        debug!(provider = ?self.provider, prompt_len = prompt.len(), "dispatching completion");
        match &self.client {
            Client::OpenAI(c) => c.generate(prompt, Some(system), opts).await,
            Client::Ollama(c) => c.generate(prompt, Some(system), opts).await,
        }
    }
}
