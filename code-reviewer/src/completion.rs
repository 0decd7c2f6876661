//! [`CompletionProvider`] backed by the shared LLM service.

use ai_llm_service::{GenerationOptions, LlmService};
use tracing::warn;

use crate::{
    errors::CompletionError,
    provider::{CompletionProvider, CompletionRequest},
};

impl CompletionProvider for LlmService {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, CompletionError> {
        let opts = GenerationOptions {
            max_tokens: Some(request.max_tokens),
            temperature: Some(request.temperature),
        };
        LlmService::complete(self, request.system, request.prompt, opts)
            .await
            .map_err(|e| {
                warn!(provider = ?self.provider(), model = self.model(), error = %e, "LLM call failed");
                CompletionError::from(e)
            })
    }
}
