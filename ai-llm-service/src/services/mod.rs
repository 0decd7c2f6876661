pub mod ollama_service;
pub mod open_ai_service;

use crate::error_handler::{
    AiLlmError, HttpError, Provider, ProviderError, ProviderErrorKind, make_snippet,
};

/// Validates the endpoint scheme and returns it without a trailing slash.
pub(crate) fn check_endpoint(provider: Provider, endpoint: &str) -> Result<String, AiLlmError> {
    let trimmed = endpoint.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.trim_end_matches('/').to_string())
    } else {
        Err(ProviderError::new(
            provider,
            ProviderErrorKind::InvalidEndpoint(endpoint.to_string()),
        )
        .into())
    }
}

/// Turns a non-success response into a [`ProviderError`] carrying a body snippet.
pub(crate) async fn status_error(
    provider: Provider,
    url: &str,
    resp: reqwest::Response,
) -> ProviderError {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    ProviderError::new(
        provider,
        ProviderErrorKind::HttpStatus(HttpError {
            status,
            url: url.to_string(),
            snippet: make_snippet(&text),
        }),
    )
}
