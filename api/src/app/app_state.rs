use ai_llm_service::LlmService;
use code_reviewer::{CompletionMode, ReviewPipeline};
use git_context_engine::GitHubClient;
use tracing::{info, warn};

use crate::{app::config::AppConfig, error_handler::AppResult};

/// Shared state for all HTTP handlers.
///
/// Generic over the collaborators so routes can be driven by in-memory
/// fakes in tests; production uses [`LiveState`].
#[derive(Debug)]
pub struct AppState<R, C> {
    pub pipeline: ReviewPipeline<R, C>,
}

/// State wired to GitHub and the configured LLM backend.
pub type LiveState = AppState<GitHubClient, LlmService>;

impl<R, C> AppState<R, C> {
    pub fn new(pipeline: ReviewPipeline<R, C>) -> Self {
        Self { pipeline }
    }
}

impl LiveState {
    /// Builds the GitHub client and picks the completion strategy once.
    pub fn from_config(cfg: &AppConfig) -> AppResult<Self> {
        let github = GitHubClient::from_config(cfg.github.clone())?;

        let completion = match cfg.llm.clone().map(LlmService::new) {
            Some(Ok(svc)) => {
                info!(provider = ?svc.provider(), model = svc.model(), "live completions enabled");
                CompletionMode::Live(svc)
            }
            Some(Err(e)) => {
                warn!(error = %e, "LLM client could not be built, using mock reviews");
                CompletionMode::Mock
            }
            None => CompletionMode::Mock,
        };

        Ok(Self::new(ReviewPipeline::new(github, completion)))
    }
}
