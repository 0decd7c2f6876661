use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Json, State},
};
use code_reviewer::{
    conversation::{self, HELP_MESSAGE, ParsedRequest},
    provider::{CompletionProvider, RepositoryContentProvider},
};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    app::app_state::AppState,
    routes::chat::{
        chat_request::ChatCompletionRequest,
        chat_response::{ChatCompletionResponse, MODEL_ID},
    },
};

/// Chat-completion adapter over the review pipeline.
///
/// Always answers 200 with a chat-shaped body: a rendered review, the help
/// text when no GitHub URL is found, or an inline error message. The body is
/// parsed by hand so malformed JSON also ends up as help text.
#[instrument(name = "chat_completions_route", skip_all, fields(bytes = body.len()))]
pub async fn chat_completions_route<R, C>(
    State(state): State<Arc<AppState<R, C>>>,
    body: Bytes,
) -> Json<ChatCompletionResponse>
where
    R: RepositoryContentProvider + Clone + 'static,
    C: CompletionProvider + 'static,
{
    let request = match serde_json::from_slice::<ChatCompletionRequest>(&body) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "unparseable chat request, replying with help");
            return Json(ChatCompletionResponse::assistant(
                MODEL_ID,
                HELP_MESSAGE.to_string(),
            ));
        }
    };

    debug!(
        messages = request.messages.len(),
        stream = ?request.stream,
        max_tokens = ?request.max_tokens,
        temperature = ?request.temperature,
        "chat request received"
    );

    let model = request
        .model
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(MODEL_ID)
        .to_string();

    let parsed = request.last_user_message().and_then(conversation::extract);
    let content = match parsed {
        Some(parsed) => run_review(state, parsed).await,
        None => {
            debug!("no GitHub URL in chat message, replying with help");
            HELP_MESSAGE.to_string()
        }
    };

    Json(ChatCompletionResponse::assistant(&model, content))
}

/// Runs the pipeline on its own task so even a panic turns into a reply.
async fn run_review<R, C>(state: Arc<AppState<R, C>>, parsed: ParsedRequest) -> String
where
    R: RepositoryContentProvider + Clone + 'static,
    C: CompletionProvider + 'static,
{
    info!(url = %parsed.url, "conversational review requested");
    let task = tokio::spawn(async move {
        state
            .pipeline
            .run(&parsed.url, parsed.file_paths.as_deref(), &parsed.settings)
            .await
    });

    match task.await {
        Ok(Ok(report)) => conversation::compose_reply(&report),
        Ok(Err(e)) => {
            warn!(error = %e, "conversational review failed");
            format!("Error processing code review request: {e}")
        }
        Err(e) => {
            error!(error = %e, "review task aborted");
            format!("Error processing code review request: {e}")
        }
    }
}
