use chrono::Utc;
use serde::Serialize;

use crate::routes::chat::chat_request::ChatMessage;

/// Pseudo-model id advertised to chat clients.
pub const MODEL_ID: &str = "code-review-assistant";

#[derive(Debug, Serialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: &'static str,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
}

impl ChatCompletionResponse {
    /// Single-choice, non-streamed assistant reply.
    pub fn assistant(model: &str, content: String) -> Self {
        let created = Utc::now().timestamp();
        Self {
            id: format!("chatcmpl-review-{created}"),
            object: "chat.completion",
            created,
            model: model.to_string(),
            choices: vec![ChatChoice {
                index: 0,
                message: ChatMessage {
                    role: "assistant".to_string(),
                    content,
                },
                finish_reason: "stop",
            }],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModelCard {
    pub id: &'static str,
    pub object: &'static str,
    pub created: i64,
    pub owned_by: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ModelList {
    pub object: &'static str,
    pub data: Vec<ModelCard>,
}
