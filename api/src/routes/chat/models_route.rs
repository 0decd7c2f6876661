use axum::Json;
use chrono::Utc;

use crate::routes::chat::chat_response::{MODEL_ID, ModelCard, ModelList};

/// Lists the single review pseudo-model so chat clients can discover it.
pub async fn models_route() -> Json<ModelList> {
    Json(ModelList {
        object: "list",
        data: vec![ModelCard {
            id: MODEL_ID,
            object: "model",
            created: Utc::now().timestamp(),
            owned_by: MODEL_ID,
        }],
    })
}
