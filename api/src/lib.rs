//! HTTP surface of the code review assistant.
//!
//! Routes:
//! - `GET  /`                     liveness message
//! - `POST /review`               structured review request → report JSON
//! - `POST /export-review`        report JSON → Markdown
//! - `POST /v1/chat/completions`  chat-shaped adapter over `/review`
//! - `GET  /v1/models`            pseudo-model listing for chat clients

pub mod app;
pub mod error_handler;
mod middleware_layer;
pub mod routes;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use code_reviewer::provider::{CompletionProvider, RepositoryContentProvider};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::{
    app::{
        app_state::{AppState, LiveState},
        config::AppConfig,
    },
    error_handler::{AppError, AppResult},
    middleware_layer::json_extractor::json_error_mapper,
    routes::{
        chat::{chat_completions_route::chat_completions_route, models_route::models_route},
        review::{export_review_route::export_review_route, review_route::review_route},
        status_route::status_route,
    },
};

pub async fn start() -> AppResult<()> {
    let config = AppConfig::from_env()?;
    let state = Arc::new(LiveState::from_config(&config)?);
    info!(
        address = %config.address,
        mock = state.pipeline.is_mock(),
        "starting code review API"
    );

    let app = router(state);

    // Bind to address
    let listener = TcpListener::bind(&config.address)
        .await
        .map_err(AppError::Bind)?;

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Builds the application router over any pair of collaborators.
pub fn router<R, C>(state: Arc<AppState<R, C>>) -> Router
where
    R: RepositoryContentProvider + Clone + 'static,
    C: CompletionProvider + 'static,
{
    Router::new()
        .route("/", get(status_route))
        .route("/review", post(review_route::<R, C>))
        .route("/export-review", post(export_review_route))
        .route("/v1/chat/completions", post(chat_completions_route::<R, C>))
        .route("/v1/models", get(models_route))
        .layer(middleware::from_fn(json_error_mapper))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
