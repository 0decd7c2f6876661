use std::error::Error;

use ai_llm_service::telemetry;
use tracing::{Level, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // `.env` is optional; real environment variables always win.
    let dotenv = dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", Level::INFO))
        .with(telemetry::layer())
        .try_init()?;

    if let Some(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    api::start().await?;

    Ok(())
}
