// Learning Path Mentor - chat completion proxy

pub mod api;
pub mod config;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub async fn run() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::AppConfig::load()?;
    if config.openrouter.api_key.is_none() {
        tracing::warn!("OPENROUTER_API_KEY is not set; chat requests will fail with 500");
    }

    tracing::info!("Starting API server...");
    api::start_server(config).await
}
