//! HTTP server entry point.
//!
//! Loads the classifier artifact, builds the router and serves on port 5000.

use std::sync::Arc;

use anyhow::Result;
use recovery_server::{create_app, ServerConfig, ServerState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = ServerConfig::default();
    info!("Loading model from {}", config.model_path.display());
    let state = Arc::new(ServerState::load(&config)?);

    let app = create_app(state);

    info!("Starting server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str()).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
