//! Injury Insight API Server
//!
//! Author: hephaex@gmail.com

use injury_api::{create_router, state::AppState};
use injury_core::config::AppConfig;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());
    if config.logging.json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    if config.auth.api_token.is_none() {
        tracing::error!("API_TOKEN is not set; plain api tokens will be rejected");
    }
    if config.auth.uses_placeholder_secret() {
        tracing::warn!("SECRET_KEY is not set; signed tokens use the placeholder secret");
    }
    if config.llm.api_key.is_none() {
        tracing::warn!("GROQ_API_KEY is not set; analysis requests will fail");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(dataset = %config.dataset.path.display(), "Using injury dataset");

    // Create application state
    let state = Arc::new(AppState::new(config)?);

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Injury Insight API starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
