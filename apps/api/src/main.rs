mod answers;
mod config;
mod errors;
mod extraction;
mod generation;
mod llm_client;
mod models;
mod results;
mod routes;
mod session;
mod state;

#[cfg(test)]
mod tests;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::store::FsSessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Proctor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize session storage
    let store = FsSessionStore::open(config.storage_dir.clone()).await?;
    info!("Session storage at {}", store.root().display());

    // Initialize LLM client
    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.llm_model.clone(),
        config.llm_max_tokens,
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    // Build app state
    let state = AppState::new(Arc::new(store), Arc::new(llm), config.clone());
    info!(
        "Generation queue: {} concurrent, {} admitted, {}s deadline",
        config.max_concurrent_generations,
        config.max_pending_generations,
        config.generation_timeout_secs
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
