//! # evreg-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the evidence registry.
//! Binds to a configurable port (default 8080). With `SNAPSHOT_PATH` set,
//! the registry is restored at startup and written back on Ctrl-C or
//! SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use evreg_api::server;
use evreg_api::state::{AppConfig, AppState, LogFormat};
use evreg_core::SystemClock;
use evreg_registry::{load_registry, EvidenceRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().map_err(anyhow::Error::msg)?;
    init_tracing(config.log_format);

    if config.auth_token.is_none() {
        tracing::warn!("AUTH_TOKEN not set: bearer values are trusted as caller identities");
    }
    tracing::info!(?config, "configuration loaded");

    let registry = match &config.snapshot_path {
        Some(path) => load_registry(path, Arc::new(SystemClock))
            .with_context(|| format!("loading registry from {}", path.display()))?,
        None => EvidenceRegistry::new(),
    };
    tracing::info!(records = registry.len(), "registry ready");

    let state = AppState::with_registry(config.clone(), registry);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("evidence registry API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    server::run(listener, state, server::shutdown_signal()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}
