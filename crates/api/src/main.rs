//! TimeSync - time entry store with provider sync
//!
//! Main entry point for the HTTP service.

use std::sync::Arc;

use anyhow::Context;
use timesync_api::utils::logging::init_tracing;
use timesync_api::{build_router, AppContext};
use tracing::{debug, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the subscriber reads RUST_LOG / TIMESYNC_LOG_JSON
    let dotenv = dotenvy::dotenv();
    init_tracing();
    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(err) => debug!(error = %err, "No .env file loaded"),
    }

    let config = timesync_infra::config::load().context("failed to load configuration")?;
    let bind_addr = config.server.bind_addr.clone();

    let context = Arc::new(AppContext::new(config).context("failed to initialise application")?);
    let app = build_router(context);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "TimeSync API listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("TimeSync API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
