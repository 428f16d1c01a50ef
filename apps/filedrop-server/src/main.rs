//! Filedrop server binary
//!
//! Loads configuration, wires the pipeline and serves the HTTP API until
//! Ctrl-C, then waits for in-flight processing runs before exiting.

use anyhow::{Context, Result};
use filedrop_server::{config::Config, routes, AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Filedrop upload service");

    // Configuration is mandatory; a missing .env file aborts startup
    let config = Config::load().context("Failed to load configuration")?;

    let state = AppState::from_config(&config);
    let service = state.ingestion_service.clone();

    for root in service.storage().missing_roots() {
        warn!(path = %root.display(), "Storage root does not exist, uploads will fail");
    }

    // Build HTTP router
    let app = routes::create_router(state);

    let addr = config.bind_addr();
    info!(addr = %addr, "Starting HTTP server");

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Could not listen on {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(in_flight = service.in_flight(), "Stopping, waiting for processing runs");
    service.drain().await;
    info!("Finished");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
