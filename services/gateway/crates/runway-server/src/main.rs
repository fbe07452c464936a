//! Runway gateway entry point.
//!
//! Initialises tracing, loads configuration from environment variables
//! (prefixed with `RUNWAY_`), and serves the provisioning API over HTTP.

mod config;
mod routes;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use runway_core::domain::SessionSettings;
use runway_core::infra::descriptor::load_descriptor;
use runway_core::infra::github::GithubConnector;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialise tracing with RUST_LOG env filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("runway-server starting");

    // 2. Load configuration from RUNWAY_* env vars.
    let config = ServerConfig::from_env()?;
    let provision = config.provision_config()?;
    let default_mode = config.delivery_mode()?;

    // 3. Load the descriptor once; every session deploys the same bytes.
    let descriptor = load_descriptor(config.descriptor_file())?;

    tracing::info!(
        listen_addr = %config.listen_addr,
        api_url = %provision.api_url,
        visibility = %provision.visibility,
        default_mode = ?default_mode,
        poll_attempts = provision.poll.attempts,
        poll_interval_secs = provision.poll.interval_secs,
        custom_descriptor = config.descriptor_file.is_some(),
        "configuration loaded",
    );

    // 4. Build shared state.
    let connector = GithubConnector::new(&provision.api_url)?;
    let state = AppState::new(
        Arc::new(connector),
        SessionSettings::from_config(&provision, descriptor),
        default_mode,
    );

    // 5. Bind and serve.
    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .context("failed to bind TCP listener")?;

    tracing::info!("gateway ready at http://{}/api", config.listen_addr);

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("runway-server shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) for graceful shutdown.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}
