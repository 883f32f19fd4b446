//! vlmc instance launcher entry point.
//!
//! Initialises tracing, loads configuration from environment variables
//! (prefixed with `LAUNCHER_`), and serves `POST /api/instance`, which
//! spawns one `vlmc` process per call and returns its token and address.

mod error;
mod launcher;
mod routes;
mod state;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use launcher_common::LauncherConfig;
use tracing_subscriber::EnvFilter;

use crate::launcher::ProcessLauncher;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialise tracing with RUST_LOG env filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("vlmc-launcher starting");

    // 2. Load configuration from LAUNCHER_* env vars.
    let config = LauncherConfig::from_env()
        .context("failed to load config from LAUNCHER_* env vars")?;
    config.validate().context("invalid launcher configuration")?;

    tracing::info!(
        listen_addr = %config.listen_addr,
        executable  = %config.executable,
        config_path = %config.config_path,
        socket_host = %config.socket_host,
        port_min    = config.port_min,
        port_max    = config.port_max,
        "configuration loaded",
    );

    let listen_addr = config.listen_addr;

    // 3. Compose the router around an explicitly built state.
    let router = build_router(AppState::new(config, ProcessLauncher));

    // 4. Bind and serve; connect info carries the caller's address.
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .context("failed to bind TCP listener")?;

    tracing::info!("launcher ready at http://{listen_addr}/api/instance");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server error")?;

    tracing::info!("vlmc-launcher shut down");
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
