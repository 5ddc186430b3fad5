//! API server entry point.
//!
//! Initializes logging, loads configuration from environment variables,
//! builds the coach and application state, and serves HTTP until the
//! process is terminated.

use tracing::info;
use tracing_subscriber::EnvFilter;

use skillforge_api::server::{ServerConfig, start_server};
use skillforge_api::state::AppState;
use skillforge_coach::Coach;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid, templates are missing,
/// or the listener cannot bind.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("skillforge-api starting");

    let coach = Coach::from_env()?;
    let server_config = ServerConfig::from_env()?;
    info!(
        host = server_config.host,
        port = server_config.port,
        "configuration loaded"
    );

    let state = AppState::new(coach);
    start_server(&server_config, state).await?;

    Ok(())
}
