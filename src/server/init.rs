use anyhow::Result;
use tokio::net::TcpListener;

use super::AppState;
use super::routes::app;
use crate::utils::config::AppConfig;

/// Load configuration and serve the chart API until Ctrl-C.
pub async fn start_server() -> Result<()> {
    tracing::info!("[INIT] Starting chartwright");

    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config)?;

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("[INIT] Listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("[INIT] Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(why) = tokio::signal::ctrl_c().await {
        tracing::error!("[ERROR] Failed to listen for shutdown signal: {why:?}");
    }
}
