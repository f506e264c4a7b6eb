mod config;
mod error;
mod routes;

use anyhow::Context;
use clap::Parser;
use midweek_core::Workbook;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::routes::{AppState, router};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::parse();
    let workbook =
        Workbook::with_http(config.workbook_config(), config.fetch_config()).context("Invalid server configuration")?;
    let app = router(AppState::new(workbook), config.request_timeout());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!(addr = %config.bind, site_root = %config.site_root, "listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await.context("Server error")?;
    Ok(())
}
