// =============================================================================
// coin-pulse: Main Entry Point
// =============================================================================
//
// Serves RSI-based market signals and news headlines for a single coin per
// request. All state is read-only after startup.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod coingecko;
mod cryptopanic;
mod indicators;
mod market_data;
mod service_config;
mod signals;
mod types;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::service_config::{ServiceConfig, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("coin-pulse starting up");

    let config_path =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = ServiceConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(path = %config_path, error = %e, "Failed to load config, using defaults");
        ServiceConfig::default()
    });
    config.apply_env_overrides();
    config.validate().context("invalid service configuration")?;

    if config.cryptopanic_api_key.is_empty() {
        warn!("CRYPTOPANIC_API_KEY is not set, /api/news requests will fail upstream");
    }

    info!(
        default_coin = %config.default_coin_id,
        default_news_symbol = %config.default_news_symbol,
        default_days = config.default_days,
        rsi_period = config.rsi_period,
        "Configuration ready"
    );

    // ── 2. Build shared state (upstream clients) ─────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::from_config(config)?);

    // ── 3. Serve until Ctrl+C ────────────────────────────────────────────
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!("coin-pulse shut down complete.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received, stopping gracefully");
}
