//! # smartbus-server
//!
//! HTTP server for SmartBus phone-number login.
//!
//! This binary provides:
//! - `POST /api/auth/send-otp` and `POST /api/auth/verify-otp`
//! - OpenAPI documentation via Swagger UI
//! - Structured logging to file and stdout
//!
//! ## Running
//!
//! ```bash
//! # Development, codes are printed to the log
//! cargo run --package smartbus-server
//!
//! # Production
//! SMARTBUS_CONFIG=/etc/smartbus/smartbus.toml ./smartbus-server
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::sync::Arc;

use anyhow::Context;
use smartbus_core::{OtpStore, SmartbusConfig};
use smartbus_server::{api, logging, state::AppState};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = SmartbusConfig::load().context("failed to load configuration")?;

    logging::init(config.server.production)?;

    config.validate().context("invalid configuration")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        production = config.server.production,
        delivery = ?config.delivery.mode,
        "Starting smartbus-server"
    );

    let state = AppState::from_config(&config)?;
    if state.console_delivery() {
        warn!("Development mode: OTP codes are printed to the log instead of sent by SMS");
    }

    let sweeper = config
        .otp
        .sweep_interval()
        .map(|every| OtpStore::spawn_sweeper(Arc::clone(state.otp()), every));

    let app = api::create_app(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = sweeper {
        handle.abort();
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
