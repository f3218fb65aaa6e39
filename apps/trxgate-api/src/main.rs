//! # trxgate API
//!
//! HTTP server for partner transaction submission.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ApiConfig::load ──► init_tracing ──► AppState ──► bind ──► serve      │
//! │                                                              │          │
//! │                                          Ctrl+C / SIGTERM ───┘          │
//! │                                          graceful shutdown              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use trxgate_api::{app, telemetry, ApiConfig, ApiError, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ApiConfig::load().context("loading configuration")?;

    // Initialize tracing
    telemetry::init_tracing(config.log_format, &config.log_level)?;

    info!("Starting trxgate API server...");

    let addr = config.socket_addr()?;
    info!(
        %addr,
        freshness_window_secs = config.freshness_window_secs,
        max_body_bytes = config.max_body_bytes,
        configured_partners = config.partners.len(),
        "Configuration loaded"
    );
    if config.partners.is_empty() {
        warn!("No partners configured, serving the sandbox partners");
    }

    // Create shared state
    let state = AppState::from_config(config)?;

    // Bind and serve
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ApiError::Bind { addr, source })?;
    info!(%addr, "Listening for partner transactions");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ApiError::Serve)?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
///
/// A signal that cannot be installed is logged and never fires, so the
/// other one still triggers shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
