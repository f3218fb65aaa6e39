//! Error types for the trxgate API.
//!
//! Per-request failures never surface here: the pipeline turns them into a
//! `TransactionResponse`. These are the faults that stop the process.

use std::net::SocketAddr;

use crate::config::ConfigError;

/// trxgate API startup and serving errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to initialize tracing: {0}")]
    Telemetry(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}
