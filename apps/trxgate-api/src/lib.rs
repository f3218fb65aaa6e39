//! # trxgate API
//!
//! HTTP endpoint through which registered partners submit signed
//! transactions.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           trxgate API                                   │
//! │                                                                         │
//! │  CatchPanicLayer → TraceLayer → DefaultBodyLimit → Router               │
//! │                                                       │                 │
//! │                  ┌────────────────────────────────────┼──────────┐      │
//! │                  ▼                                    ▼          │      │
//! │   POST /api/submittrxmessage                    GET /health      │      │
//! │          │                                                       │      │
//! │          ▼                                                       │      │
//! │   TransactionPipeline ──► InMemoryPartnerDirectory              │      │
//! │          │                                                       │      │
//! │          └──────────────► TracingAuditSink (trxgate::audit)      │      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`]. Environment variables:
//! - `TRXGATE_CONFIG` - path to a TOML file (default: `./trxgate.toml`, optional)
//! - `TRXGATE_HTTP_PORT` - HTTP port (default: 8080)
//! - `TRXGATE_BIND_ADDRESS` - listen address (default: 0.0.0.0)
//! - `TRXGATE_LOG_FORMAT` - `pretty` or `json`
//! - `TRXGATE_FRESHNESS_WINDOW_SECS` - allowed timestamp skew (default: 300)
//! - `TRXGATE_MAX_BODY_BYTES` - request body limit (default: 65536)

pub mod config;
pub mod error;
pub mod routes;
pub mod telemetry;

use std::any::Any;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use trxgate_core::TransactionPipeline;

use crate::config::ConfigError;

// Re-exports
pub use crate::config::ApiConfig;
pub use crate::error::ApiError;
pub use crate::telemetry::TracingAuditSink;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<TransactionPipeline>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(pipeline: TransactionPipeline, config: ApiConfig) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            config: Arc::new(config),
        }
    }

    /// Wires the partner directory, audit sink and freshness window from
    /// configuration.
    pub fn from_config(config: ApiConfig) -> Result<Self, ConfigError> {
        let pipeline = TransactionPipeline::new(
            Arc::new(config.directory()),
            Arc::new(TracingAuditSink),
        )
        .with_freshness_window(config.freshness_window()?);
        Ok(Self::new(pipeline, config))
    }
}

/// Builds the router with all middleware applied.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;
    let pipeline = state.pipeline.clone();

    Router::new()
        .merge(routes::health::router())
        .merge(routes::transaction::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(move |panic: Box<dyn Any + Send + 'static>| {
            panic_response(&pipeline, panic)
        }))
        .with_state(state)
}

/// A handler panicked. The partner sees the generic failure body, which is
/// audited under its own correlation id.
fn panic_response(pipeline: &TransactionPipeline, panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_default();
    tracing::error!(%detail, "request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(pipeline.report_internal_fault()),
    )
        .into_response()
}
