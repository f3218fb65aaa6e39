//! Liveness check.

use axum::routing::get;
use axum::Router;

use crate::AppState;

pub const HEALTH_PATH: &str = "/health";

pub fn router() -> Router<AppState> {
    Router::new().route(HEALTH_PATH, get(liveness))
}

/// GET /health. The process is up and serving.
async fn liveness() -> &'static str {
    "ok"
}
