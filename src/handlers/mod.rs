pub mod health;
pub mod stats;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Operational surface: liveness and queue counters
pub fn status_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health))
        .route("/health", get(health::health))
        .route("/stats", get(stats::get_stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
