//! Route configuration.

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::handlers;

/// Create the application router.
pub fn create_router() -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/resolve", get(handlers::resolve_purl))
        .layer(TraceLayer::new_for_http())
}
