use crate::AppState;
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints that never consult the session.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Used by monitoring; returns "ok" as soon as the shell is serving.
        .route("/health", get(|| async { "ok" }))
}
