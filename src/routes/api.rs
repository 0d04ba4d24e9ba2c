use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// API Router Module
///
/// The JSON surface consumed by the console's layout and pages.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // POST /api/navigate
        // Runs a guarded in-app navigation and returns its outcome.
        .route("/navigate", post(handlers::navigate))
        // GET /api/menu
        // Menu projection for the role currently held in storage.
        .route("/menu", get(handlers::get_menu))
        // GET /api/notifications
        // Drains pending user-visible notices.
        .route("/notifications", get(handlers::get_notifications))
        // GET /api/theme, POST /api/theme/toggle, POST /api/theme/init
        .route("/theme", get(handlers::get_theme))
        .route("/theme/toggle", post(handlers::toggle_theme))
        .route("/theme/init", post(handlers::init_theme))
}
