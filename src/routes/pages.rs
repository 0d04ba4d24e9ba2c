use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Pages Router Module
///
/// Every console view is served from these two routes. The caller layers the
/// navigation guard middleware on top, so by the time `render_page` runs the
/// location has been committed and a `Location` extension is present.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::render_page))
        .route("/{*path}", get(handlers::render_page))
}
