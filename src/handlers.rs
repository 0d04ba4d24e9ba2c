use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    auth::Credentials,
    document::DARK_MARKER,
    models::{Location, MenuItem, NavigateRequest, NavigationOutcome, Notice, PageShell, ThemeState},
    navigation::project_menu,
};

// --- Navigation ---

/// navigate
///
/// Runs a guarded navigation through the shared navigator and reports how it
/// settled. Used by the web client for in-app (history API) navigation, where
/// no page request reaches the server.
#[utoipa::path(
    post,
    path = "/api/navigate",
    request_body = NavigateRequest,
    responses((status = 200, description = "Navigation outcome", body = NavigationOutcome))
)]
pub async fn navigate(
    State(state): State<AppState>,
    Json(payload): Json<NavigateRequest>,
) -> Json<NavigationOutcome> {
    Json(state.navigator.navigate(&payload.path).await)
}

/// get_menu
///
/// The menu projection for the role currently held in storage. Computed on
/// every call so a role change is visible on the next render.
#[utoipa::path(
    get,
    path = "/api/menu",
    responses((status = 200, description = "Visible menu entries", body = [MenuItem]))
)]
pub async fn get_menu(
    credentials: Credentials,
    State(state): State<AppState>,
) -> Json<Vec<MenuItem>> {
    Json(project_menu(state.navigator.table(), &credentials.role))
}

/// get_notifications
///
/// Drains the notices raised since the last call (e.g. "Insufficient permission").
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses((status = 200, description = "Pending notices", body = [Notice]))
)]
pub async fn get_notifications(State(state): State<AppState>) -> Json<Vec<Notice>> {
    Json(state.notices.drain())
}

// --- Theme ---

#[utoipa::path(
    get,
    path = "/api/theme",
    responses((status = 200, description = "Current theme", body = ThemeState))
)]
pub async fn get_theme(State(state): State<AppState>) -> Json<ThemeState> {
    Json(ThemeState::from(state.theme.is_dark()))
}

#[utoipa::path(
    post,
    path = "/api/theme/toggle",
    responses((status = 200, description = "Theme after toggling", body = ThemeState))
)]
pub async fn toggle_theme(State(state): State<AppState>) -> Json<ThemeState> {
    Json(ThemeState::from(state.theme.toggle()))
}

/// init_theme
///
/// Re-derives the theme from storage, or from the OS preference when nothing is stored.
#[utoipa::path(
    post,
    path = "/api/theme/init",
    responses((status = 200, description = "Theme after re-initialization", body = ThemeState))
)]
pub async fn init_theme(State(state): State<AppState>) -> Json<ThemeState> {
    Json(ThemeState::from(state.theme.initialize()))
}

// --- Pages ---

/// The document title the guard applied while committing a page request.
#[derive(Debug, Clone)]
pub struct PageTitle(pub String);

/// render_page
///
/// Serves the shell document for a location the navigation guard has already
/// committed. The catch-all view is served with 404.
pub async fn render_page(
    Extension(location): Extension<Location>,
    Extension(PageTitle(title)): Extension<PageTitle>,
    credentials: Credentials,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let table = &state.table;
    let status = if table.resolve(&location.path).catch_all {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };

    let shell = PageShell {
        view: location.name,
        path: location.path,
        title,
        dark: state.document.has_marker(DARK_MARKER),
        menu: project_menu(table, &credentials.role),
    };

    (status, Json(shell))
}
