use std::sync::Arc;

use axum::{
    Router,
    extract::{FromRef, Request, State},
    http::{HeaderName, StatusCode},
    middleware,
    response::{IntoResponse, Redirect, Response},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod document;
pub mod error;
pub mod handlers;
pub mod models;
pub mod navigation;
pub mod notify;
pub mod storage;
pub mod theme;

// HTTP routing, split by how requests are treated (public, API, guarded pages).
pub mod routes;
use routes::{api, pages, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use document::{DocumentState, ShellDocument};
pub use error::{RouteTableError, StoreError};
pub use navigation::{ConsoleGuard, Navigator, RouteTable, console_route_table};
pub use notify::{NotificationQueue, Notifier};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageState};
pub use theme::{ColorSchemeProbe, FixedColorScheme, SystemColorScheme, ThemeController};

use models::NavigationOutcome;
use navigation::table::normalize_path;

/// ApiDoc
///
/// OpenAPI document for the JSON API, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::navigate, handlers::get_menu, handlers::get_notifications,
        handlers::get_theme, handlers::toggle_theme, handlers::init_theme
    ),
    components(
        schemas(
            models::NavigateRequest, models::NavigationOutcome, models::Location,
            models::ScrollPosition, models::MenuItem, models::Notice, models::NoticeLevel,
            models::ThemeState, models::RouteMeta, models::Decision, models::PageShell,
        )
    ),
    tags(
        (name = "console-shell", description = "Console navigation and presentation state API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single container for every service the console shell needs. Each piece
/// is created once at startup and shared; nothing here is a hidden global.
#[derive(Clone)]
pub struct AppState {
    /// Persisted key-value store (session credentials, theme).
    pub store: StorageState,
    /// Document title and root markers.
    pub document: DocumentState,
    /// Pending user-visible notices.
    pub notices: Arc<NotificationQueue>,
    pub theme: Arc<ThemeController>,
    /// The immutable console route tree, shared by every navigator.
    pub table: Arc<RouteTable>,
    /// The client's guarded navigation (POST /api/navigate). Page requests do
    /// not use it; each one runs in its own `page_navigation`.
    pub navigator: Arc<Navigator>,
    pub config: AppConfig,
}

impl AppState {
    /// new
    ///
    /// Wires the route table, guard, navigator and theme controller around one
    /// store and one document. The theme is not initialized here; call
    /// `state.theme.initialize()` at process start.
    pub fn new(
        config: AppConfig,
        store: StorageState,
        probe: Arc<dyn ColorSchemeProbe>,
    ) -> Result<Self, RouteTableError> {
        let table = Arc::new(console_route_table()?);
        let document = Arc::new(ShellDocument::new(&config.app_name));
        let notices = Arc::new(NotificationQueue::new());

        let guard = Arc::new(ConsoleGuard::new(
            store.clone(),
            document.clone(),
            notices.clone(),
            config.app_name.clone(),
        ));
        let navigator = Arc::new(Navigator::new(table.clone(), guard));
        let theme = Arc::new(ThemeController::new(store.clone(), document.clone(), probe));

        Ok(Self {
            store,
            document,
            notices,
            theme,
            table,
            navigator,
            config,
        })
    }

    /// page_navigation
    ///
    /// A navigator scoped to one page request. It has its own tickets and
    /// history and its guard writes the title into a request-local document,
    /// so concurrent page loads never supersede each other or swap titles.
    /// Credentials, notices and the route table are the shared ones.
    pub fn page_navigation(&self) -> (Navigator, DocumentState) {
        let document = Arc::new(ShellDocument::new(&self.config.app_name));
        let guard = Arc::new(ConsoleGuard::new(
            self.store.clone(),
            document.clone(),
            self.notices.clone(),
            self.config.app_name.clone(),
        ));
        (Navigator::new(self.table.clone(), guard), document)
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// navigation_guard
///
/// Middleware in front of every page route. It runs the requested path through
/// a request-scoped navigator (`AppState::page_navigation`) and maps the
/// outcome onto HTTP:
///
/// - committed at the requested path: the page handler runs with the committed
///   `Location` and its `PageTitle` in the request extensions;
/// - committed elsewhere (guard or redirect group): `303 See Other` to the
///   committed path;
/// - blocked: 403; superseded by a newer navigation: 409; redirect loop: 508.
async fn navigation_guard(
    State(state): State<AppState>,
    mut request: Request,
    next: middleware::Next,
) -> Response {
    let requested = normalize_path(request.uri().path());

    let (navigator, document) = state.page_navigation();

    match navigator.navigate(&requested).await {
        NavigationOutcome::Committed { location, .. } => {
            if location.path != requested {
                return Redirect::to(&location.path).into_response();
            }
            request.extensions_mut().insert(location);
            request
                .extensions_mut()
                .insert(handlers::PageTitle(document.title()));
            next.run(request).await
        }
        NavigationOutcome::Blocked { .. } => StatusCode::FORBIDDEN.into_response(),
        NavigationOutcome::Superseded => StatusCode::CONFLICT.into_response(),
        NavigationOutcome::RedirectLoop { .. } => StatusCode::LOOP_DETECTED.into_response(),
    }
}

/// create_router
///
/// Assembles the HTTP surface, applies the guard to page routes and the
/// observability layers to everything.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .nest("/api", api::api_routes())
        .merge(
            pages::page_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                navigation_guard,
            )),
        )
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for one HTTP request, tagged with its `x-request-id` so every log line
/// emitted while serving it (guard decisions included) can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
