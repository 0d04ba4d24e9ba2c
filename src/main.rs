use console_shell::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    storage::{FileStore, StorageState},
    theme::{ColorSchemeProbe, FixedColorScheme, SystemColorScheme},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point of the console shell: configuration, logging, persisted store,
/// theme initialization and the HTTP host.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast in production)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise development defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "console_shell=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Console shell starting in {:?} mode", config.env);

    // 3. Persisted store
    let store = Arc::new(FileStore::new(config.storage_path.clone())) as StorageState;
    tracing::info!(path = %config.storage_path.display(), "persisted store ready");

    // 4. OS color scheme source
    let probe: Arc<dyn ColorSchemeProbe> = match config.color_scheme {
        Some(scheme) => Arc::new(FixedColorScheme(scheme.is_dark())),
        None => Arc::new(SystemColorScheme),
    };

    // 5. State assembly and theme initialization
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState::new(config, store, probe)
        .expect("FATAL: console route table is invalid.");
    app_state.theme.initialize();

    // 6. Router and server startup
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: failed to bind the HTTP listener. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at: http://{}/swagger-ui", bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "HTTP server stopped");
    }
}
