use console_shell::{
    AppConfig, AppState, create_router,
    models::{MenuItem, NavigationOutcome, Notice, PageShell, ThemeState},
    storage::{KeyValueStore, MemoryStore, ROLE_KEY, THEME_KEY, TOKEN_KEY},
    theme::FixedColorScheme,
};
use reqwest::{StatusCode, header::LOCATION, redirect::Policy};
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct TestApp {
    pub address: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.expect("req fail")
    }

    async fn post(&self, path: &str) -> reqwest::Response {
        self.client.post(self.url(path)).send().await.expect("req fail")
    }
}

async fn spawn_app(entries: &[(&str, &str)]) -> TestApp {
    let store = Arc::new(MemoryStore::with_entries(entries));
    let state = AppState::new(
        AppConfig::default(),
        store.clone(),
        Arc::new(FixedColorScheme(false)),
    )
    .expect("console route table must be valid");
    state.theme.initialize();

    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    // Redirects are part of what these tests observe.
    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap();

    TestApp {
        address,
        store,
        client,
    }
}

fn location_of(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app(&[]).await;
    let response = app.get("/health").await;
    assert!(response.status().is_success());
}

// --- Page navigation ---

#[tokio::test]
async fn test_unauthenticated_page_redirects_to_login() {
    let app = spawn_app(&[]).await;

    let response = app.get("/tasks/list").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&response), "/login");
}

#[tokio::test]
async fn test_login_page_is_served_without_token() {
    let app = spawn_app(&[]).await;

    let response = app.get("/login").await;
    assert_eq!(response.status(), StatusCode::OK);

    let shell: PageShell = response.json().await.unwrap();
    assert_eq!(shell.view.as_deref(), Some("Login"));
    assert_eq!(shell.title, "Login - Midjourney Proxy");
    assert!(!shell.dark);
}

#[tokio::test]
async fn test_root_redirects_to_dashboard() {
    let app = spawn_app(&[(TOKEN_KEY, "abc")]).await;

    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&response), "/dashboard");
}

#[tokio::test]
async fn test_mixed_case_path_redirects_to_declared_path() {
    let app = spawn_app(&[(TOKEN_KEY, "abc")]).await;

    let response = app.get("/Tasks/List").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&response), "/tasks/list");
}

#[tokio::test]
async fn test_user_denied_admin_page_with_notice() {
    let app = spawn_app(&[(TOKEN_KEY, "abc"), (ROLE_KEY, "user")]).await;

    let response = app.get("/users/list").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&response), "/dashboard");

    let notices: Vec<Notice> = app.get("/api/notifications").await.json().await.unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "Insufficient permission");

    // Drained.
    let notices: Vec<Notice> = app.get("/api/notifications").await.json().await.unwrap();
    assert!(notices.is_empty());
}

#[tokio::test]
async fn test_admin_page_served_to_admin() {
    let app = spawn_app(&[(TOKEN_KEY, "abc"), (ROLE_KEY, "admin")]).await;

    let response = app.get("/users/list").await;
    assert_eq!(response.status(), StatusCode::OK);

    let shell: PageShell = response.json().await.unwrap();
    assert_eq!(shell.view.as_deref(), Some("UserList"));
    assert_eq!(shell.title, "User List - Midjourney Proxy");
    assert!(shell.menu.iter().any(|item| item.path == "/users"));
}

#[tokio::test]
async fn test_unknown_page_serves_not_found_view() {
    let app = spawn_app(&[(TOKEN_KEY, "abc")]).await;

    let response = app.get("/does/not/exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let shell: PageShell = response.json().await.unwrap();
    assert_eq!(shell.view.as_deref(), Some("NotFound"));
    assert_eq!(shell.title, "Page Not Found - Midjourney Proxy");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_page_loads_keep_their_own_outcome() {
    let app = spawn_app(&[(TOKEN_KEY, "abc"), (ROLE_KEY, "user")]).await;
    let pages = [
        ("/dashboard", "Dashboard - Midjourney Proxy"),
        ("/tasks/list", "Task List - Midjourney Proxy"),
        ("/accounts/list", "Account List - Midjourney Proxy"),
        ("/stats/overview", "Data Overview - Midjourney Proxy"),
    ];

    let mut requests = tokio::task::JoinSet::new();
    for i in 0..200 {
        let (path, title) = pages[i % pages.len()];
        let client = app.client.clone();
        let url = app.url(path);
        requests.spawn(async move {
            let response = client.get(url).send().await.expect("req fail");
            (path, title, response.status(), response.json::<PageShell>().await)
        });
    }

    while let Some(joined) = requests.join_next().await {
        let (path, title, status, shell) = joined.unwrap();
        assert_eq!(status, StatusCode::OK, "{path} answered {status}");
        let shell = shell.unwrap();
        assert_eq!(shell.path, path);
        assert_eq!(shell.title, title);
    }
}

// --- JSON API ---

#[tokio::test]
async fn test_menu_follows_stored_role() {
    let app = spawn_app(&[(TOKEN_KEY, "abc"), (ROLE_KEY, "user")]).await;

    let menu: Vec<MenuItem> = app.get("/api/menu").await.json().await.unwrap();
    assert!(!menu.iter().any(|item| item.path == "/users"));

    app.store.set(ROLE_KEY, "admin").unwrap();

    let menu: Vec<MenuItem> = app.get("/api/menu").await.json().await.unwrap();
    assert!(menu.iter().any(|item| item.path == "/users"));
    assert!(menu.iter().any(|item| item.path == "/settings"));
}

#[tokio::test]
async fn test_navigate_endpoint_reports_redirect() {
    let app = spawn_app(&[(TOKEN_KEY, "abc"), (ROLE_KEY, "user")]).await;

    let outcome: NavigationOutcome = app
        .client
        .post(app.url("/api/navigate"))
        .json(&serde_json::json!({ "path": "/settings" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    match outcome {
        NavigationOutcome::Committed {
            location,
            redirected_from,
            ..
        } => {
            assert_eq!(location.path, "/dashboard");
            assert_eq!(redirected_from.as_deref(), Some("/settings"));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn test_theme_toggle_round_trip() {
    let app = spawn_app(&[]).await;

    let theme: ThemeState = app.get("/api/theme").await.json().await.unwrap();
    assert!(!theme.is_dark);
    assert_eq!(theme.theme, "light");

    let theme: ThemeState = app.post("/api/theme/toggle").await.json().await.unwrap();
    assert!(theme.is_dark);
    assert_eq!(app.store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

    // Pages reflect the applied marker.
    app.store.set(TOKEN_KEY, "abc").unwrap();
    let shell: PageShell = app.get("/dashboard").await.json().await.unwrap();
    assert!(shell.dark);

    let theme: ThemeState = app.post("/api/theme/toggle").await.json().await.unwrap();
    assert!(!theme.is_dark);
    assert_eq!(app.store.get(THEME_KEY).unwrap().as_deref(), Some("light"));
}

#[tokio::test]
async fn test_theme_reinitialize_reads_storage() {
    let app = spawn_app(&[]).await;

    app.store.set(THEME_KEY, "dark").unwrap();
    let theme: ThemeState = app.post("/api/theme/init").await.json().await.unwrap();

    assert!(theme.is_dark);
}
