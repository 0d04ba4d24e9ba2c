use std::sync::Arc;

use console_shell::{
    NotificationQueue, ShellDocument,
    auth::Credentials,
    models::{Decision, RouteMeta},
    navigation::{
        ConsoleGuard, NavigationGuard, Next, Resolution, RouteTable, console_route_table, decide,
        guard::INSUFFICIENT_PERMISSION, table::ResolvedRoute,
    },
    storage::{MemoryStore, ROLE_KEY, StorageState, TOKEN_KEY},
};

const ALL_TARGETS: &[&str] = &[
    "/",
    "/dashboard",
    "/tasks/list",
    "/tasks/test",
    "/accounts/list",
    "/users/list",
    "/settings/system",
    "/stats/overview",
    "/does/not/exist",
];

const ADMIN_ONLY: &[&str] = &["/users/list", "/settings/system"];

fn table() -> RouteTable {
    console_route_table().expect("console route table must be valid")
}

fn session(token: Option<&str>, role: &str) -> Credentials {
    Credentials {
        token: token.map(str::to_string),
        role: role.to_string(),
    }
}

// --- decide ---

#[test]
fn test_no_token_always_redirects_to_login() {
    let t = table();
    for role in ["user", "admin"] {
        for path in ALL_TARGETS {
            let decision = decide(&t.resolve(path), &session(None, role));
            assert_eq!(
                decision,
                Decision::Redirect { to: "/login".to_string() },
                "{path} without a token"
            );
        }
    }
}

#[test]
fn test_login_with_token_redirects_to_root() {
    let route = table().resolve("/login");
    for role in ["user", "admin", "guest"] {
        assert_eq!(
            decide(&route, &session(Some("abc"), role)),
            Decision::Redirect { to: "/".to_string() }
        );
    }
}

#[test]
fn test_login_without_token_proceeds() {
    let route = table().resolve("/login");
    assert_eq!(decide(&route, &Credentials::anonymous()), Decision::Proceed);
}

#[test]
fn test_admin_proceeds_everywhere() {
    let t = table();
    for path in ALL_TARGETS {
        assert_eq!(
            decide(&t.resolve(path), &session(Some("abc"), "admin")),
            Decision::Proceed,
            "admin on {path}"
        );
    }
}

#[test]
fn test_user_is_denied_admin_views_only() {
    let t = table();
    for path in ALL_TARGETS {
        let decision = decide(&t.resolve(path), &session(Some("abc"), "user"));
        if ADMIN_ONLY.contains(path) {
            assert_eq!(
                decision,
                Decision::Deny {
                    to: "/".to_string(),
                    notice: INSUFFICIENT_PERMISSION.to_string(),
                },
                "user on {path}"
            );
        } else {
            assert_eq!(decision, Decision::Proceed, "user on {path}");
        }
    }
}

#[test]
fn test_catch_all_is_navigable_for_any_role() {
    let route = table().resolve("/missing");
    for role in ["user", "admin", "auditor"] {
        assert_eq!(decide(&route, &session(Some("t"), role)), Decision::Proceed);
    }
}

#[test]
fn test_empty_role_set_admits_any_role() {
    let route = ResolvedRoute {
        path: "/open".to_string(),
        name: Some("Open".to_string()),
        meta: RouteMeta {
            roles: Some(vec![]),
            ..RouteMeta::default()
        },
        matched: vec!["/open".to_string()],
        redirected_from: None,
        catch_all: false,
    };
    assert_eq!(decide(&route, &session(Some("t"), "user")), Decision::Proceed);
}

// --- ConsoleGuard adapter ---

struct Harness {
    guard: ConsoleGuard,
    document: Arc<ShellDocument>,
    notices: Arc<NotificationQueue>,
}

fn harness(entries: &[(&str, &str)]) -> Harness {
    let store = Arc::new(MemoryStore::with_entries(entries)) as StorageState;
    let document = Arc::new(ShellDocument::new("Midjourney Proxy"));
    let notices = Arc::new(NotificationQueue::new());
    let guard = ConsoleGuard::new(store, document.clone(), notices.clone(), "Midjourney Proxy");
    Harness {
        guard,
        document,
        notices,
    }
}

async fn run_guard(guard: &ConsoleGuard, route: &ResolvedRoute) -> Resolution {
    let (next, rx) = Next::channel();
    guard.before_each(route, None, next);
    rx.await.expect("console guard always resolves its continuation")
}

#[tokio::test]
async fn test_guard_sets_title_even_when_denied() {
    let h = harness(&[(TOKEN_KEY, "abc"), (ROLE_KEY, "user")]);
    let route = table().resolve("/users/list");

    let resolution = run_guard(&h.guard, &route).await;

    assert_eq!(resolution, Resolution::Redirect("/".to_string()));
    assert_eq!(h.document.title(), "User List - Midjourney Proxy");
}

#[tokio::test]
async fn test_guard_emits_exactly_one_notice_on_denial() {
    let h = harness(&[(TOKEN_KEY, "abc"), (ROLE_KEY, "user")]);
    let route = table().resolve("/settings/system");

    run_guard(&h.guard, &route).await;

    let notices = h.notices.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, INSUFFICIENT_PERMISSION);
}

#[tokio::test]
async fn test_unauthenticated_redirect_has_no_notice() {
    let h = harness(&[]);
    let route = table().resolve("/users/list");

    let resolution = run_guard(&h.guard, &route).await;

    assert_eq!(resolution, Resolution::Redirect("/login".to_string()));
    assert!(h.notices.is_empty());
    // Title still applied before the access check.
    assert_eq!(h.document.title(), "User List - Midjourney Proxy");
}

#[tokio::test]
async fn test_missing_role_defaults_to_user() {
    let h = harness(&[(TOKEN_KEY, "abc")]);

    let resolution = run_guard(&h.guard, &table().resolve("/users/list")).await;
    assert_eq!(resolution, Resolution::Redirect("/".to_string()));

    let resolution = run_guard(&h.guard, &table().resolve("/tasks/list")).await;
    assert_eq!(resolution, Resolution::Proceed);
}

#[tokio::test]
async fn test_title_untouched_without_meta_title() {
    let h = harness(&[(TOKEN_KEY, "abc")]);
    let route = ResolvedRoute {
        path: "/bare".to_string(),
        name: None,
        meta: RouteMeta::default(),
        matched: vec![],
        redirected_from: None,
        catch_all: false,
    };

    run_guard(&h.guard, &route).await;
    assert_eq!(h.document.title(), "Midjourney Proxy");
}
