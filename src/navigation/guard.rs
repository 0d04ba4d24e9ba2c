use tokio::sync::oneshot;

use crate::{
    auth::Credentials,
    document::DocumentState,
    models::{Decision, Location, Notice},
    notify::NotifierState,
    storage::StorageState,
};

use super::table::ResolvedRoute;

pub const LOGIN_PATH: &str = "/login";
pub const ROOT_PATH: &str = "/";

/// Message shown when an authenticated session lacks the role a view requires.
pub const INSUFFICIENT_PERMISSION: &str = "Insufficient permission";

/// decide
///
/// The pure authorization check. Rules apply in a fixed order and the first
/// one that matches determines the result:
///
/// 1. The login view: a session with a token goes to the root, anyone else proceeds.
/// 2. No token: redirect to the login view, whatever the target.
/// 3. A non-empty `roles` set without the session role: deny, back to the root.
/// 4. Otherwise proceed.
pub fn decide(target: &ResolvedRoute, credentials: &Credentials) -> Decision {
    if target.path == LOGIN_PATH {
        return if credentials.is_authenticated() {
            Decision::Redirect {
                to: ROOT_PATH.to_string(),
            }
        } else {
            Decision::Proceed
        };
    }

    if !credentials.is_authenticated() {
        return Decision::Redirect {
            to: LOGIN_PATH.to_string(),
        };
    }

    if target.meta.excludes_role(&credentials.role) {
        return Decision::Deny {
            to: ROOT_PATH.to_string(),
            notice: INSUFFICIENT_PERMISSION.to_string(),
        };
    }

    Decision::Proceed
}

/// Resolution
///
/// The value a guard hands back through its continuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Proceed,
    Redirect(String),
}

/// Next
///
/// The continuation passed to a guard. Both methods consume it, so a guard can
/// resolve a navigation at most once. Dropping it unresolved blocks the
/// navigation. It can be moved into a task and resolved later.
#[derive(Debug)]
pub struct Next {
    tx: oneshot::Sender<Resolution>,
}

impl Next {
    /// A continuation and the receiver its resolution arrives on. The receiver
    /// errors if the continuation is dropped unresolved.
    pub fn channel() -> (Self, oneshot::Receiver<Resolution>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    pub fn proceed(self) {
        // A closed receiver means the navigation was abandoned; nothing to do.
        let _ = self.tx.send(Resolution::Proceed);
    }

    pub fn redirect(self, to: impl Into<String>) {
        let _ = self.tx.send(Resolution::Redirect(to.into()));
    }
}

/// NavigationGuard
///
/// Registered with the `Navigator` and invoked before every navigation commits,
/// including the initial load. `from` is the last committed location and is
/// only meaningful for history bookkeeping.
pub trait NavigationGuard: Send + Sync {
    fn before_each(&self, to: &ResolvedRoute, from: Option<&Location>, next: Next);
}

/// ConsoleGuard
///
/// The console's guard: applies the page title, reads the session credentials
/// from the store, runs `decide`, and performs the side effects of the result.
pub struct ConsoleGuard {
    store: StorageState,
    document: DocumentState,
    notifier: NotifierState,
    app_name: String,
}

impl ConsoleGuard {
    pub fn new(
        store: StorageState,
        document: DocumentState,
        notifier: NotifierState,
        app_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            document,
            notifier,
            app_name: app_name.into(),
        }
    }
}

impl NavigationGuard for ConsoleGuard {
    fn before_each(&self, to: &ResolvedRoute, _from: Option<&Location>, next: Next) {
        // The title is applied even when access is denied below.
        if let Some(title) = &to.meta.title {
            self.document
                .set_title(&format!("{} - {}", title, self.app_name));
        }

        let credentials = Credentials::read(self.store.as_ref());
        let decision = decide(to, &credentials);

        tracing::debug!(
            path = %to.path,
            role = %credentials.role,
            authenticated = credentials.is_authenticated(),
            ?decision,
            "navigation guard"
        );

        match decision {
            Decision::Proceed => next.proceed(),
            Decision::Redirect { to } => next.redirect(to),
            Decision::Deny { to: fallback, notice } => {
                tracing::warn!(path = %to.path, role = %credentials.role, "insufficient role");
                self.notifier.notify(Notice::error(notice));
                next.redirect(fallback);
            }
        }
    }
}
