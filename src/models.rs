use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

// --- Route Metadata ---

/// RouteMeta
///
/// Display and access attributes attached to a route node. When a path resolves
/// through several nested nodes, the metas of the whole chain are merged (see
/// `RouteMeta::merged_with`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RouteMeta {
    /// Page title, shown as "{title} - {application name}".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Symbolic icon identifier for the menu.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub hide_in_menu: bool,
    /// Roles allowed to enter. `None` (or an empty list) admits any authenticated role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

impl RouteMeta {
    /// merged_with
    ///
    /// Overlays `child` onto `self`: fields the child sets win, fields it leaves
    /// unset are inherited. A node hidden anywhere in the chain stays hidden.
    pub fn merged_with(&self, child: &RouteMeta) -> RouteMeta {
        RouteMeta {
            title: child.title.clone().or_else(|| self.title.clone()),
            icon: child.icon.clone().or_else(|| self.icon.clone()),
            hide_in_menu: self.hide_in_menu || child.hide_in_menu,
            roles: child.roles.clone().or_else(|| self.roles.clone()),
        }
    }

    /// True when the meta restricts access to a non-empty role set that does
    /// not contain `role`.
    pub fn excludes_role(&self, role: &str) -> bool {
        match &self.roles {
            Some(roles) if !roles.is_empty() => !roles.iter().any(|r| r == role),
            _ => false,
        }
    }
}

// --- Navigation ---

/// Decision
///
/// The outcome of the pure authorization check for one navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
#[ts(export)]
pub enum Decision {
    Proceed,
    Redirect { to: String },
    /// Authenticated but under-privileged: redirect and tell the user why.
    Deny { to: String, notice: String },
}

/// Location
///
/// A committed position in the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Location {
    pub path: String,
    pub name: Option<String>,
    pub title: Option<String>,
}

/// ScrollPosition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ScrollPosition {
    pub top: u32,
    pub left: u32,
}

/// NavigationOutcome
///
/// What happened to one navigation intent once its guard resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
#[ts(export)]
pub enum NavigationOutcome {
    /// The navigation settled on `location`, possibly after guard redirects.
    Committed {
        location: Location,
        /// The originally requested path when the guard redirected.
        redirected_from: Option<String>,
        scroll: ScrollPosition,
    },
    /// The guard released its continuation without resolving it.
    Blocked { path: String },
    /// A newer navigation started before this one resolved.
    Superseded,
    /// The guard kept redirecting past the hop limit.
    RedirectLoop { path: String },
}

/// NavigateRequest
///
/// Input payload for POST /api/navigate.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NavigateRequest {
    #[schema(example = "/users/list")]
    pub path: String,
}

// --- Menu ---

/// MenuItem
///
/// One entry of the menu projection. `path` is the full path of the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MenuItem {
    pub path: String,
    pub name: Option<String>,
    pub title: Option<String>,
    pub icon: Option<String>,
    #[schema(no_recursion)]
    pub children: Vec<MenuItem>,
}

// --- Notifications ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Notice
///
/// A fire-and-forget, user-visible message (a toast in the web client).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

// --- Theme & Page Shell ---

/// ThemeState
///
/// Output schema for the theme endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ThemeState {
    pub is_dark: bool,
    /// "dark" or "light", the same literal that is persisted.
    pub theme: String,
}

impl From<bool> for ThemeState {
    fn from(is_dark: bool) -> Self {
        Self {
            is_dark,
            theme: crate::theme::theme_literal(is_dark).to_string(),
        }
    }
}

/// PageShell
///
/// The document served for a committed page navigation: which view to mount,
/// the document title and root marker, and the menu for the current role.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PageShell {
    pub view: Option<String>,
    pub path: String,
    pub title: String,
    pub dark: bool,
    pub menu: Vec<MenuItem>,
}
