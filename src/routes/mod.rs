/// Router Module Index
///
/// Splits the HTTP surface by how requests are treated before reaching a
/// handler. Only page routes pass through the navigation guard.

/// Unguarded operational endpoints (health checks).
pub mod public;

/// JSON API for the web client: navigation, menu, theme and notifications.
/// Not guarded; these are queries and commands, not navigations.
pub mod api;

/// Page navigations. Every request here is run through the navigation guard
/// middleware before the page shell is served.
pub mod pages;
