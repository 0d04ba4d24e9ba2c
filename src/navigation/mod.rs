/// Navigation Module Index
///
/// Everything that decides where a navigation may go: the static route tree and
/// its matcher, the guard and its pure decision function, the menu projection,
/// and the navigator that hosts guarded transitions.

/// The console's concrete route tree.
pub mod catalog;
pub mod guard;
pub mod menu;
pub mod navigator;
pub mod table;

pub use catalog::console_route_table;
pub use guard::{ConsoleGuard, NavigationGuard, Next, Resolution, decide};
pub use menu::project_menu;
pub use navigator::Navigator;
pub use table::{ResolvedRoute, RouteKind, RouteNode, RouteTable};
