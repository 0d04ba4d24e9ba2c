use crate::error::RouteTableError;

use super::table::{RouteNode, RouteTable};

/// console_route_table
///
/// The console's static route tree. Groups carry the shared title, icon and
/// role requirements; their children inherit them through meta merging.
pub fn console_route_table() -> Result<RouteTable, RouteTableError> {
    RouteTable::new(vec![
        RouteNode::view("/login", "Login").title("Login").hidden(),
        RouteNode::redirect("/", "/dashboard").children(vec![
            RouteNode::view("dashboard", "Dashboard")
                .title("Dashboard")
                .icon("Monitor"),
        ]),
        RouteNode::redirect("/tasks", "/tasks/list")
            .title("Task Management")
            .icon("Document")
            .children(vec![
                RouteNode::view("list", "TaskList")
                    .title("Task List")
                    .icon("List"),
                RouteNode::view("test", "TaskTest")
                    .title("Drawing Test")
                    .icon("Picture"),
            ]),
        RouteNode::redirect("/accounts", "/accounts/list")
            .title("Account Management")
            .icon("User")
            .children(vec![
                RouteNode::view("list", "AccountList")
                    .title("Account List")
                    .icon("Avatar"),
            ]),
        RouteNode::redirect("/users", "/users/list")
            .title("User Management")
            .icon("UserFilled")
            .roles(&["admin"])
            .children(vec![
                RouteNode::view("list", "UserList")
                    .title("User List")
                    .icon("UserFilled"),
            ]),
        RouteNode::redirect("/settings", "/settings/system")
            .title("System Settings")
            .icon("Setting")
            .roles(&["admin"])
            .children(vec![
                RouteNode::view("system", "SystemSettings")
                    .title("System Configuration")
                    .icon("Tools"),
            ]),
        RouteNode::redirect("/stats", "/stats/overview")
            .title("Statistics")
            .icon("DataAnalysis")
            .children(vec![
                RouteNode::view("overview", "StatsOverview")
                    .title("Data Overview")
                    .icon("PieChart"),
            ]),
        RouteNode::catch_all("NotFound").title("Page Not Found"),
    ])
}
