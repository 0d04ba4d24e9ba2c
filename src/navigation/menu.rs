use crate::models::MenuItem;

use super::table::{RouteNode, RouteTable, join_segments};

/// project_menu
///
/// Projects the route tree onto the navigation menu for `role`. Hidden nodes are
/// skipped, and so are nodes whose own `roles` exclude `role`, together with
/// their whole subtree. Declaration order is preserved.
///
/// The guard still redirects an under-privileged session that types a hidden
/// URL directly; hiding here is cosmetic.
pub fn project_menu(table: &RouteTable, role: &str) -> Vec<MenuItem> {
    project_nodes(table.nodes(), &[], role)
}

fn project_nodes(nodes: &[RouteNode], parent: &[String], role: &str) -> Vec<MenuItem> {
    nodes
        .iter()
        .filter(|node| !node.meta().hide_in_menu && !node.meta().excludes_role(role))
        .map(|node| {
            let full = node.full_segments(parent);
            MenuItem {
                path: join_segments(&full),
                name: node.name().map(str::to_string),
                title: node.meta().title.clone(),
                icon: node.meta().icon.clone(),
                children: project_nodes(node.child_nodes(), &full, role),
            }
        })
        .collect()
}
