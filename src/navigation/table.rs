use std::collections::HashSet;

use crate::error::RouteTableError;
use crate::models::RouteMeta;

/// Path pattern of the catch-all node. It is never matched segment by segment.
pub const CATCH_ALL_PATH: &str = "/:pathMatch(.*)*";

/// Upper bound on redirect groups followed while resolving one path.
const MAX_REDIRECT_HOPS: usize = 8;

/// RouteKind
///
/// What a node does when a path resolves to it exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteKind {
    /// A navigable view.
    View { name: String },
    /// A grouping node that forwards to `redirect` and exists to carry shared
    /// meta (title, icon, roles) for its children.
    RedirectGroup { redirect: String },
    /// The fallback for every unmatched path. Exactly one per table, declared last.
    CatchAll { name: String },
}

/// RouteNode
///
/// One static declaration of a navigable path and its metadata. Built once with
/// the builder methods below, then frozen inside a `RouteTable`.
#[derive(Debug, Clone)]
pub struct RouteNode {
    path: String,
    kind: RouteKind,
    meta: RouteMeta,
    children: Vec<RouteNode>,
}

impl RouteNode {
    pub fn view(path: &str, name: &str) -> Self {
        Self::with_kind(
            path,
            RouteKind::View {
                name: name.to_string(),
            },
        )
    }

    pub fn redirect(path: &str, to: &str) -> Self {
        Self::with_kind(
            path,
            RouteKind::RedirectGroup {
                redirect: to.to_string(),
            },
        )
    }

    /// The catch-all is always hidden from the menu.
    pub fn catch_all(name: &str) -> Self {
        Self::with_kind(
            CATCH_ALL_PATH,
            RouteKind::CatchAll {
                name: name.to_string(),
            },
        )
        .hidden()
    }

    fn with_kind(path: &str, kind: RouteKind) -> Self {
        Self {
            path: path.to_string(),
            kind,
            meta: RouteMeta::default(),
            children: Vec::new(),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.meta.title = Some(title.to_string());
        self
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.meta.icon = Some(icon.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.meta.hide_in_menu = true;
        self
    }

    pub fn roles(mut self, roles: &[&str]) -> Self {
        self.meta.roles = Some(roles.iter().map(|r| r.to_string()).collect());
        self
    }

    pub fn children(mut self, children: Vec<RouteNode>) -> Self {
        self.children = children;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> &RouteKind {
        &self.kind
    }

    pub fn meta(&self) -> &RouteMeta {
        &self.meta
    }

    pub fn child_nodes(&self) -> &[RouteNode] {
        &self.children
    }

    /// Logical name. Redirect groups have none.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            RouteKind::View { name } | RouteKind::CatchAll { name } => Some(name),
            RouteKind::RedirectGroup { .. } => None,
        }
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self.kind, RouteKind::CatchAll { .. })
    }

    /// Full path segments of this node below `parent`.
    pub(crate) fn full_segments(&self, parent: &[String]) -> Vec<String> {
        let own = segments(&self.path).map(str::to_string);
        if self.path.starts_with('/') {
            own.collect()
        } else {
            parent.iter().cloned().chain(own).collect()
        }
    }
}

/// ResolvedRoute
///
/// The result of matching a requested path: the final path after redirect
/// groups, the matched chain and its merged meta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub path: String,
    pub name: Option<String>,
    pub meta: RouteMeta,
    /// Full paths of every matched node, outermost first.
    pub matched: Vec<String>,
    /// The path originally requested when one or more redirect groups were followed.
    pub redirected_from: Option<String>,
    pub catch_all: bool,
}

/// RouteTable
///
/// The immutable route tree. Construction validates the catch-all placement
/// and name uniqueness; after that the table never changes.
#[derive(Debug, Clone)]
pub struct RouteTable {
    nodes: Vec<RouteNode>,
}

impl RouteTable {
    pub fn new(nodes: Vec<RouteNode>) -> Result<Self, RouteTableError> {
        let catch_alls = nodes.iter().filter(|n| n.is_catch_all()).count();
        match catch_alls {
            0 => return Err(RouteTableError::MissingCatchAll),
            1 => {}
            _ => return Err(RouteTableError::MultipleCatchAll),
        }
        if !nodes.last().is_some_and(RouteNode::is_catch_all) {
            return Err(RouteTableError::CatchAllNotLast);
        }

        let mut names = HashSet::new();
        for node in &nodes {
            check_subtree(node, &mut names, true)?;
        }

        Ok(Self { nodes })
    }

    /// Top-level nodes in declaration order.
    pub fn nodes(&self) -> &[RouteNode] {
        &self.nodes
    }

    /// resolve
    ///
    /// Matches `path` (query string and fragment ignored, slashes normalized,
    /// ASCII case ignored) against the tree. A match reports the declared path.
    /// The first exact match in declaration order wins; a
    /// redirect group forwards to its target; anything unmatched lands on the
    /// catch-all.
    pub fn resolve(&self, path: &str) -> ResolvedRoute {
        let mut requested = normalize_path(path);
        let mut redirected_from: Option<String> = None;

        for _ in 0..MAX_REDIRECT_HOPS {
            let target: Vec<&str> = segments(&requested).collect();
            let Some(chain) = find_chain(&self.nodes, &[], &target) else {
                break;
            };

            let Some((full, last)) = chain.last() else {
                break;
            };

            if let RouteKind::RedirectGroup { redirect } = &last.kind {
                let next = if redirect.starts_with('/') {
                    normalize_path(redirect)
                } else {
                    normalize_path(&format!("/{}/{}", full.join("/"), redirect))
                };
                redirected_from.get_or_insert_with(|| requested.clone());
                requested = next;
                continue;
            }

            let meta = chain
                .iter()
                .fold(RouteMeta::default(), |acc, (_, node)| acc.merged_with(&node.meta));

            return ResolvedRoute {
                path: join_segments(full),
                name: last.name().map(str::to_string),
                meta,
                matched: chain.iter().map(|(full, _)| join_segments(full)).collect(),
                redirected_from,
                catch_all: false,
            };
        }

        self.fallback(requested, redirected_from)
    }

    fn fallback(&self, requested: String, redirected_from: Option<String>) -> ResolvedRoute {
        // `new` guarantees the last top-level node is the catch-all.
        let catch_all = self.nodes.iter().rev().find(|n| n.is_catch_all());

        ResolvedRoute {
            path: requested,
            name: catch_all.and_then(|n| n.name()).map(str::to_string),
            meta: catch_all.map(|n| n.meta.clone()).unwrap_or_default(),
            matched: catch_all.map(|n| vec![n.path.clone()]).unwrap_or_default(),
            redirected_from,
            catch_all: true,
        }
    }
}

fn check_subtree<'a>(
    node: &'a RouteNode,
    names: &mut HashSet<&'a str>,
    top_level: bool,
) -> Result<(), RouteTableError> {
    if node.is_catch_all() && !top_level {
        return Err(RouteTableError::NestedCatchAll);
    }
    if let Some(name) = node.name() {
        if !names.insert(name) {
            return Err(RouteTableError::DuplicateName(name.to_string()));
        }
    }
    for child in &node.children {
        check_subtree(child, names, false)?;
    }
    Ok(())
}

type Matched<'a> = (Vec<String>, &'a RouteNode);

fn find_chain<'a>(
    nodes: &'a [RouteNode],
    parent: &[String],
    target: &[&str],
) -> Option<Vec<Matched<'a>>> {
    for node in nodes {
        if node.is_catch_all() {
            continue;
        }

        let full = node.full_segments(parent);
        let is_prefix =
            full.len() <= target.len()
                && full.iter().zip(target).all(|(a, b)| a.eq_ignore_ascii_case(b));
        if !is_prefix {
            continue;
        }

        if full.len() == target.len() {
            return Some(vec![(full, node)]);
        }

        if let Some(mut rest) = find_chain(&node.children, &full, target) {
            rest.insert(0, (full, node));
            return Some(rest);
        }
    }
    None
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

pub(crate) fn join_segments(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}

/// normalize_path
///
/// Drops the query string and fragment, collapses repeated slashes and removes a
/// trailing slash. The empty path becomes "/".
pub fn normalize_path(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let segments: Vec<String> = segments(&path[..end]).map(str::to_string).collect();
    join_segments(&segments)
}
