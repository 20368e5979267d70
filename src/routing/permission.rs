//! Role-based filtering of the async route table.
//!
//! # Rules
//! ```text
//! node without meta.roles            → kept
//! node whose roles intersect identity → kept
//! otherwise                           → dropped with its subtree
//! kept group with no surviving child  → dropped, unless always_show
//! ```
//!
//! # Design Decisions
//! - Pure function: same (table, roles) always yields the same sequence
//! - Relative sibling order is preserved

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::schema::PermissionConfig;
use crate::routing::node::RouteNode;

/// The role set of an authenticated identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Roles(BTreeSet<String>);

impl Roles {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(roles.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if any of `required` is held.
    pub fn intersects(&self, required: &BTreeSet<String>) -> bool {
        !self.0.is_disjoint(required)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for Roles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roles: Vec<&str> = self.iter().collect();
        write!(f, "[{}]", roles.join(", "))
    }
}

/// Returns true if `roles` may see `node` (ignoring its children).
pub fn has_permission(node: &RouteNode, roles: &Roles) -> bool {
    node.required_roles()
        .map(|required| roles.intersects(required))
        .unwrap_or(true)
}

/// Filter `routes` for an identity holding `roles`.
pub fn filter_async_routes(routes: &[RouteNode], roles: &Roles) -> Vec<RouteNode> {
    routes
        .iter()
        .filter_map(|node| filter_node(node, roles))
        .collect()
}

fn filter_node(node: &RouteNode, roles: &Roles) -> Option<RouteNode> {
    if !has_permission(node, roles) {
        return None;
    }
    if !node.is_group() {
        return Some(node.clone());
    }

    let children = filter_async_routes(&node.children, roles);
    if children.is_empty() && !node.always_show {
        return None;
    }

    let mut kept = node.clone();
    kept.children = children;
    Some(kept)
}

/// Permission filter with the optional superuser shortcut.
#[derive(Debug, Clone, Default)]
pub struct PermissionFilter {
    superuser_role: Option<String>,
}

impl PermissionFilter {
    pub fn new(config: &PermissionConfig) -> Self {
        Self {
            superuser_role: config.superuser_role.clone(),
        }
    }

    /// Routes attached for `roles`.
    pub fn apply(&self, routes: &[RouteNode], roles: &Roles) -> Vec<RouteNode> {
        match &self.superuser_role {
            Some(role) if roles.contains(role) => {
                tracing::debug!(role = %role, "Superuser role holds every async route");
                routes.to_vec()
            }
            _ => filter_async_routes(routes, roles),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteMeta;

    fn table() -> Vec<RouteNode> {
        vec![
            RouteNode::layout("/permission")
                .always_show()
                .meta(RouteMeta::titled("permission").roles(["admin", "editor"]))
                .children(vec![
                    RouteNode::view("page", "permission/Page")
                        .named("PagePermission")
                        .meta(RouteMeta::titled("page").roles(["admin"])),
                    RouteNode::view("directive", "permission/Directive")
                        .named("DirectivePermission"),
                ]),
            RouteNode::layout("/admin-only")
                .meta(RouteMeta::titled("admin").roles(["admin"]))
                .children(vec![RouteNode::view("index", "admin/index").named("AdminIndex")]),
            RouteNode::layout("/reports").children(vec![RouteNode::view("index", "reports")
                .named("Reports")
                .meta(RouteMeta::titled("reports").roles(["admin"]))]),
            RouteNode::layout("/zip")
                .always_show()
                .children(vec![RouteNode::view("download", "zip")
                    .named("ExportZip")
                    .meta(RouteMeta::titled("zip").roles(["admin"]))]),
            RouteNode::view("/public", "public"),
        ]
    }

    fn paths(nodes: &[RouteNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.path.as_str()).collect()
    }

    #[test]
    fn test_editor_loses_admin_subtrees() {
        let filtered = filter_async_routes(&table(), &Roles::new(["editor"]));
        assert_eq!(paths(&filtered), vec!["/permission", "/zip", "/public"]);
        assert_eq!(paths(&filtered[0].children), vec!["directive"]);
    }

    #[test]
    fn test_admin_keeps_everything() {
        let filtered = filter_async_routes(&table(), &Roles::new(["admin"]));
        assert_eq!(filtered, table());
    }

    #[test]
    fn test_always_show_survives_empty() {
        let filtered = filter_async_routes(&table(), &Roles::new(["visitor"]));
        assert_eq!(paths(&filtered), vec!["/zip", "/public"]);
        assert!(filtered[0].children.is_empty());
    }

    #[test]
    fn test_empty_group_without_always_show_dropped() {
        let filtered = filter_async_routes(&table(), &Roles::new(["editor"]));
        assert!(!paths(&filtered).contains(&"/reports"));
    }

    #[test]
    fn test_deterministic() {
        let roles = Roles::new(["editor", "viewer"]);
        let first = filter_async_routes(&table(), &roles);
        let second = filter_async_routes(&table(), &roles);
        assert_eq!(first, second);
    }

    #[test]
    fn test_superuser_shortcut() {
        let filter = PermissionFilter::new(&PermissionConfig {
            superuser_role: Some("root".into()),
        });
        let filtered = filter.apply(&table(), &Roles::new(["root"]));
        assert_eq!(filtered, table());

        let filtered = filter.apply(&table(), &Roles::new(["editor"]));
        assert_eq!(paths(&filtered), vec!["/permission", "/zip", "/public"]);
    }
}
