//! Route node data model.
//!
//! A [`RouteNode`] is one entry of a route table. Nodes with children are
//! group nodes rendered inside a shared layout; nodes without children are
//! leaves that render a lazily bound view.
//!
//! # Design Decisions
//! - `meta` is a fixed record with explicit defaults, not an open map
//! - Components and redirects serialize as plain strings where possible so
//!   tables stay readable in TOML

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::routing::matcher;

/// Reference to the component rendered for a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentRef {
    /// The shared application shell (sidebar, navbar, tags view).
    Layout,
    /// A pass-through shell that only hosts nested children.
    Outlet,
    /// A leaf view, resolved on first navigation.
    View(String),
}

impl ComponentRef {
    /// Returns true for the shared shells (`Layout`, `Outlet`).
    pub fn is_shell(&self) -> bool {
        matches!(self, ComponentRef::Layout | ComponentRef::Outlet)
    }
}

impl From<String> for ComponentRef {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Layout" => ComponentRef::Layout,
            "Outlet" => ComponentRef::Outlet,
            _ => ComponentRef::View(value),
        }
    }
}

impl From<ComponentRef> for String {
    fn from(value: ComponentRef) -> Self {
        match value {
            ComponentRef::Layout => "Layout".to_string(),
            ComponentRef::Outlet => "Outlet".to_string(),
            ComponentRef::View(path) => path,
        }
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentRef::Layout => f.write_str("Layout"),
            ComponentRef::Outlet => f.write_str("Outlet"),
            ComponentRef::View(path) => f.write_str(path),
        }
    }
}

/// Where navigation hitting a node is sent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "RedirectRepr", into = "RedirectRepr")]
pub enum RedirectTarget {
    /// Absolute path, or a path relative to the node's parent.
    Path(String),
    /// A named node, looked up in the table current at navigation time.
    Named { name: String },
    /// Not clickable in breadcrumbs; navigation stays on the node.
    NoRedirect,
}

/// Sentinel used by route authors for [`RedirectTarget::NoRedirect`].
pub const NO_REDIRECT: &str = "noredirect";

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum RedirectRepr {
    Path(String),
    Named { name: String },
}

impl From<RedirectRepr> for RedirectTarget {
    fn from(value: RedirectRepr) -> Self {
        match value {
            RedirectRepr::Path(path) if path == NO_REDIRECT => RedirectTarget::NoRedirect,
            RedirectRepr::Path(path) => RedirectTarget::Path(path),
            RedirectRepr::Named { name } => RedirectTarget::Named { name },
        }
    }
}

impl From<RedirectTarget> for RedirectRepr {
    fn from(value: RedirectTarget) -> Self {
        match value {
            RedirectTarget::Path(path) => RedirectRepr::Path(path),
            RedirectTarget::Named { name } => RedirectRepr::Named { name },
            RedirectTarget::NoRedirect => RedirectRepr::Path(NO_REDIRECT.to_string()),
        }
    }
}

impl fmt::Display for RedirectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirectTarget::Path(path) => f.write_str(path),
            RedirectTarget::Named { name } => write!(f, "{{name: {}}}", name),
            RedirectTarget::NoRedirect => f.write_str(NO_REDIRECT),
        }
    }
}

/// Authorization, sidebar, breadcrumb and tags-view metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RouteMeta {
    /// Roles allowed to see the node. `None` means every authenticated role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<BTreeSet<String>>,

    /// Label shown in the sidebar and breadcrumb.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Sidebar icon name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Exclude the view from keep-alive caching.
    pub no_cache: bool,

    /// Show the node in the breadcrumb.
    pub breadcrumb: bool,

    /// Pin the tag in the tags view.
    pub affix: bool,
}

impl Default for RouteMeta {
    fn default() -> Self {
        Self {
            roles: None,
            title: None,
            icon: None,
            no_cache: false,
            breadcrumb: true,
            affix: false,
        }
    }
}

impl RouteMeta {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    pub fn no_cache(mut self) -> Self {
        self.no_cache = true;
        self
    }

    pub fn without_breadcrumb(mut self) -> Self {
        self.breadcrumb = false;
        self
    }

    pub fn affix(mut self) -> Self {
        self.affix = true;
        self
    }
}

/// One entry in a route table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteNode {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<RedirectTarget>,

    #[serde(default)]
    pub hidden: bool,

    #[serde(default)]
    pub always_show: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<RouteMeta>,
}

impl RouteNode {
    fn bare(path: impl Into<String>, component: Option<ComponentRef>) -> Self {
        Self {
            path: path.into(),
            component,
            name: None,
            redirect: None,
            hidden: false,
            always_show: false,
            children: Vec::new(),
            meta: None,
        }
    }

    /// A group node rendered inside the shared layout.
    pub fn layout(path: impl Into<String>) -> Self {
        Self::bare(path, Some(ComponentRef::Layout))
    }

    /// A nested group node that only hosts its children.
    pub fn outlet(path: impl Into<String>) -> Self {
        Self::bare(path, Some(ComponentRef::Outlet))
    }

    /// A leaf node bound to a lazily loaded view.
    pub fn view(path: impl Into<String>, view: impl Into<String>) -> Self {
        Self::bare(path, Some(ComponentRef::View(view.into())))
    }

    /// An outbound link; it has no component.
    pub fn external(url: impl Into<String>) -> Self {
        Self::bare(url, None)
    }

    /// A node that only redirects.
    pub fn redirect_only(path: impl Into<String>, target: RedirectTarget) -> Self {
        let mut node = Self::bare(path, None);
        node.redirect = Some(target);
        node
    }

    /// The catch-all node sending unmatched paths to `target`.
    pub fn catch_all(target: impl Into<String>) -> Self {
        Self::redirect_only(matcher::CATCH_ALL, RedirectTarget::Path(target.into())).hidden()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn redirect(mut self, target: RedirectTarget) -> Self {
        self.redirect = Some(target);
        self
    }

    pub fn redirect_to(self, path: impl Into<String>) -> Self {
        self.redirect(RedirectTarget::Path(path.into()))
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn always_show(mut self) -> Self {
        self.always_show = true;
        self
    }

    pub fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn children(mut self, children: Vec<RouteNode>) -> Self {
        self.children = children;
        self
    }

    /// Returns true if the node hosts nested routes.
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_catch_all(&self) -> bool {
        self.path == matcher::CATCH_ALL
    }

    pub fn is_external(&self) -> bool {
        matcher::is_external(&self.path)
    }

    /// Roles required to see this node, if any.
    pub fn required_roles(&self) -> Option<&BTreeSet<String>> {
        self.meta.as_ref().and_then(|m| m.roles.as_ref())
    }

    pub fn title(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.title.as_deref())
    }

    /// Depth-first iterator over this node and all descendants.
    pub fn walk(&self) -> impl Iterator<Item = &RouteNode> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}
