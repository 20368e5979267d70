//! Sidebar menu model.
//!
//! Projects an effective route tree onto the items a sidebar renders.
//!
//! # Rules
//! - `hidden` nodes are skipped
//! - A node with exactly one visible leaf child collapses into a link to
//!   that child, unless `always_show` is set
//! - A node without visible children renders as a link to itself
//! - Anything else becomes a submenu, including an `always_show` group whose
//!   children were all filtered away
//! - Links need a title; untitled links are skipped

use serde::Serialize;

use crate::routing::matcher;
use crate::routing::node::RouteNode;

/// One sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub title: Option<String>,
    pub icon: Option<String>,
    /// Absolute path, or URL for external links.
    pub path: String,
    pub external: bool,
    /// Rendered as a group even when it has no children.
    pub always_show: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    pub fn is_submenu(&self) -> bool {
        self.always_show || !self.children.is_empty()
    }
}

/// Build the sidebar for an effective route tree.
pub fn build_menu(nodes: &[RouteNode]) -> Vec<MenuItem> {
    nodes.iter().filter_map(|node| menu_item(node, "/")).collect()
}

fn menu_item(node: &RouteNode, parent: &str) -> Option<MenuItem> {
    if node.hidden {
        return None;
    }

    let path = matcher::join(parent, &node.path);
    let visible: Vec<&RouteNode> = node.children.iter().filter(|c| !c.hidden).collect();

    if !node.always_show {
        match visible.as_slice() {
            [] => return link(node, path),
            [only] if only.children.is_empty() => {
                let child_path = matcher::join(&path, &only.path);
                return link(only, child_path);
            }
            _ => {}
        }
    }

    let meta = node.meta.as_ref();
    Some(MenuItem {
        title: meta.and_then(|m| m.title.clone()),
        icon: meta.and_then(|m| m.icon.clone()),
        external: false,
        always_show: node.always_show,
        children: visible
            .into_iter()
            .filter_map(|child| menu_item(child, &path))
            .collect(),
        path,
    })
}

fn link(node: &RouteNode, path: String) -> Option<MenuItem> {
    let meta = node.meta.as_ref()?;
    Some(MenuItem {
        title: Some(meta.title.clone()?),
        icon: meta.icon.clone(),
        external: matcher::is_external(&path),
        always_show: false,
        path,
        children: Vec::new(),
    })
}
