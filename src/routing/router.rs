//! Route lookup and redirect resolution.
//!
//! # Responsibilities
//! - Flatten a node tree into compiled records
//! - Look up the matching record for a path
//! - Chase redirects (by path or by name) and the catch-all
//!
//! # Design Decisions
//! - Immutable after construction (shared as `Arc<RouteTable>` snapshots)
//! - Children are matched before their parent, siblings in table order,
//!   catch-all last
//! - Dangling redirects are diagnostics: the record becomes non-navigable and
//!   paths hitting it fall through to the catch-all. A not-found page
//!   stranded that way still renders its own component
//! - Named redirects are looked up in this table at navigation time

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::config::schema::RouterSettings;
use crate::config::validation::{self, ValidationError};
use crate::routing::matcher::{self, Params, PathPattern};
use crate::routing::node::{ComponentRef, RedirectTarget, RouteMeta, RouteNode};

/// Errors raised while compiling a table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("invalid route table: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised while resolving a location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// Redirect chain exceeded the configured hop limit.
    #[error("redirect loop while resolving {path} ({hops} hops)")]
    RedirectLoop { path: String, hops: usize },

    /// Nothing matched and no fallback is available.
    #[error("no route resolves {path}")]
    Unresolvable { path: String },
}

/// Non-fatal problems found while compiling a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TableDiagnostic {
    DanglingRedirect { path: String, target: String },
}

impl fmt::Display for TableDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableDiagnostic::DanglingRedirect { path, target } => {
                write!(f, "route {} redirects to unknown target {}", path, target)
            }
        }
    }
}

/// One flattened node.
#[derive(Debug, Clone, Serialize)]
pub struct RouteRecord {
    /// Absolute path, external URL, or `*`.
    pub path: String,
    pub name: Option<String>,
    pub component: Option<ComponentRef>,
    pub redirect: Option<RedirectTarget>,
    pub hidden: bool,
    pub always_show: bool,
    pub meta: RouteMeta,
    /// Index of the enclosing group record.
    pub parent: Option<usize>,
    /// False when the record's redirect target does not exist in this table.
    pub navigable: bool,
    pub external: bool,
    #[serde(skip)]
    pattern: Option<PathPattern>,
    #[serde(skip)]
    base: String,
}

impl RouteRecord {
    pub fn is_catch_all(&self) -> bool {
        self.pattern.as_ref().is_some_and(PathPattern::is_catch_all)
    }
}

/// Whether a resolution reached the requested route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Found,
    NotFound,
    Unauthorized,
}

/// A record in the matched layout chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedRoute {
    pub path: String,
    pub name: Option<String>,
    pub component: Option<ComponentRef>,
}

/// The final target of a navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute {
    /// Concrete path of the final target.
    pub path: String,
    pub name: Option<String>,
    pub params: Params,
    pub meta: RouteMeta,
    /// Layout chain, outermost first; the last entry is the target.
    pub matched: Vec<MatchedRoute>,
    /// Originally requested path when redirects were followed.
    pub redirected_from: Option<String>,
    pub status: RouteStatus,
}

/// Result of resolving a location against a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Internal(ResolvedRoute),
    External(String),
}

/// A compiled, immutable route table.
#[derive(Debug, Default)]
pub struct RouteTable {
    records: Vec<RouteRecord>,
    /// Record indices in match priority order.
    match_order: Vec<usize>,
    names: HashMap<String, usize>,
    diagnostics: Vec<TableDiagnostic>,
}

impl RouteTable {
    /// Compile an ordered top-level node list.
    ///
    /// Fails fast on structural defects (duplicate names, misplaced
    /// catch-all, invalid patterns). Dangling redirects are recorded as
    /// diagnostics.
    pub fn compile(nodes: Vec<RouteNode>) -> Result<Self, TableError> {
        let errors = validation::validate_routes(&nodes);
        if !errors.is_empty() {
            return Err(TableError::Invalid(errors));
        }

        let mut table = RouteTable::default();
        for node in &nodes {
            table.flatten(node, "/", None);
        }

        for (i, record) in table.records.iter().enumerate() {
            if let Some(name) = &record.name {
                table.names.insert(name.clone(), i);
            }
        }

        table.check_redirects();
        for diagnostic in &table.diagnostics {
            tracing::warn!(%diagnostic, "Route table diagnostic");
        }

        Ok(table)
    }

    fn flatten(&mut self, node: &RouteNode, parent_path: &str, parent: Option<usize>) {
        let external = node.is_external();
        let path = matcher::join(parent_path, &node.path);
        let pattern = if external {
            None
        } else {
            PathPattern::parse(&path).ok()
        };

        let index = self.records.len();
        self.records.push(RouteRecord {
            path: path.clone(),
            name: node.name.clone(),
            component: node.component.clone(),
            redirect: node.redirect.clone(),
            hidden: node.hidden,
            always_show: node.always_show,
            meta: node.meta.clone().unwrap_or_default(),
            parent,
            navigable: true,
            external,
            pattern,
            base: parent_path.to_string(),
        });

        for child in &node.children {
            self.flatten(child, &path, Some(index));
        }
        self.match_order.push(index);
    }

    fn check_redirects(&mut self) {
        let dangling: Vec<(usize, TableDiagnostic)> = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(i, record)| {
                let target = record.redirect.as_ref()?;
                let exists = match target {
                    RedirectTarget::NoRedirect => true,
                    RedirectTarget::Named { name } => self.names.contains_key(name),
                    RedirectTarget::Path(path) => {
                        let location = matcher::join(&record.base, path);
                        self.lookup(&location, false).is_some()
                    }
                };
                let diagnostic = TableDiagnostic::DanglingRedirect {
                    path: record.path.clone(),
                    target: target.to_string(),
                };
                (!exists).then_some((i, diagnostic))
            })
            .collect();

        for (i, diagnostic) in dangling {
            self.records[i].navigable = false;
            self.diagnostics.push(diagnostic);
        }
    }

    /// First navigable record matching `path`.
    fn lookup(&self, path: &str, include_catch_all: bool) -> Option<(usize, Params)> {
        self.match_order.iter().find_map(|&i| {
            let record = &self.records[i];
            if !record.navigable || (!include_catch_all && record.is_catch_all()) {
                return None;
            }
            record.pattern.as_ref()?.matches(path).map(|params| (i, params))
        })
    }

    /// A page matching `path` that lost navigability to a dangling redirect
    /// but still has a component of its own to render.
    fn stranded_page(&self, path: &str) -> Option<(usize, Params)> {
        self.match_order.iter().find_map(|&i| {
            let record = &self.records[i];
            if record.navigable || record.component.is_none() {
                return None;
            }
            record.pattern.as_ref()?.matches(path).map(|params| (i, params))
        })
    }

    /// Returns true if a route other than the catch-all matches `location`.
    pub fn contains_path(&self, location: &str) -> bool {
        self.lookup(&matcher::normalize(location), false).is_some()
    }

    /// Record by name.
    pub fn find_by_name(&self, name: &str) -> Option<&RouteRecord> {
        self.names.get(name).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }

    pub fn diagnostics(&self) -> &[TableDiagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_catch_all(&self) -> bool {
        self.records.iter().any(RouteRecord::is_catch_all)
    }

    /// Names of views kept alive between navigations.
    pub fn cached_views(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| !r.meta.no_cache && matches!(r.component, Some(ComponentRef::View(_))))
            .filter_map(|r| r.name.as_deref())
            .collect()
    }

    /// Records pinned in the tags view.
    pub fn affixed(&self) -> Vec<&RouteRecord> {
        self.records.iter().filter(|r| r.meta.affix).collect()
    }

    /// Resolve a location, following redirects and the catch-all.
    pub fn resolve(
        &self,
        location: &str,
        settings: &RouterSettings,
    ) -> Result<Resolution, NavigationError> {
        if matcher::is_external(location) {
            return Ok(Resolution::External(location.to_string()));
        }

        let requested = matcher::normalize(location);
        let mut current = requested.clone();
        let mut status = RouteStatus::Found;
        let mut hops = 0;

        loop {
            let (index, params) = match self.lookup(&current, true) {
                Some(found) => found,
                None if current == settings.not_found_path => {
                    let Some((index, params)) = self.stranded_page(&current) else {
                        return Err(NavigationError::Unresolvable { path: requested });
                    };
                    let redirected_from = (hops > 0).then_some(requested);
                    return Ok(Resolution::Internal(self.build_route(
                        index,
                        current,
                        params,
                        redirected_from,
                        RouteStatus::NotFound,
                    )));
                }
                None => {
                    status = RouteStatus::NotFound;
                    current = settings.not_found_path.clone();
                    hops += 1;
                    continue;
                }
            };

            let record = &self.records[index];
            if record.is_catch_all() {
                status = RouteStatus::NotFound;
            }

            match self.redirect_location(record, &params) {
                Some(next) => {
                    hops += 1;
                    if hops > settings.max_redirects {
                        return Err(NavigationError::RedirectLoop {
                            path: requested,
                            hops,
                        });
                    }
                    tracing::trace!(from = %current, to = %next, "Following redirect");
                    current = next;
                }
                None => {
                    let redirected_from = (hops > 0).then_some(requested);
                    return Ok(Resolution::Internal(self.build_route(
                        index,
                        current,
                        params,
                        redirected_from,
                        status,
                    )));
                }
            }
        }
    }

    fn redirect_location(&self, record: &RouteRecord, params: &Params) -> Option<String> {
        match record.redirect.as_ref()? {
            RedirectTarget::NoRedirect => None,
            RedirectTarget::Path(path) => {
                Some(matcher::fill_params(&matcher::join(&record.base, path), params))
            }
            RedirectTarget::Named { name } => {
                let target = self.find_by_name(name)?;
                Some(matcher::fill_params(&target.path, params))
            }
        }
    }

    fn build_route(
        &self,
        index: usize,
        path: String,
        params: Params,
        redirected_from: Option<String>,
        status: RouteStatus,
    ) -> ResolvedRoute {
        let mut matched = Vec::new();
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            let record = &self.records[i];
            matched.push(MatchedRoute {
                path: record.path.clone(),
                name: record.name.clone(),
                component: record.component.clone(),
            });
            cursor = record.parent;
        }
        matched.reverse();

        let record = &self.records[index];
        ResolvedRoute {
            path,
            name: record.name.clone(),
            params,
            meta: record.meta.clone(),
            matched,
            redirected_from,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteMeta;

    fn settings() -> RouterSettings {
        RouterSettings::default()
    }

    fn internal(resolution: Resolution) -> ResolvedRoute {
        match resolution {
            Resolution::Internal(route) => route,
            Resolution::External(url) => panic!("unexpected external {}", url),
        }
    }

    fn sample() -> Vec<RouteNode> {
        vec![
            RouteNode::view("/404", "ErrorPage/404").named("Page404").hidden(),
            RouteNode::view("/401", "ErrorPage/401").hidden(),
            RouteNode::layout("")
                .redirect_to("dashboard")
                .children(vec![RouteNode::view("dashboard", "dashboard/index")
                    .named("Dashboard")
                    .meta(RouteMeta::titled("dashboard").affix())]),
            RouteNode::layout("/example")
                .redirect_to("/example/list")
                .children(vec![
                    RouteNode::view("list", "example/list").named("ArticleList"),
                    RouteNode::view("edit/:id", "example/edit")
                        .named("EditArticle")
                        .meta(RouteMeta::titled("editArticle").no_cache())
                        .hidden(),
                ]),
            RouteNode::layout("/external-link")
                .children(vec![RouteNode::external("https://example.com")]),
            RouteNode::catch_all("/404"),
        ]
    }

    #[test]
    fn test_flatten_paths_and_order() {
        let table = RouteTable::compile(sample()).unwrap();
        let paths: Vec<_> = table.records().iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "/404",
                "/401",
                "/",
                "/dashboard",
                "/example",
                "/example/list",
                "/example/edit/:id",
                "/external-link",
                "https://example.com",
                "*",
            ]
        );
        assert!(table.has_catch_all());
        assert!(table.diagnostics().is_empty());
    }

    #[test]
    fn test_root_redirects_to_dashboard() {
        let table = RouteTable::compile(sample()).unwrap();
        let route = internal(table.resolve("/", &settings()).unwrap());
        assert_eq!(route.path, "/dashboard");
        assert_eq!(route.name.as_deref(), Some("Dashboard"));
        assert_eq!(route.redirected_from.as_deref(), Some("/"));
        assert_eq!(route.status, RouteStatus::Found);
        assert_eq!(route.matched.len(), 2);
        assert_eq!(route.matched[0].component, Some(ComponentRef::Layout));
    }

    #[test]
    fn test_params_are_captured() {
        let table = RouteTable::compile(sample()).unwrap();
        let route = internal(table.resolve("/example/edit/12?tab=2", &settings()).unwrap());
        assert_eq!(route.path, "/example/edit/12");
        assert_eq!(route.params.get("id").map(String::as_str), Some("12"));
        assert!(route.meta.no_cache);
        assert!(route.redirected_from.is_none());
    }

    #[test]
    fn test_unmatched_goes_through_catch_all() {
        let table = RouteTable::compile(sample()).unwrap();
        let route = internal(table.resolve("/unknown/path", &settings()).unwrap());
        assert_eq!(route.path, "/404");
        assert_eq!(route.name.as_deref(), Some("Page404"));
        assert_eq!(route.status, RouteStatus::NotFound);
        assert_eq!(route.redirected_from.as_deref(), Some("/unknown/path"));
    }

    #[test]
    fn test_fallback_without_catch_all() {
        let mut nodes = sample();
        nodes.pop();
        let table = RouteTable::compile(nodes).unwrap();
        assert!(!table.has_catch_all());
        let route = internal(table.resolve("/missing", &settings()).unwrap());
        assert_eq!(route.path, "/404");
        assert_eq!(route.status, RouteStatus::NotFound);
    }

    #[test]
    fn test_unresolvable_without_not_found_route() {
        let table = RouteTable::compile(vec![RouteNode::view("/login", "login")]).unwrap();
        assert_eq!(
            table.resolve("/missing", &settings()),
            Err(NavigationError::Unresolvable { path: "/missing".into() })
        );
    }

    #[test]
    fn test_external_location() {
        let table = RouteTable::compile(sample()).unwrap();
        assert_eq!(
            table.resolve("https://example.com", &settings()).unwrap(),
            Resolution::External("https://example.com".into())
        );
    }

    #[test]
    fn test_dangling_named_redirect_is_not_navigable() {
        let nodes = vec![
            RouteNode::view("/404", "ErrorPage/404"),
            RouteNode::view("/old", "old")
                .redirect(RedirectTarget::Named { name: "Missing".into() }),
            RouteNode::catch_all("/404"),
        ];
        let table = RouteTable::compile(nodes).unwrap();
        assert_eq!(table.diagnostics().len(), 1);
        assert!(!table.contains_path("/old"));

        let route = internal(table.resolve("/old", &settings()).unwrap());
        assert_eq!(route.path, "/404");
        assert_eq!(route.status, RouteStatus::NotFound);
    }

    #[test]
    fn test_not_found_page_with_dangling_redirect_still_renders() {
        let nodes = vec![
            RouteNode::view("/login", "login/index"),
            RouteNode::view("/404", "ErrorPage/404")
                .redirect(RedirectTarget::Named { name: "Page404".into() }),
        ];
        let table = RouteTable::compile(nodes).unwrap();
        assert!(!table.contains_path("/404"));

        let route = internal(table.resolve("/unknown/path", &settings()).unwrap());
        assert_eq!(route.path, "/404");
        assert_eq!(route.status, RouteStatus::NotFound);
        assert_eq!(route.redirected_from.as_deref(), Some("/unknown/path"));
        assert_eq!(
            route.matched.last().and_then(|m| m.component.clone()),
            Some(ComponentRef::View("ErrorPage/404".into()))
        );

        let route = internal(table.resolve("/404", &settings()).unwrap());
        assert_eq!(route.status, RouteStatus::NotFound);
        assert!(route.redirected_from.is_none());
    }

    #[test]
    fn test_named_redirect() {
        let nodes = vec![
            RouteNode::view("/404", "ErrorPage/404")
                .redirect(RedirectTarget::Named { name: "Page404".into() }),
            RouteNode::layout("/error")
                .children(vec![RouteNode::view("404", "ErrorPage/404").named("Page404")]),
        ];
        let table = RouteTable::compile(nodes).unwrap();
        let route = internal(table.resolve("/404", &settings()).unwrap());
        assert_eq!(route.path, "/error/404");
    }

    #[test]
    fn test_redirect_loop() {
        let nodes = vec![
            RouteNode::redirect_only("/a", RedirectTarget::Path("/b".into())),
            RouteNode::redirect_only("/b", RedirectTarget::Path("/a".into())),
        ];
        let table = RouteTable::compile(nodes).unwrap();
        assert!(matches!(
            table.resolve("/a", &settings()),
            Err(NavigationError::RedirectLoop { .. })
        ));
    }

    #[test]
    fn test_duplicate_names_fail_compile() {
        let nodes = vec![
            RouteNode::view("/a", "a").named("X"),
            RouteNode::view("/b", "b").named("X"),
        ];
        assert!(matches!(
            RouteTable::compile(nodes),
            Err(TableError::Invalid(_))
        ));
    }

    #[test]
    fn test_cached_and_affixed() {
        let table = RouteTable::compile(sample()).unwrap();
        assert_eq!(table.cached_views(), vec!["Page404", "Dashboard", "ArticleList"]);
        let affixed: Vec<_> = table.affixed().iter().map(|r| r.path.as_str()).collect();
        assert_eq!(affixed, vec!["/dashboard"]);
    }
}
