//! Built-in route tables for the admin console.
//!
//! Node conventions:
//! - `hidden`: not shown in the sidebar
//! - `always_show`: keep the group menu even with a single child; without it
//!   a group with one visible child collapses into that child's link
//! - `redirect = noredirect`: the node is not clickable in the breadcrumb
//! - `name`: required for keep-alive caching and named navigation
//! - `meta.roles`: roles allowed to see the node and its subtree
//!
//! Async modules live in their own files, one per sidebar section.

mod charts;
mod components;
mod error;
mod example;
mod excel;
mod nested;
mod permission;
mod table;

use crate::routing::{RedirectTarget, RouteMeta, RouteNode};

/// External project page linked from the sidebar.
pub const PROJECT_URL: &str = "https://github.com/tuandm/laravue";

/// Routes present for every identity, logged in or not.
pub fn constant_routes() -> Vec<RouteNode> {
    vec![
        RouteNode::layout("/redirect")
            .hidden()
            .children(vec![RouteNode::view("/redirect/:path*", "redirect/index")]),
        RouteNode::view("/login", "login/index").hidden(),
        RouteNode::view("/auth-redirect", "login/AuthRedirect").hidden(),
        RouteNode::view("/404", "ErrorPage/404")
            .redirect(RedirectTarget::Named {
                name: "Page404".to_string(),
            })
            .hidden(),
        RouteNode::view("/401", "ErrorPage/401").hidden(),
        RouteNode::layout("")
            .redirect_to("dashboard")
            .children(vec![RouteNode::view("dashboard", "dashboard/index")
                .named("Dashboard")
                .meta(RouteMeta::titled("dashboard").icon("dashboard"))]),
        RouteNode::layout("/documentation")
            .redirect_to("/documentation/index")
            .children(vec![RouteNode::view("index", "documentation/index")
                .named("Documentation")
                .meta(RouteMeta::titled("documentation").icon("documentation").no_cache())]),
        RouteNode::layout("/guide")
            .redirect_to("/guide/index")
            .children(vec![RouteNode::view("index", "guide/index")
                .named("Guide")
                .meta(RouteMeta::titled("guide").icon("guide").no_cache())]),
        RouteNode::layout("/form").children(vec![RouteNode::view("index", "form/index")
            .named("Form")
            .meta(RouteMeta::titled("Form").icon("form"))]),
    ]
}

/// Routes attached according to the identity's roles. The catch-all is last.
pub fn async_routes() -> Vec<RouteNode> {
    vec![
        permission::routes(),
        RouteNode::layout("/icon").children(vec![RouteNode::view("index", "icons/index")
            .named("Icons")
            .meta(RouteMeta::titled("icons").icon("icon").no_cache())]),
        components::routes(),
        charts::routes(),
        nested::routes(),
        table::routes(),
        example::routes(),
        RouteNode::layout("/tab").children(vec![RouteNode::view("index", "tab")
            .named("Tab")
            .meta(RouteMeta::titled("tab").icon("tab"))]),
        RouteNode::layout("/theme")
            .redirect(RedirectTarget::NoRedirect)
            .children(vec![RouteNode::view("index", "theme/index")
                .named("Theme")
                .meta(RouteMeta::titled("theme").icon("theme"))]),
        error::routes(),
        excel::routes(),
        RouteNode::layout("/zip")
            .redirect_to("/zip/download")
            .always_show()
            .meta(RouteMeta::titled("zip").icon("zip"))
            .children(vec![RouteNode::view("download", "zip")
                .named("ExportZip")
                .meta(RouteMeta::titled("exportZip"))]),
        RouteNode::layout("/pdf")
            .redirect_to("/pdf/index")
            .meta(RouteMeta::titled("PDF").icon("pdf"))
            .children(vec![RouteNode::view("index", "pdf")
                .named("PDF")
                .meta(RouteMeta::titled("PDF"))]),
        RouteNode::view("/pdf/download", "pdf/Download").hidden(),
        RouteNode::layout("/i18n").children(vec![RouteNode::view("index", "i18n")
            .named("I18n")
            .meta(RouteMeta::titled("i18n").icon("international"))]),
        RouteNode::layout("external-link").children(vec![RouteNode::external(PROJECT_URL)
            .meta(RouteMeta::titled("externalLink").icon("link"))]),
        RouteNode::catch_all("/404"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::validate_routes;
    use crate::routing::RouteTable;

    fn all_routes() -> Vec<RouteNode> {
        constant_routes().into_iter().chain(async_routes()).collect()
    }

    #[test]
    fn test_builtin_tables_are_valid() {
        assert_eq!(validate_routes(&all_routes()), vec![]);
    }

    #[test]
    fn test_catch_all_is_last() {
        let routes = async_routes();
        assert!(routes.last().is_some_and(RouteNode::is_catch_all));
        assert_eq!(routes.iter().filter(|n| n.is_catch_all()).count(), 1);
    }

    #[test]
    fn test_full_table_has_no_dangling_redirects() {
        let table = RouteTable::compile(all_routes()).unwrap();
        assert!(table.diagnostics().is_empty(), "{:?}", table.diagnostics());
    }

    #[test]
    fn test_constant_table_alone_has_dangling_not_found_redirect() {
        let table = RouteTable::compile(constant_routes()).unwrap();
        let dangling: Vec<_> = table.diagnostics().iter().map(ToString::to_string).collect();
        assert_eq!(
            dangling,
            vec!["route /404 redirects to unknown target {name: Page404}"]
        );
    }
}
