//! Properties of the built-in route tables under role filtering.

use std::collections::HashSet;

use route_table::config::validation::validate_routes;
use route_table::routes::{async_routes, constant_routes};
use route_table::routing::router::RouteStatus;
use route_table::routing::{
    filter_async_routes, RedirectTarget, Resolution, RouteNode, Roles,
};
use route_table::RoutesConfig;

mod common;

fn role_sets() -> Vec<Roles> {
    vec![
        Roles::new(["admin"]),
        Roles::new(["editor"]),
        Roles::new(["visitor"]),
        Roles::new(["admin", "editor"]),
        Roles::default(),
    ]
}

#[test]
fn test_names_unique_in_every_resolved_table() {
    for roles in role_sets() {
        let table = common::resolved_table(filter_async_routes(&async_routes(), &roles));
        let mut seen = HashSet::new();
        for name in table.records().iter().filter_map(|r| r.name.as_deref()) {
            assert!(seen.insert(name), "duplicate name {} for {}", name, roles);
        }
    }
}

#[test]
fn test_named_redirects_resolve_in_every_resolved_table() {
    for roles in role_sets() {
        let table = common::resolved_table(filter_async_routes(&async_routes(), &roles));
        for record in table.records() {
            if let Some(RedirectTarget::Named { name }) = &record.redirect {
                assert!(
                    table.find_by_name(name).is_some(),
                    "{} redirects to missing {} for {}",
                    record.path,
                    name,
                    roles
                );
            }
        }
    }
}

#[test]
fn test_filter_is_deterministic() {
    for roles in role_sets() {
        let first = filter_async_routes(&async_routes(), &roles);
        let second = filter_async_routes(&async_routes(), &roles);
        assert_eq!(first, second);
    }
}

#[test]
fn test_filter_preserves_table_order() {
    let filtered = filter_async_routes(&async_routes(), &Roles::new(["visitor"]));
    let all: Vec<String> = async_routes().into_iter().map(|n| n.path).collect();
    let kept: Vec<String> = filtered.into_iter().map(|n| n.path).collect();

    let mut positions = kept.iter().map(|p| all.iter().position(|a| a == p).unwrap());
    let mut last = positions.next().unwrap();
    for position in positions {
        assert!(position > last);
        last = position;
    }
    assert_eq!(kept.last().map(String::as_str), Some("*"));
}

#[test]
fn test_editor_excluded_from_admin_nodes() {
    let filtered = filter_async_routes(&async_routes(), &Roles::new(["editor"]));
    let permission = filtered.iter().find(|n| n.path == "/permission").unwrap();
    let names: Vec<_> = permission
        .children
        .iter()
        .filter_map(|c| c.name.as_deref())
        .collect();
    assert_eq!(names, vec!["DirectivePermission"]);
}

#[test]
fn test_visitor_loses_permission_group_entirely() {
    let filtered = filter_async_routes(&async_routes(), &Roles::new(["visitor"]));
    assert!(filtered.iter().all(|n| n.path != "/permission"));
    assert!(filtered.iter().any(|n| n.path == "/zip"));
}

#[test]
fn test_always_show_group_survives_without_children() {
    let routes = vec![
        RouteNode::layout("/zip")
            .always_show()
            .children(vec![RouteNode::view("download", "zip").meta(
                route_table::routing::RouteMeta::titled("exportZip").roles(["admin"]),
            )]),
        RouteNode::layout("/pdf").children(vec![RouteNode::view("index", "pdf").meta(
            route_table::routing::RouteMeta::titled("PDF").roles(["admin"]),
        )]),
    ];
    let filtered = filter_async_routes(&routes, &Roles::new(["editor"]));
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].path, "/zip");
    assert!(filtered[0].children.is_empty());
}

#[test]
fn test_unknown_path_resolves_to_not_found_page() {
    let config = RoutesConfig::default();
    let table = common::resolved_table(filter_async_routes(&async_routes(), &Roles::new(["editor"])));

    let route = match table.resolve("/unknown/path", &config.router).unwrap() {
        Resolution::Internal(route) => route,
        other => panic!("unexpected {:?}", other),
    };
    assert_eq!(route.status, RouteStatus::NotFound);
    assert_eq!(route.name.as_deref(), Some("Page404"));
    assert_eq!(route.path, "/error/404");
    assert_eq!(route.redirected_from.as_deref(), Some("/unknown/path"));
}

#[test]
fn test_node_after_catch_all_rejected() {
    let mut nodes = constant_routes();
    nodes.extend(async_routes());
    nodes.push(RouteNode::view("/late", "late/index"));

    let errors = validate_routes(&nodes);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("/late"));
    assert!(route_table::RouteTable::compile(nodes).is_err());
}

#[test]
fn test_editor_permission_group_redirect_dangles() {
    let table = common::resolved_table(filter_async_routes(&async_routes(), &Roles::new(["editor"])));
    let dangling: Vec<_> = table.diagnostics().iter().map(ToString::to_string).collect();
    assert_eq!(
        dangling,
        vec!["route /permission redirects to unknown target /permission/page"]
    );
    assert!(!table.contains_path("/permission"));
    assert!(table.contains_path("/permission/directive"));
}

#[test]
fn test_builtin_cached_views_skip_no_cache() {
    let table = common::resolved_table(async_routes());
    let cached = table.cached_views();
    assert!(cached.contains(&"Dashboard"));
    assert!(cached.contains(&"ComplexTable"));
    assert!(!cached.contains(&"Documentation"));
    assert!(!cached.contains(&"EditArticle"));
}
