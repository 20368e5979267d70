use crate::routing::{RouteMeta, RouteNode};

pub(super) fn routes() -> RouteNode {
    RouteNode::layout("/permission")
        .redirect_to("/permission/page")
        .always_show()
        .meta(
            RouteMeta::titled("permission")
                .icon("lock")
                .roles(["admin", "editor"]),
        )
        .children(vec![
            RouteNode::view("page", "permission/Page")
                .named("PagePermission")
                .meta(RouteMeta::titled("pagePermission").roles(["admin"])),
            RouteNode::view("directive", "permission/Directive")
                .named("DirectivePermission")
                .meta(RouteMeta::titled("directivePermission")),
            RouteNode::view("role", "permission/Role")
                .named("RolePermission")
                .meta(RouteMeta::titled("rolePermission").roles(["admin"])),
        ])
}
