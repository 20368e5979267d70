use crate::routing::{RedirectTarget, RouteMeta, RouteNode};

pub(super) fn routes() -> RouteNode {
    RouteNode::layout("/error")
        .redirect(RedirectTarget::NoRedirect)
        .named("ErrorPages")
        .meta(RouteMeta::titled("errorPages").icon("404"))
        .children(vec![
            RouteNode::view("401", "ErrorPage/401")
                .named("Page401")
                .meta(RouteMeta::titled("page401").no_cache()),
            RouteNode::view("404", "ErrorPage/404")
                .named("Page404")
                .meta(RouteMeta::titled("page404").no_cache()),
        ])
}
