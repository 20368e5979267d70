use crate::routing::{RedirectTarget, RouteMeta, RouteNode};

pub(super) fn routes() -> RouteNode {
    RouteNode::layout("/charts")
        .redirect(RedirectTarget::NoRedirect)
        .named("Charts")
        .meta(RouteMeta::titled("charts").icon("chart"))
        .children(vec![
            RouteNode::view("keyboard", "charts/Keyboard")
                .named("KeyboardChart")
                .meta(RouteMeta::titled("keyboardChart").no_cache()),
            RouteNode::view("line", "charts/Line")
                .named("LineChart")
                .meta(RouteMeta::titled("lineChart").no_cache()),
            RouteNode::view("mix-chart", "charts/MixChart")
                .named("MixChart")
                .meta(RouteMeta::titled("mixChart").no_cache()),
        ])
}
