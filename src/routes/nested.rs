use crate::routing::{RouteMeta, RouteNode};

pub(super) fn routes() -> RouteNode {
    RouteNode::layout("/nested")
        .redirect_to("/nested/menu1/menu1-1")
        .named("Nested")
        .meta(RouteMeta::titled("nested").icon("nested"))
        .children(vec![
            RouteNode::outlet("menu1")
                .named("Menu1")
                .meta(RouteMeta::titled("menu1"))
                .children(vec![
                    RouteNode::view("menu1-1", "nested/menu1/menu1-1")
                        .named("Menu1-1")
                        .meta(RouteMeta::titled("menu1-1")),
                    RouteNode::outlet("menu1-2")
                        .named("Menu1-2")
                        .meta(RouteMeta::titled("menu1-2"))
                        .children(vec![
                            RouteNode::view("menu1-2-1", "nested/menu1/menu1-2/menu1-2-1")
                                .named("Menu1-2-1")
                                .meta(RouteMeta::titled("menu1-2-1")),
                            RouteNode::view("menu1-2-2", "nested/menu1/menu1-2/menu1-2-2")
                                .named("Menu1-2-2")
                                .meta(RouteMeta::titled("menu1-2-2")),
                        ]),
                    RouteNode::view("menu1-3", "nested/menu1/menu1-3")
                        .named("Menu1-3")
                        .meta(RouteMeta::titled("menu1-3")),
                ]),
            RouteNode::view("menu2", "nested/menu2/index")
                .named("Menu2")
                .meta(RouteMeta::titled("menu2")),
        ])
}
