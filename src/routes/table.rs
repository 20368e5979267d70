use crate::routing::{RouteMeta, RouteNode};

pub(super) fn routes() -> RouteNode {
    RouteNode::layout("/table")
        .redirect_to("/table/complex-table")
        .named("Table")
        .meta(RouteMeta::titled("Table").icon("table"))
        .children(vec![
            RouteNode::view("dynamic-table", "table/DynamicTable")
                .named("DynamicTable")
                .meta(RouteMeta::titled("dynamicTable")),
            RouteNode::view("drag-table", "table/DragTable")
                .named("DragTable")
                .meta(RouteMeta::titled("dragTable")),
            RouteNode::view("inline-edit-table", "table/InlineEditTable")
                .named("InlineEditTable")
                .meta(RouteMeta::titled("inlineEditTable")),
            RouteNode::view("complex-table", "table/ComplexTable")
                .named("ComplexTable")
                .meta(RouteMeta::titled("complexTable")),
        ])
}
