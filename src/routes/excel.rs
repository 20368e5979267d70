use crate::routing::{RouteMeta, RouteNode};

pub(super) fn routes() -> RouteNode {
    RouteNode::layout("/excel")
        .redirect_to("/excel/export-excel")
        .named("Excel")
        .meta(RouteMeta::titled("excel").icon("excel"))
        .children(vec![
            RouteNode::view("export-excel", "excel/ExportExcel")
                .named("ExportExcel")
                .meta(RouteMeta::titled("exportExcel")),
            RouteNode::view("export-selected-excel", "excel/SelectExcel")
                .named("SelectExcel")
                .meta(RouteMeta::titled("selectExcel")),
            RouteNode::view("export-merge-header", "excel/MergeHeader")
                .named("MergeHeader")
                .meta(RouteMeta::titled("mergeHeader")),
            RouteNode::view("upload-excel", "excel/UploadExcel")
                .named("UploadExcel")
                .meta(RouteMeta::titled("uploadExcel")),
        ])
}
