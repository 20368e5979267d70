use crate::routing::{RouteMeta, RouteNode};

pub(super) fn routes() -> RouteNode {
    RouteNode::layout("/example")
        .redirect_to("/example/list")
        .named("Example")
        .meta(RouteMeta::titled("example").icon("example"))
        .children(vec![
            RouteNode::view("create", "articles/Create")
                .named("CreateArticle")
                .meta(RouteMeta::titled("createArticle").icon("edit")),
            RouteNode::view("edit/:id", "articles/Edit")
                .named("EditArticle")
                .meta(RouteMeta::titled("editArticle").no_cache())
                .hidden(),
            RouteNode::view("list", "articles/List")
                .named("ArticleList")
                .meta(RouteMeta::titled("articleList").icon("list")),
        ])
}
