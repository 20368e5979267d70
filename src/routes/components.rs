use crate::routing::{RedirectTarget, RouteMeta, RouteNode};

pub(super) fn routes() -> RouteNode {
    let demo = |path: &str, view: &str, name: &str, title: &str| {
        RouteNode::view(path, format!("components-demo/{}", view))
            .named(name)
            .meta(RouteMeta::titled(title))
    };

    RouteNode::layout("/components")
        .redirect(RedirectTarget::NoRedirect)
        .named("ComponentDemo")
        .meta(RouteMeta::titled("components").icon("component"))
        .children(vec![
            demo("tinymce", "Tinymce", "TinymceDemo", "tinymce"),
            demo("markdown", "Markdown", "MarkdownDemo", "markdown"),
            demo("json-editor", "JsonEditor", "JsonEditorDemo", "jsonEditor"),
            demo("split-pane", "SplitPane", "SplitPaneDemo", "splitPane"),
            demo("avatar-upload", "AvatarUpload", "AvatarUploadDemo", "avatarUpload"),
            demo("dropzone", "Dropzone", "DropzoneDemo", "dropzone"),
            demo("sticky", "Sticky", "StickyDemo", "sticky"),
            demo("count-to", "CountTo", "CountToDemo", "countTo"),
            demo("back-to-top", "BackToTop", "BackToTopDemo", "backToTop"),
            demo("drag-dialog", "DragDialog", "DragDialogDemo", "dragDialog"),
            demo("dnd-list", "DndList", "DndListDemo", "dndList"),
            demo("drag-kanban", "DragKanban", "DragKanbanDemo", "dragKanban"),
        ])
}
