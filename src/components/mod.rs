/// Graph view element and its DOM-free core.
pub mod graph_view;
