//! Display model produced by [`Table::view`](super::Table::view).

use crate::query::PageLink;

/// What a table renders as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView {
    /// The table is misconfigured; show `message` in its place.
    Invalid { message: String },
    Table(TableContent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableContent {
    pub headers: Vec<HeaderView>,
    pub body: TableBody,
    /// State of the "select all" checkbox.
    pub all_selected: bool,
    pub selected_count: usize,
    /// Present when the table is paginated.
    pub footer: Option<FooterView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub title: String,
    pub sortable: bool,
    /// `↑` or `↓` on the active sort column.
    pub sort_glyph: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    Loading,
    Empty,
    Rows(Vec<RowView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub cells: Vec<String>,
    pub selected: bool,
}

/// Page-size selector, page links and the range summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterView {
    pub page_size: u32,
    pub page_size_options: Vec<u32>,
    pub links: Vec<PageLink>,
    pub current_page: u32,
    pub summary: String,
    pub page_label: String,
    pub has_prev: bool,
    pub has_next: bool,
}
