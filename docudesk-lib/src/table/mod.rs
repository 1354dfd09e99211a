//! Generic table model - columns, row selection, local search, sortable
//! headers and numbered pagination.
//!
//! The table never interprets records beyond what a column reads from
//! them, never reorders rows itself and holds no network or timer
//! resources. Header and page interactions are reported to the owner
//! both as returned [`TableAction`]s and through the optional callbacks,
//! and the owner re-fetches.
//!
//! # Example
//!
//! ```ignore
//! use docudesk_lib::table::{Column, Table};
//! use docudesk_lib::model::{Folder, FolderField};
//!
//! let columns = vec![
//!     Column::field("Name", FolderField::Name),
//!     Column::field("Status", FolderField::Status),
//!     Column::rendered("Documents", |f: &Folder| f.document_count.unwrap_or(0).to_string()),
//! ];
//! let mut table = Table::new(columns, folders).with_pagination(page.pagination);
//!
//! if let Some(action) = table.click_page(2) {
//!     list.apply_table_action(action);
//! }
//! ```

mod column;
mod record;
mod selection;
mod view;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

pub use column::Column;
pub use record::ColumnKey;
pub use record::TableRecord;
pub use selection::Selection;
pub use view::FooterView;
pub use view::HeaderView;
pub use view::RowView;
pub use view::TableBody;
pub use view::TableContent;
pub use view::TableView;

use crate::query::PAGE_SIZE_OPTIONS;
use crate::query::Pagination;
use crate::query::SortConfig;

/// Message shown in place of a table that has no columns.
pub const NO_COLUMNS_MESSAGE: &str = "Table configuration error: no columns defined";

type Updater = Arc<dyn Fn(Pagination) -> Pagination + Send + Sync>;

/// A requested pagination change: a replacement value or an updater.
#[derive(Clone)]
pub enum PaginationChange {
    Replace(Pagination),
    Update(Updater),
}

impl PaginationChange {
    /// An updater from a function.
    pub fn update<F>(f: F) -> Self
    where
        F: Fn(Pagination) -> Pagination + Send + Sync + 'static,
    {
        Self::Update(Arc::new(f))
    }

    /// Resolves the change against the current pagination.
    pub fn apply(&self, current: Pagination) -> Pagination {
        match self {
            Self::Replace(p) => *p,
            Self::Update(f) => f(current),
        }
    }
}

impl fmt::Debug for PaginationChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace(p) => f.debug_tuple("Replace").field(p).finish(),
            Self::Update(_) => f.write_str("Update(..)"),
        }
    }
}

/// Something the owner of a table should act on.
#[derive(Debug, Clone)]
pub enum TableAction<K> {
    /// A sortable header was clicked.
    Sort(K),
    /// The page or page size changed.
    Paginate(PaginationChange),
}

type SelectCallback<T> = Box<dyn FnMut(&[&T])>;
type SortCallback<K> = Box<dyn FnMut(K)>;
type PaginationCallback = Box<dyn FnMut(PaginationChange)>;

/// Headless table over records of type `T`.
pub struct Table<T: TableRecord> {
    columns: Vec<Column<T>>,
    data: Vec<T>,
    pagination: Option<Pagination>,
    loading: bool,
    search_term: String,
    sort: Option<SortConfig<T::Key>>,
    selection: Selection<T::Id>,
    on_select_rows: Option<SelectCallback<T>>,
    on_sort: Option<SortCallback<T::Key>>,
    on_pagination: Option<PaginationCallback>,
}

impl<T: TableRecord> Table<T> {
    /// Creates a table over `data` with the given columns.
    pub fn new(columns: Vec<Column<T>>, data: Vec<T>) -> Self {
        Self {
            columns,
            data,
            pagination: None,
            loading: false,
            search_term: String::new(),
            sort: None,
            selection: Selection::new(),
            on_select_rows: None,
            on_sort: None,
            on_pagination: None,
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_sort(mut self, sort: SortConfig<T::Key>) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Called with the selected rows after every selection change.
    pub fn on_select_rows(mut self, f: impl FnMut(&[&T]) + 'static) -> Self {
        self.on_select_rows = Some(Box::new(f));
        self
    }

    /// Called with the accessor of a clicked sortable header.
    pub fn on_sort(mut self, f: impl FnMut(T::Key) + 'static) -> Self {
        self.on_sort = Some(Box::new(f));
        self
    }

    /// Called with every pagination change.
    pub fn on_pagination(mut self, f: impl FnMut(PaginationChange) + 'static) -> Self {
        self.on_pagination = Some(Box::new(f));
        self
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn sort(&self) -> Option<&SortConfig<T::Key>> {
        self.sort.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replaces the rows. Selected ids that disappeared are dropped.
    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
        let ids: HashSet<T::Id> = self.data.iter().map(TableRecord::id).collect();
        if self.selection.retain(|id| ids.contains(id)) {
            self.notify_selection();
        }
    }

    pub fn set_pagination(&mut self, pagination: Option<Pagination>) {
        self.pagination = pagination;
    }

    pub fn set_sort(&mut self, sort: Option<SortConfig<T::Key>>) {
        self.sort = sort;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Rows matching the search term.
    ///
    /// A row matches when any column's accessor value contains the term as
    /// typed, case-insensitively. This only narrows the rows already loaded; it
    /// does not replace server-side search.
    pub fn filtered(&self) -> Vec<&T> {
        if self.search_term.is_empty() {
            return self.data.iter().collect();
        }
        let term = self.search_term.to_lowercase();
        self.data
            .iter()
            .filter(|row| {
                self.columns.iter().any(|column| {
                    column
                        .raw_value(row)
                        .is_some_and(|value| value.to_lowercase().contains(&term))
                })
            })
            .collect()
    }

    /// Selected rows, in selection order.
    pub fn selected_rows(&self) -> Vec<&T> {
        self.selection
            .ids()
            .iter()
            .filter_map(|id| self.data.iter().find(|row| row.id() == *id))
            .collect()
    }

    pub fn selected_ids(&self) -> &[T::Id] {
        self.selection.ids()
    }

    pub fn is_selected(&self, id: &T::Id) -> bool {
        self.selection.is_selected(id)
    }

    /// Whether the "select all" box shows checked.
    pub fn is_all_selected(&self) -> bool {
        let visible = self.filtered();
        !visible.is_empty() && visible.iter().all(|row| self.selection.is_selected(&row.id()))
    }

    /// Toggles one row's checkbox. Ids with no loaded row are ignored.
    pub fn toggle_row(&mut self, id: &T::Id) {
        if !self.data.iter().any(|row| row.id() == *id) {
            return;
        }
        self.selection.toggle(id);
        self.notify_selection();
    }

    /// Toggles the "select all" checkbox over the filtered rows.
    pub fn toggle_all(&mut self) {
        if self.is_all_selected() {
            self.selection.clear();
        } else {
            let ids: Vec<T::Id> = self.filtered().into_iter().map(TableRecord::id).collect();
            self.selection.set(ids);
        }
        self.notify_selection();
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.notify_selection();
        }
    }

    /// Clicks the header of column `index`. Only sortable columns react.
    pub fn click_header(&mut self, index: usize) -> Option<TableAction<T::Key>> {
        let key = self.columns.get(index)?.accessor()?;
        if let Some(on_sort) = self.on_sort.as_mut() {
            on_sort(key);
        }
        Some(TableAction::Sort(key))
    }

    /// Clicks page number `page`.
    pub fn click_page(&mut self, page: u32) -> Option<TableAction<T::Key>> {
        let current = self.pagination?;
        if page == current.current_page {
            return None;
        }
        self.paginate(PaginationChange::update(move |p| p.go_to(page)))
    }

    /// Clicks "next".
    pub fn next_page(&mut self) -> Option<TableAction<T::Key>> {
        let next = self.pagination?.next()?;
        self.click_page(next.current_page)
    }

    /// Clicks "previous".
    pub fn prev_page(&mut self) -> Option<TableAction<T::Key>> {
        let prev = self.pagination?.prev()?;
        self.click_page(prev.current_page)
    }

    /// Picks a new page size; returns to the first page.
    pub fn change_page_size(&mut self, page_size: u32) -> Option<TableAction<T::Key>> {
        let current = self.pagination?;
        if page_size == 0 || page_size == current.page_size {
            return None;
        }
        self.paginate(PaginationChange::update(move |p| p.with_page_size(page_size)))
    }

    fn paginate(&mut self, change: PaginationChange) -> Option<TableAction<T::Key>> {
        self.pagination = self.pagination.map(|p| change.apply(p));
        if let Some(on_pagination) = self.on_pagination.as_mut() {
            on_pagination(change.clone());
        }
        Some(TableAction::Paginate(change))
    }

    fn notify_selection(&mut self) {
        if let Some(mut callback) = self.on_select_rows.take() {
            callback(&self.selected_rows());
            self.on_select_rows = Some(callback);
        }
    }

    /// Builds the display model.
    pub fn view(&self) -> TableView {
        if self.columns.is_empty() {
            return TableView::Invalid {
                message: NO_COLUMNS_MESSAGE.to_string(),
            };
        }

        let headers = self
            .columns
            .iter()
            .map(|column| HeaderView {
                title: column.header().to_string(),
                sortable: column.is_sortable(),
                sort_glyph: match (column.accessor(), &self.sort) {
                    (Some(key), Some(sort)) => sort.glyph_for(&key),
                    _ => None,
                },
            })
            .collect();

        let rows = self.filtered();
        let body = if self.loading {
            TableBody::Loading
        } else if rows.is_empty() {
            TableBody::Empty
        } else {
            TableBody::Rows(
                rows.iter()
                    .map(|row| RowView {
                        cells: self.columns.iter().map(|c| c.cell(row)).collect(),
                        selected: self.selection.is_selected(&row.id()),
                    })
                    .collect(),
            )
        };

        let footer = self.pagination.map(|p| FooterView {
            page_size: p.page_size,
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            links: p.links(),
            current_page: p.current_page,
            summary: p.summary(),
            page_label: p.page_label(),
            has_prev: p.has_prev_page,
            has_next: p.has_next_page,
        });

        TableView::Table(TableContent {
            headers,
            body,
            all_selected: self.is_all_selected(),
            selected_count: self.selection.len(),
            footer,
        })
    }
}

impl<T: TableRecord> fmt::Debug for Table<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.columns)
            .field("rows", &self.data.len())
            .field("pagination", &self.pagination)
            .field("loading", &self.loading)
            .field("search_term", &self.search_term)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::query::PageLink;
    use crate::query::SortDirection;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        id: u32,
        name: String,
        city: String,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum PersonField {
        Name,
        City,
    }

    impl ColumnKey for PersonField {
        fn name(&self) -> &'static str {
            match self {
                Self::Name => "name",
                Self::City => "city",
            }
        }

        fn parse(name: &str) -> Option<Self> {
            match name {
                "name" => Some(Self::Name),
                "city" => Some(Self::City),
                _ => None,
            }
        }
    }

    impl TableRecord for Person {
        type Id = u32;
        type Key = PersonField;

        fn id(&self) -> u32 {
            self.id
        }

        fn value(&self, key: PersonField) -> Option<String> {
            Some(match key {
                PersonField::Name => self.name.clone(),
                PersonField::City => self.city.clone(),
            })
        }
    }

    fn person(id: u32, name: &str, city: &str) -> Person {
        Person {
            id,
            name: name.to_string(),
            city: city.to_string(),
        }
    }

    fn people() -> Vec<Person> {
        vec![
            person(1, "Alice", "Lyon"),
            person(2, "Bob", "Paris"),
            person(3, "Carla", "Alicante"),
        ]
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let table = Table::new(
            vec![Column::field("Name", PersonField::Name)],
            vec![person(1, "Alice", ""), person(2, "Bob", "")],
        )
        .with_search_term("ali");
        let names: Vec<_> = table.filtered().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Alice"]);
    }

    #[test]
    fn search_term_is_matched_as_typed() {
        let table = Table::new(
            vec![Column::field("Name", PersonField::Name)],
            vec![person(1, "Alice", ""), person(2, "Ali Baba", "")],
        )
        .with_search_term("ali ");
        let ids: Vec<_> = table.filtered().iter().map(|p| p.id).collect();
        assert_eq!(ids, [2]);

        let blank = Table::new(vec![Column::field("Name", PersonField::Name)], people())
            .with_search_term("   ");
        assert!(blank.filtered().is_empty());
    }

    #[test]
    fn search_checks_every_accessor_column() {
        let table = Table::new(
            vec![
                Column::field("Name", PersonField::Name),
                Column::field("City", PersonField::City),
            ],
            people(),
        )
        .with_search_term("ALI");
        let ids: Vec<_> = table.filtered().iter().map(|p| p.id).collect();
        assert_eq!(ids, [1, 3]);
    }

    #[test]
    fn rendered_columns_are_not_searched_or_sortable() {
        let mut table = Table::new(
            vec![Column::rendered("Label", |p: &Person| format!("#{}", p.name))],
            people(),
        )
        .with_search_term("bob");
        assert!(table.filtered().is_empty());
        assert!(table.click_header(0).is_none());
    }

    #[test]
    fn select_all_toggles_filtered_rows_and_echoes() {
        let echoed = Rc::new(RefCell::new(Vec::new()));
        let sink = echoed.clone();
        let mut table = Table::new(vec![Column::field("Name", PersonField::Name)], people())
            .with_search_term("a")
            .on_select_rows(move |rows| {
                *sink.borrow_mut() = rows.iter().map(|p| p.id).collect::<Vec<_>>();
            });

        assert!(!table.is_all_selected());
        table.toggle_all();
        assert!(table.is_all_selected());
        assert_eq!(*echoed.borrow(), vec![1, 3]);

        table.toggle_all();
        assert!(!table.is_all_selected());
        assert!(echoed.borrow().is_empty());
    }

    #[test]
    fn select_all_unchecked_for_empty_table() {
        let mut table: Table<Person> =
            Table::new(vec![Column::field("Name", PersonField::Name)], Vec::new());
        table.toggle_all();
        assert!(!table.is_all_selected());
    }

    #[test]
    fn single_row_toggle_echoes_each_change() {
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        let mut table = Table::new(vec![Column::field("Name", PersonField::Name)], people())
            .on_select_rows(move |_| *counter.borrow_mut() += 1);
        table.toggle_row(&2);
        table.toggle_row(&3);
        table.toggle_row(&2);
        assert_eq!(*calls.borrow(), 3);
        assert_eq!(table.selected_ids(), &[3]);
    }

    #[test]
    fn unknown_row_ids_are_not_selected() {
        let mut table = Table::new(
            vec![Column::field("Name", PersonField::Name)],
            vec![person(1, "Alice", ""), person(2, "Bob", "")],
        );
        table.toggle_row(&1);
        table.toggle_row(&99);
        assert_eq!(table.selected_ids(), &[1]);
        assert!(!table.is_all_selected());
    }

    #[test]
    fn select_all_checked_only_when_every_visible_row_is() {
        let mut table = Table::new(vec![Column::field("Name", PersonField::Name)], people());
        table.toggle_row(&2);
        table.set_search_term("a");
        assert!(!table.is_all_selected());
        table.toggle_row(&1);
        table.toggle_row(&3);
        assert!(table.is_all_selected());
    }

    #[test]
    fn set_data_drops_vanished_selection() {
        let mut table = Table::new(vec![Column::field("Name", PersonField::Name)], people());
        table.toggle_row(&1);
        table.toggle_row(&2);
        table.set_data(vec![person(2, "Bob", "Paris")]);
        assert_eq!(table.selected_ids(), &[2]);
    }

    #[test]
    fn header_click_reports_accessor_without_reordering() {
        let sorted = Rc::new(RefCell::new(None));
        let sink = sorted.clone();
        let mut table = Table::new(
            vec![
                Column::field("Name", PersonField::Name),
                Column::field("City", PersonField::City),
            ],
            people(),
        )
        .on_sort(move |key| *sink.borrow_mut() = Some(key));

        let action = table.click_header(1);
        assert!(matches!(action, Some(TableAction::Sort(PersonField::City))));
        assert_eq!(*sorted.borrow(), Some(PersonField::City));
        assert_eq!(table.data(), people().as_slice());
    }

    #[test]
    fn header_shows_glyph_of_active_sort() {
        let table = Table::new(
            vec![
                Column::field("Name", PersonField::Name),
                Column::field("City", PersonField::City),
            ],
            people(),
        )
        .with_sort(SortConfig::new(PersonField::City, SortDirection::Asc));
        let TableView::Table(content) = table.view() else {
            panic!("expected a table");
        };
        assert_eq!(content.headers[0].sort_glyph, None);
        assert_eq!(content.headers[1].sort_glyph, Some("↑"));
    }

    #[test]
    fn page_click_updates_page_only() {
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        let start = Pagination::new(47, 20, 1);
        let mut table = Table::new(vec![Column::field("Name", PersonField::Name)], people())
            .with_pagination(start)
            .on_pagination(move |change| *sink.borrow_mut() = Some(change.apply(start)));

        let action = table.click_page(3).unwrap();
        let TableAction::Paginate(change) = action else {
            panic!("expected pagination");
        };
        let next = change.apply(start);
        assert_eq!(next.current_page, 3);
        assert_eq!(next.page_size, 20);
        assert_eq!(next.total_items, 47);
        assert!(next.has_prev_page && !next.has_next_page);
        assert_eq!(*seen.borrow(), Some(next));
        assert_eq!(table.pagination(), Some(&next));
    }

    #[test]
    fn clicking_current_page_does_nothing() {
        let mut table = Table::new(vec![Column::field("Name", PersonField::Name)], people())
            .with_pagination(Pagination::new(47, 20, 2));
        assert!(table.click_page(2).is_none());
    }

    #[test]
    fn page_size_change_returns_to_first_page() {
        let mut table = Table::new(vec![Column::field("Name", PersonField::Name)], people())
            .with_pagination(Pagination::new(47, 20, 3));
        table.change_page_size(10);
        let p = table.pagination().unwrap();
        assert_eq!(p.current_page, 1);
        assert_eq!(p.total_pages, 5);
    }

    #[test]
    fn next_and_prev_respect_bounds() {
        let mut table = Table::new(vec![Column::field("Name", PersonField::Name)], people())
            .with_pagination(Pagination::new(47, 20, 1));
        assert!(table.prev_page().is_none());
        assert!(table.next_page().is_some());
        assert_eq!(table.pagination().unwrap().current_page, 2);
    }

    #[test]
    fn footer_for_forty_seven_items() {
        let table = Table::new(vec![Column::field("Name", PersonField::Name)], people())
            .with_pagination(Pagination::new(47, 20, 2));
        let TableView::Table(content) = table.view() else {
            panic!("expected a table");
        };
        let footer = content.footer.unwrap();
        assert_eq!(footer.page_size, 20);
        assert_eq!(
            footer.links,
            vec![PageLink::Page(1), PageLink::Page(2), PageLink::Page(3)]
        );
        assert_eq!(footer.page_label, "Page 2 of 3");
        assert_eq!(footer.summary, "Showing 21 to 40 of 47 results");
    }

    #[test]
    fn missing_columns_render_inline_message() {
        let table: Table<Person> = Table::new(Vec::new(), people());
        assert_eq!(
            table.view(),
            TableView::Invalid {
                message: NO_COLUMNS_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn loading_and_empty_bodies() {
        let table = Table::new(vec![Column::field("Name", PersonField::Name)], people())
            .with_loading(true);
        let TableView::Table(content) = table.view() else {
            panic!("expected a table");
        };
        assert_eq!(content.body, TableBody::Loading);

        let table: Table<Person> =
            Table::new(vec![Column::field("Name", PersonField::Name)], Vec::new());
        let TableView::Table(content) = table.view() else {
            panic!("expected a table");
        };
        assert_eq!(content.body, TableBody::Empty);
    }
}
