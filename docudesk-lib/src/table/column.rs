//! Column definitions.

use std::fmt;

use super::TableRecord;

type CellRenderer<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// One column of a table.
///
/// A column either reads a field through its accessor key (and is then
/// sortable), or supplies its own renderer and is not sortable. A sortable
/// column may also override how its cells are shown.
pub struct Column<T: TableRecord> {
    header: String,
    accessor: Option<T::Key>,
    render_cell: Option<CellRenderer<T>>,
}

impl<T: TableRecord> Column<T> {
    /// A sortable column reading `key`.
    pub fn field(header: impl Into<String>, key: T::Key) -> Self {
        Self {
            header: header.into(),
            accessor: Some(key),
            render_cell: None,
        }
    }

    /// A non-sortable column drawn entirely by `render`.
    pub fn rendered<F>(header: impl Into<String>, render: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            header: header.into(),
            accessor: None,
            render_cell: Some(Box::new(render)),
        }
    }

    /// Overrides how this column's cells are shown.
    pub fn with_renderer<F>(mut self, render: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.render_cell = Some(Box::new(render));
        self
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn accessor(&self) -> Option<T::Key> {
        self.accessor
    }

    /// Only columns with an accessor can be sorted.
    pub fn is_sortable(&self) -> bool {
        self.accessor.is_some()
    }

    /// The raw accessor value, used for search filtering.
    pub fn raw_value(&self, row: &T) -> Option<String> {
        self.accessor.and_then(|key| row.value(key))
    }

    /// The text shown in this column for `row`.
    pub fn cell(&self, row: &T) -> String {
        match &self.render_cell {
            Some(render) => render(row),
            None => self.raw_value(row).unwrap_or_default(),
        }
    }
}

impl<T: TableRecord> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("header", &self.header)
            .field("accessor", &self.accessor)
            .field("custom_renderer", &self.render_cell.is_some())
            .finish()
    }
}
