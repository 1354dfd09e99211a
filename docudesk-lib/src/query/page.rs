//! A page of list results.

use super::Pagination;

/// One page of records together with the server's pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PageData<T> {
    /// The records on this page, in server order.
    pub records: Vec<T>,
    /// Pagination for the whole result set.
    pub pagination: Pagination,
}

impl<T> PageData<T> {
    /// Creates a page from records and pagination.
    pub fn new(records: Vec<T>, pagination: Pagination) -> Self {
        Self { records, pagination }
    }

    /// Returns `true` if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records in this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Maps the records, keeping the pagination.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PageData<U> {
        PageData {
            records: self.records.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
