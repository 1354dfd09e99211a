//! REST service operations
//!
//! Each module adds typed methods for one resource to [`ConsoleClient`]:
//!
//! - folders: list, fetch, save and delete folders, list a folder's documents
//! - documents: fetch, correct, rename and delete documents
//! - processing: start document processing and poll its status
//! - export: download selected documents as CSV or XLSX
//! - call_logs: list a clinic's calls, fetch and update a call
//! - notes: internal notes on a call log
//!
//! [`ConsoleClient`]: crate::ConsoleClient

mod call_logs;
mod documents;
mod export;
mod folders;
mod notes;
mod processing;

pub use export::*;
pub use processing::*;

use crate::query::ListParams;
use crate::query::PageData;
use crate::query::Pagination;

/// Combines a list response into a page, deriving pagination from the
/// request when the server left it out.
fn into_page<T>(records: Vec<T>, pagination: Option<Pagination>, params: &ListParams) -> PageData<T> {
    let pagination = pagination.unwrap_or_else(|| {
        let total = (u64::from(params.page.saturating_sub(1)) * u64::from(params.limit))
            + records.len() as u64;
        Pagination::new(total, params.limit, params.page)
    });
    PageData::new(records, pagination)
}
