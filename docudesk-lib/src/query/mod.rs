//! List query state: pagination, sorting and URL-synchronized parameters.
//!
//! - [`Pagination`] - page metadata returned with every list response
//! - [`page_links`] - numbered page links with ellipsis collapsing
//! - [`SortConfig`] - the active sort column and direction
//! - [`ListParams`] - search/filter/page/sort state mirrored into the URL
//! - [`LocationSync`] - merges parameter updates into a location, replacing history
//! - [`PageData`] - one page of records plus its pagination

mod page;
mod pagination;
mod params;
mod sort;

pub use page::PageData;
pub use pagination::PAGE_SIZE_OPTIONS;
pub use pagination::PageLink;
pub use pagination::Pagination;
pub use pagination::page_links;
pub use params::DEFAULT_LIMIT;
pub use params::DEFAULT_ORDER_BY;
pub use params::ListParams;
pub use params::ListParamsUpdate;
pub use params::LocationSync;
pub use sort::SortConfig;
pub use sort::SortDirection;
