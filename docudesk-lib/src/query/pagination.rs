//! Pagination metadata and the page-link algorithm.

use serde::Deserialize;
use serde::Serialize;

/// Page sizes offered by the page-size selector.
pub const PAGE_SIZE_OPTIONS: &[u32] = &[10, 20, 50, 100];

/// Pagination state for a server-paged list.
///
/// The flags are expected to satisfy `has_next_page == current_page < total_pages`
/// and `has_prev_page == current_page > 1`. Values built with
/// [`Pagination::new`] always do; values received from callers are trusted
/// as they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawPagination")]
pub struct Pagination {
    pub total_items: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub page_size: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, 20, 1)
    }
}

impl Pagination {
    /// Builds consistent pagination from a total, a page size and a page.
    ///
    /// A zero page size is treated as 1 and a zero page as the first page.
    pub fn new(total_items: u64, page_size: u32, current_page: u32) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_pages_for(total_items, page_size);
        Self::with_flags(total_items, total_pages, current_page.max(1), page_size)
    }

    fn with_flags(total_items: u64, total_pages: u32, current_page: u32, page_size: u32) -> Self {
        Self {
            total_items,
            total_pages,
            current_page,
            page_size,
            has_next_page: current_page < total_pages,
            has_prev_page: current_page > 1,
        }
    }

    /// Moves to `page`, recomputing the navigation flags.
    ///
    /// Page size and total are untouched; the owner re-fetches.
    pub fn go_to(self, page: u32) -> Self {
        let last = self.total_pages.max(1);
        Self::with_flags(self.total_items, self.total_pages, page.clamp(1, last), self.page_size)
    }

    /// Switches to a new page size and returns to the first page.
    pub fn with_page_size(self, page_size: u32) -> Self {
        Self::new(self.total_items, page_size, 1)
    }

    /// The next page, if any.
    pub fn next(self) -> Option<Self> {
        self.has_next_page.then(|| self.go_to(self.current_page + 1))
    }

    /// The previous page, if any.
    pub fn prev(self) -> Option<Self> {
        self.has_prev_page.then(|| self.go_to(self.current_page - 1))
    }

    /// 1-based inclusive range of items shown on the current page, or
    /// `None` when the page is empty.
    pub fn item_range(&self) -> Option<(u64, u64)> {
        let size = u64::from(self.page_size.max(1));
        let start = u64::from(self.current_page.saturating_sub(1)) * size + 1;
        if self.total_items == 0 || start > self.total_items {
            return None;
        }
        let end = (start + size - 1).min(self.total_items);
        Some((start, end))
    }

    /// "Showing 21 to 40 of 47 results".
    pub fn summary(&self) -> String {
        match self.item_range() {
            Some((start, end)) => {
                format!("Showing {} to {} of {} results", start, end, self.total_items)
            }
            None => "No results".to_string(),
        }
    }

    /// "Page 2 of 3".
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages.max(1))
    }

    /// The numbered page links for this pagination.
    pub fn links(&self) -> Vec<PageLink> {
        page_links(self.current_page, self.total_pages)
    }
}

fn total_pages_for(total_items: u64, page_size: u32) -> u32 {
    let pages = total_items.div_ceil(u64::from(page_size.max(1)));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// One entry in the numbered pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    /// A clickable page number.
    Page(u32),
    /// A collapsed run of pages.
    Ellipsis,
}

impl std::fmt::Display for PageLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageLink::Page(n) => write!(f, "{n}"),
            PageLink::Ellipsis => f.write_str("…"),
        }
    }
}

/// Computes the page links to render.
///
/// Up to five pages are all shown. Beyond that the first and last pages are
/// always present, the neighbours of the current page are shown, and gaps
/// collapse into an ellipsis. A current page outside `1..=total_pages` is
/// clamped into it.
pub fn page_links(current_page: u32, total_pages: u32) -> Vec<PageLink> {
    if total_pages <= 5 {
        return (1..=total_pages).map(PageLink::Page).collect();
    }

    let current_page = current_page.clamp(1, total_pages);
    let mut links = vec![PageLink::Page(1)];
    if current_page > 3 {
        links.push(PageLink::Ellipsis);
    }

    let start = current_page.saturating_sub(1).max(2);
    let end = current_page.saturating_add(1).min(total_pages - 1);
    links.extend((start..=end).map(PageLink::Page));

    if current_page < total_pages - 2 {
        links.push(PageLink::Ellipsis);
    }
    links.push(PageLink::Page(total_pages));
    links
}

/// Wire shape: accepts camelCase or snake_case keys and derives whatever
/// the server left out.
#[derive(Deserialize)]
struct RawPagination {
    #[serde(alias = "total_items", alias = "total")]
    total_items: u64,
    #[serde(alias = "total_pages", alias = "pages", default)]
    total_pages: Option<u32>,
    #[serde(alias = "current_page", alias = "page", default)]
    current_page: Option<u32>,
    #[serde(alias = "page_size", alias = "limit", default)]
    page_size: Option<u32>,
    #[serde(alias = "has_next_page", default)]
    has_next_page: Option<bool>,
    #[serde(alias = "has_prev_page", default)]
    has_prev_page: Option<bool>,
}

impl From<RawPagination> for Pagination {
    fn from(raw: RawPagination) -> Self {
        let page_size = raw.page_size.unwrap_or(20).max(1);
        let current_page = raw.current_page.unwrap_or(1).max(1);
        let total_pages = raw
            .total_pages
            .unwrap_or_else(|| total_pages_for(raw.total_items, page_size));
        Self {
            total_items: raw.total_items,
            total_pages,
            current_page,
            page_size,
            has_next_page: raw.has_next_page.unwrap_or(current_page < total_pages),
            has_prev_page: raw.has_prev_page.unwrap_or(current_page > 1),
        }
    }
}
