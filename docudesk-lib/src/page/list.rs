//! Server-paged list state

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Error;
use crate::error::Presentation;
use crate::query::ListParams;
use crate::query::ListParamsUpdate;
use crate::query::LocationSync;
use crate::query::PageData;
use crate::query::Pagination;
use crate::query::SortConfig;
use crate::query::SortDirection;
use crate::table::Column;
use crate::table::ColumnKey;
use crate::table::Table;
use crate::table::TableAction;
use crate::table::TableRecord;

/// Fetches one page of a list.
#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    type Record: TableRecord + Send + 'static;

    async fn fetch(&self, params: &ListParams) -> Result<PageData<Self::Record>, Error>;
}

/// Inline error shown in place of a list, with a retry button when
/// `retryable`. Every failed fetch can be retried, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageError {
    pub message: String,
    pub presentation: Presentation,
    pub retryable: bool,
}

impl From<&Error> for PageError {
    fn from(error: &Error) -> Self {
        let presentation = error.presentation();
        Self {
            message: error.to_string(),
            retryable: true,
            presentation,
        }
    }
}

/// A fetch that has been issued but not yet applied.
///
/// Run it with [`PendingFetch::run`] and hand the outcome back to
/// [`ListPage::complete`]. Only the most recently issued fetch is applied.
pub struct PendingFetch<S: ListSource> {
    seq: u64,
    params: ListParams,
    source: Arc<S>,
}

impl<S: ListSource> PendingFetch<S> {
    pub fn params(&self) -> &ListParams {
        &self.params
    }

    pub async fn run(self) -> FetchOutcome<S::Record> {
        let result = self.source.fetch(&self.params).await;
        FetchOutcome {
            seq: self.seq,
            result,
        }
    }
}

/// Result of a [`PendingFetch`].
pub struct FetchOutcome<R> {
    seq: u64,
    result: Result<PageData<R>, Error>,
}

impl<R> FetchOutcome<R> {
    pub fn result(&self) -> &Result<PageData<R>, Error> {
        &self.result
    }
}

/// Records, pagination, filters and sort of one list view.
///
/// Filter, page and sort changes are written to the [`LocationSync`]
/// (replacing the history entry) and a refetch is expected afterwards.
pub struct ListPage<S: ListSource> {
    source: Arc<S>,
    location: LocationSync,
    params: ListParams,
    records: Vec<S::Record>,
    pagination: Option<Pagination>,
    loading: bool,
    error: Option<PageError>,
    issued: u64,
}

impl<S: ListSource> ListPage<S> {
    /// Creates a page whose parameters are read from `location`.
    pub fn new(source: S, location: LocationSync) -> Self {
        let params = location.params();
        Self {
            source: Arc::new(source),
            location,
            params,
            records: Vec::new(),
            pagination: None,
            loading: false,
            error: None,
            issued: 0,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn params(&self) -> &ListParams {
        &self.params
    }

    pub fn location(&self) -> &LocationSync {
        &self.location
    }

    pub fn records(&self) -> &[S::Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [S::Record] {
        &mut self.records
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&PageError> {
        self.error.as_ref()
    }

    /// The active sort, when `order_by` names a known column.
    pub fn sort(&self) -> SortConfig<<S::Record as TableRecord>::Key> {
        match <<S::Record as TableRecord>::Key as ColumnKey>::parse(&self.params.order_by) {
            Some(key) => SortConfig::new(key, self.params.order_direction),
            None => SortConfig::unsorted(),
        }
    }

    /// Changes the search term and returns to the first page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.update(ListParamsUpdate::new().search(search).page(1));
    }

    /// Sets or clears the status filter and returns to the first page.
    pub fn set_status(&mut self, status: Option<String>) {
        self.update(ListParamsUpdate::new().status(status).page(1));
    }

    /// Sorts by `key`, flipping the direction if it is already the
    /// ascending sort, and returns to the first page.
    pub fn sort_by(&mut self, key: <S::Record as TableRecord>::Key) {
        let sort = self.sort().toggled(key);
        let direction = sort.direction.unwrap_or(SortDirection::Asc);
        self.update(ListParamsUpdate::new().order(key.name(), direction).page(1));
    }

    pub fn go_to_page(&mut self, page: u32) {
        self.update(ListParamsUpdate::new().page(page));
    }

    /// Changes the page size and returns to the first page.
    pub fn set_page_size(&mut self, limit: u32) {
        self.update(ListParamsUpdate::new().limit(limit).page(1));
    }

    /// Applies a header or page click reported by the table.
    pub fn apply_table_action(&mut self, action: TableAction<<S::Record as TableRecord>::Key>) {
        match action {
            TableAction::Sort(key) => self.sort_by(key),
            TableAction::Paginate(change) => {
                let current = self
                    .pagination
                    .unwrap_or_else(|| Pagination::new(0, self.params.limit, self.params.page));
                let next = change.apply(current);
                self.pagination = Some(next);
                self.update(
                    ListParamsUpdate::new()
                        .page(next.current_page)
                        .limit(next.page_size),
                );
            }
        }
    }

    fn update(&mut self, update: ListParamsUpdate) {
        self.params = self.location.replace(&update);
    }

    /// Issues a fetch for the current parameters.
    ///
    /// Any fetch issued earlier becomes stale: its outcome will be ignored.
    pub fn begin_fetch(&mut self) -> PendingFetch<S> {
        self.issued += 1;
        self.loading = true;
        PendingFetch {
            seq: self.issued,
            params: self.params.clone(),
            source: self.source.clone(),
        }
    }

    /// Applies a fetch outcome. Returns `false` if it was stale.
    pub fn complete(&mut self, outcome: FetchOutcome<S::Record>) -> bool {
        if outcome.seq != self.issued {
            log::debug!(
                "discarding stale list response #{} (latest #{})",
                outcome.seq,
                self.issued
            );
            return false;
        }

        self.loading = false;
        match outcome.result {
            Ok(page) => {
                self.records = page.records;
                self.pagination = Some(page.pagination);
                self.error = None;
            }
            Err(e) => {
                log::warn!("list fetch failed: {e}");
                self.error = Some(PageError::from(&e));
            }
        }
        true
    }

    /// Fetches the current parameters and applies the result.
    pub async fn refresh(&mut self) -> Result<(), PageError> {
        let pending = self.begin_fetch();
        let outcome = pending.run().await;
        self.complete(outcome);
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    /// Repeats the last fetch after an error.
    pub async fn retry(&mut self) -> Result<(), PageError> {
        self.refresh().await
    }

    /// Builds a table over the current records.
    pub fn table(&self, columns: Vec<Column<S::Record>>) -> Table<S::Record>
    where
        S::Record: Clone,
    {
        let mut table = Table::new(columns, self.records.clone())
            .with_sort(self.sort())
            .with_loading(self.loading);
        table.set_pagination(self.pagination);
        table
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use url::Url;

    use super::*;
    use crate::error::ApiError;
    use crate::model::Folder;
    use crate::model::FolderField;
    use crate::table::PaginationChange;

    #[derive(Default)]
    struct FakeFolders {
        fail: Mutex<bool>,
        seen: Mutex<Vec<ListParams>>,
    }

    fn folder(id: i64, name: &str) -> Folder {
        serde_json::from_value(serde_json::json!({"id": id, "name": name})).unwrap()
    }

    #[async_trait]
    impl ListSource for FakeFolders {
        type Record = Folder;

        async fn fetch(&self, params: &ListParams) -> Result<PageData<Folder>, Error> {
            self.seen.lock().unwrap().push(params.clone());
            if *self.fail.lock().unwrap() {
                return Err(Error::Api(ApiError::http(503, "unavailable")));
            }
            let records = vec![folder(i64::from(params.page), &params.search)];
            Ok(PageData::new(records, Pagination::new(47, params.limit, params.page)))
        }
    }

    fn page(query: &str) -> ListPage<FakeFolders> {
        let mut url = Url::parse("https://console.example.com/folders").unwrap();
        url.set_query(Some(query));
        ListPage::new(FakeFolders::default(), LocationSync::new(url))
    }

    #[tokio::test]
    async fn params_come_from_location() {
        let mut page = page("page=2&limit=50&search=acme");
        page.refresh().await.unwrap();
        let seen = page.source().seen.lock().unwrap().clone();
        assert_eq!(seen[0].page, 2);
        assert_eq!(seen[0].limit, 50);
        assert_eq!(page.records()[0].name, "acme");
        assert_eq!(page.pagination().unwrap().total_pages, 1);
    }

    #[test]
    fn search_and_sort_reset_to_first_page() {
        let mut page = page("page=3");
        page.set_search("inv");
        assert_eq!(page.params().page, 1);

        page.go_to_page(4);
        page.sort_by(FolderField::Name);
        assert_eq!(page.params().page, 1);
        assert_eq!(page.params().order_by, "name");
        assert_eq!(page.params().order_direction, SortDirection::Asc);

        page.sort_by(FolderField::Name);
        assert_eq!(page.params().order_direction, SortDirection::Desc);

        let query = page.location().location().query().unwrap().to_string();
        assert!(query.contains("orderBy=name"));
        assert!(query.contains("orderDirection=desc"));
        assert_eq!(page.location().history_len(), 1);
    }

    #[test]
    fn default_sort_is_created_at_descending() {
        let page = page("");
        assert_eq!(
            page.sort(),
            SortConfig::new(FolderField::CreatedAt, SortDirection::Desc)
        );
    }

    #[tokio::test]
    async fn stale_responses_are_discarded() {
        let mut page = page("");
        page.set_search("a");
        let first = page.begin_fetch();
        page.set_search("ab");
        let second = page.begin_fetch();

        let (first, second) = (first.run().await, second.run().await);
        assert!(page.complete(second));
        assert!(!page.complete(first));
        assert_eq!(page.records()[0].name, "ab");
        assert!(!page.is_loading());
    }

    #[tokio::test]
    async fn errors_become_inline_state_and_retry_clears_them() {
        let mut page = page("");
        *page.source().fail.lock().unwrap() = true;
        let err = page.refresh().await.unwrap_err();
        assert!(err.retryable);
        assert!(page.error().is_some());

        *page.source().fail.lock().unwrap() = false;
        page.retry().await.unwrap();
        assert!(page.error().is_none());
        assert_eq!(page.records().len(), 1);
    }

    #[test]
    fn client_errors_can_be_retried_inline() {
        for error in [
            Error::Api(ApiError::http(404, "not found")),
            Error::Api(ApiError::http(403, "forbidden")),
            Error::Api(ApiError::http(503, "unavailable")),
        ] {
            let inline = PageError::from(&error);
            assert!(inline.retryable, "{error}");
            assert_eq!(inline.presentation, error.presentation());
        }
    }

    #[tokio::test]
    async fn table_actions_update_location() {
        let mut page = page("");
        page.refresh().await.unwrap();

        page.apply_table_action(TableAction::Paginate(PaginationChange::update(|p| p.go_to(3))));
        assert_eq!(page.params().page, 3);
        assert_eq!(page.pagination().unwrap().current_page, 3);

        page.apply_table_action(TableAction::Paginate(PaginationChange::update(|p| {
            p.with_page_size(50)
        })));
        assert_eq!(page.params().page, 1);
        assert_eq!(page.params().limit, 50);

        page.apply_table_action(TableAction::Sort(FolderField::Status));
        assert_eq!(page.params().order_by, "status");
    }
}
