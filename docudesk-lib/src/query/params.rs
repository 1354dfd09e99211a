//! List parameters mirrored into the location query string.
//!
//! A list view's search, status filter, page, page size and sort are kept
//! in the query string so that a reload or a shared link reproduces it.
//! Writes merge into the existing parameters and replace the current
//! history entry instead of pushing a new one.

use url::Url;
use url::form_urlencoded;

use super::SortDirection;

const KEY_SEARCH: &str = "search";
const KEY_STATUS: &str = "status";
const KEY_PAGE: &str = "page";
const KEY_LIMIT: &str = "limit";
const KEY_ORDER_BY: &str = "orderBy";
const KEY_ORDER_DIRECTION: &str = "orderDirection";

/// Default page size.
pub const DEFAULT_LIMIT: u32 = 20;

/// Default sort column.
pub const DEFAULT_ORDER_BY: &str = "created_at";

/// Search, filter, pagination and sort state of a list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub search: String,
    pub status: Option<String>,
    pub page: u32,
    pub limit: u32,
    pub order_by: String,
    pub order_direction: SortDirection,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: None,
            page: 1,
            limit: DEFAULT_LIMIT,
            order_by: DEFAULT_ORDER_BY.to_string(),
            order_direction: SortDirection::Desc,
        }
    }
}

impl ListParams {
    /// Reads parameters from a query string (without the leading `?`).
    ///
    /// Missing or malformed values take their defaults.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match &*key {
                KEY_SEARCH => params.search = value.into_owned(),
                KEY_STATUS if !value.is_empty() => params.status = Some(value.into_owned()),
                KEY_PAGE => {
                    if let Some(page) = parse_positive(&value) {
                        params.page = page;
                    }
                }
                KEY_LIMIT => {
                    if let Some(limit) = parse_positive(&value) {
                        params.limit = limit;
                    }
                }
                KEY_ORDER_BY if !value.is_empty() => params.order_by = value.into_owned(),
                KEY_ORDER_DIRECTION => {
                    if let Some(direction) = SortDirection::parse(&value) {
                        params.order_direction = direction;
                    }
                }
                _ => {}
            }
        }
        params
    }

    /// Encodes the parameters as a query string. An empty search and an
    /// absent status are left out.
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.pairs() {
            if let Some(value) = value {
                serializer.append_pair(key, &value);
            }
        }
        serializer.finish()
    }

    /// Query parameters for the REST list endpoints.
    pub fn api_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(6);
        if !self.search.is_empty() {
            query.push(("search", self.search.clone()));
        }
        if let Some(status) = &self.status {
            query.push(("status", status.clone()));
        }
        query.push(("page", self.page.to_string()));
        query.push(("limit", self.limit.to_string()));
        query.push(("order_by", self.order_by.clone()));
        query.push(("order_direction", self.order_direction.as_str().to_string()));
        query
    }

    /// Applies a partial update.
    pub fn apply(&mut self, update: &ListParamsUpdate) {
        if let Some(search) = &update.search {
            self.search = search.clone();
        }
        if let Some(status) = &update.status {
            self.status = status.clone().filter(|s| !s.is_empty());
        }
        if let Some(page) = update.page {
            self.page = page.max(1);
        }
        if let Some(limit) = update.limit {
            self.limit = limit.max(1);
        }
        if let Some(order_by) = &update.order_by {
            self.order_by = order_by.clone();
        }
        if let Some(direction) = update.order_direction {
            self.order_direction = direction;
        }
    }

    /// Every managed key with its encoded value; `None` means "omit".
    fn pairs(&self) -> [(&'static str, Option<String>); 6] {
        [
            (KEY_SEARCH, Some(self.search.clone()).filter(|s| !s.is_empty())),
            (KEY_STATUS, self.status.clone()),
            (KEY_PAGE, Some(self.page.to_string())),
            (KEY_LIMIT, Some(self.limit.to_string())),
            (KEY_ORDER_BY, Some(self.order_by.clone())),
            (KEY_ORDER_DIRECTION, Some(self.order_direction.as_str().to_string())),
        ]
    }
}

fn parse_positive(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

/// A partial change to [`ListParams`]. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParamsUpdate {
    pub search: Option<String>,
    pub status: Option<Option<String>>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub order_by: Option<String>,
    pub order_direction: Option<SortDirection>,
}

impl ListParamsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sets (`Some`) or clears (`None`) the status filter.
    pub fn status(mut self, status: Option<String>) -> Self {
        self.status = Some(status);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn order(mut self, order_by: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = Some(order_by.into());
        self.order_direction = Some(direction);
        self
    }

    /// Returns `true` if nothing would change.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The current location of a list view plus its history depth.
///
/// Stands in for the browser location: parameter writes replace the
/// current entry, explicit navigation pushes a new one.
#[derive(Debug, Clone)]
pub struct LocationSync {
    location: Url,
    history_len: usize,
}

impl LocationSync {
    /// Starts at `location` with a single history entry.
    pub fn new(location: Url) -> Self {
        Self {
            location,
            history_len: 1,
        }
    }

    /// The current location.
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// Number of history entries.
    pub fn history_len(&self) -> usize {
        self.history_len
    }

    /// Reads the list parameters from the current location.
    pub fn params(&self) -> ListParams {
        ListParams::from_query(self.location.query().unwrap_or(""))
    }

    /// Merges `update` into the current query and replaces the history
    /// entry. Parameters the list does not manage are preserved.
    pub fn replace(&mut self, update: &ListParamsUpdate) -> ListParams {
        let mut params = self.params();
        params.apply(update);

        let mut pairs: Vec<(String, String)> = self
            .location
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        for (key, value) in params.pairs() {
            let first = pairs.iter().position(|(k, _)| k == key);
            pairs.retain(|(k, _)| k != key);
            if let Some(value) = value {
                let at = first.unwrap_or(pairs.len()).min(pairs.len());
                pairs.insert(at, (key.to_string(), value));
            }
        }

        if pairs.is_empty() {
            self.location.set_query(None);
        } else {
            self.location.query_pairs_mut().clear().extend_pairs(pairs);
        }
        params
    }

    /// Navigates to a new location, pushing a history entry.
    pub fn navigate(&mut self, location: Url) {
        self.location = location;
        self.history_len += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(query: &str) -> LocationSync {
        let mut url = Url::parse("https://console.example.com/folders/7").unwrap();
        if !query.is_empty() {
            url.set_query(Some(query));
        }
        LocationSync::new(url)
    }

    #[test]
    fn empty_query_yields_defaults() {
        let params = ListParams::from_query("");
        assert_eq!(params, ListParams::default());
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 20);
        assert_eq!(params.order_by, "created_at");
        assert_eq!(params.order_direction, SortDirection::Desc);
    }

    #[test]
    fn malformed_values_take_defaults() {
        let params = ListParams::from_query("page=abc&limit=0&orderDirection=up&orderBy=");
        assert_eq!(params, ListParams::default());
    }

    #[test]
    fn encode_then_decode_round_trips() {
        let params = ListParams {
            search: "acme & sons".to_string(),
            status: Some("archived".to_string()),
            page: 4,
            limit: 50,
            order_by: "name".to_string(),
            order_direction: SortDirection::Asc,
        };
        assert_eq!(ListParams::from_query(&params.to_query()), params);

        let defaults = ListParams::default();
        assert_eq!(ListParams::from_query(&defaults.to_query()), defaults);
    }

    #[test]
    fn api_query_uses_snake_case_and_skips_empty_filters() {
        let query = ListParams::default().api_query();
        let keys: Vec<_> = query.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["page", "limit", "order_by", "order_direction"]);
    }

    #[test]
    fn replace_merges_and_keeps_foreign_keys() {
        let mut sync = location("tab=documents&page=3&search=inv");
        let params = sync.replace(&ListParamsUpdate::new().page(4));
        assert_eq!(params.page, 4);
        assert_eq!(params.search, "inv");

        let query = sync.location().query().unwrap();
        assert!(query.starts_with("tab=documents"));
        assert!(query.contains("page=4"));
        assert!(!query.contains("page=3"));
        assert_eq!(sync.history_len(), 1);
    }

    #[test]
    fn replace_clears_removed_filters() {
        let mut sync = location("status=active&search=x");
        sync.replace(&ListParamsUpdate::new().status(None).search(""));
        let params = sync.params();
        assert_eq!(params.status, None);
        assert_eq!(params.search, "");
        let query = sync.location().query().unwrap_or("");
        assert!(!query.contains("status="));
        assert!(!query.contains("search="));
    }

    #[test]
    fn navigate_pushes_history() {
        let mut sync = location("");
        sync.replace(&ListParamsUpdate::new().search("a"));
        sync.replace(&ListParamsUpdate::new().search("ab"));
        assert_eq!(sync.history_len(), 1);
        sync.navigate(Url::parse("https://console.example.com/folders").unwrap());
        assert_eq!(sync.history_len(), 2);
    }
}
