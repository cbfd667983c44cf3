//! Listing query: filters plus pagination, and its URL form.
//!
//! A [`ListingQuery`] is an immutable value. Every user intent produces a new
//! query through one of the `with_*` transitions, which return `None` when the
//! intent would not change anything. Two serializations exist:
//!
//! - [`ListingQuery::to_query_string`] for the address bar, omitting every
//!   field at its default;
//! - [`ListingQuery::request_path`] for `GET /ads`, in a fixed key order with
//!   `sortBy`/`sortOrder` always present.
//!
//! Parsing with [`ListingQuery::from_query_str`] never fails: unknown keys and
//! malformed values are dropped and defaults fill the gaps.

use crate::domain::{AdvertisementStatus, MarketmodError, Result};
use crate::infrastructure::query_string;
use std::collections::BTreeSet;

/// Page size used when neither the URL nor the configuration names one.
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 10;

/// Page sizes offered in the listing footer.
pub const ITEMS_PER_PAGE_OPTIONS: [u32; 3] = [10, 20, 50];

/// Field the listing is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    CreatedAt,
    Price,
    Priority,
}

impl SortBy {
    pub const ALL: [Self; 3] = [Self::CreatedAt, Self::Price, Self::Priority];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::Price => "price",
            Self::Priority => "priority",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreatedAt => "По дате создания",
            Self::Price => "По цене",
            Self::Priority => "По приоритету",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Asc => "По возрастанию",
            Self::Desc => "По убыванию",
        }
    }
}

/// User-controlled listing filters.
///
/// `min_price` and `max_price` are independent: a minimum above the maximum is
/// kept and sent to the server as-is.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterState {
    /// Trimmed full-text search; empty means no search.
    pub search: String,
    /// Selected statuses; empty means all.
    pub status: BTreeSet<AdvertisementStatus>,
    pub category_id: Option<u32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl FilterState {
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Returns these filters with `patch` merged in.
    ///
    /// Search text is trimmed and prices that are negative or not finite are
    /// dropped, so the result is always a valid filter set.
    #[must_use]
    pub fn apply(&self, patch: &FilterPatch) -> Self {
        let mut next = self.clone();
        if let Some(search) = &patch.search {
            next.search = search.trim().to_string();
        }
        if let Some(status) = &patch.status {
            next.status.clone_from(status);
        }
        if let Some(category_id) = patch.category_id {
            next.category_id = category_id;
        }
        if let Some(min_price) = patch.min_price {
            next.min_price = min_price.and_then(normalize_price);
        }
        if let Some(max_price) = patch.max_price {
            next.max_price = max_price.and_then(normalize_price);
        }
        if let Some(sort_by) = patch.sort_by {
            next.sort_by = sort_by;
        }
        if let Some(sort_order) = patch.sort_order {
            next.sort_order = sort_order;
        }
        next
    }
}

/// Partial filter change; `None` fields are left untouched.
///
/// Optional filters use a nested `Option` so a patch can clear them:
/// `Some(None)` removes the filter.
///
/// # Example
///
/// ```rust
/// use marketmod::app::query::{FilterPatch, FilterState};
///
/// let filters = FilterState::default().apply(&FilterPatch::default().min_price(Some(100.0)));
/// assert_eq!(filters.min_price, Some(100.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterPatch {
    pub search: Option<String>,
    pub status: Option<BTreeSet<AdvertisementStatus>>,
    pub category_id: Option<Option<u32>>,
    pub min_price: Option<Option<f64>>,
    pub max_price: Option<Option<f64>>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
}

impl FilterPatch {
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    #[must_use]
    pub fn statuses(mut self, statuses: impl IntoIterator<Item = AdvertisementStatus>) -> Self {
        self.status = Some(statuses.into_iter().collect());
        self
    }

    #[must_use]
    pub fn category(mut self, category_id: Option<u32>) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn min_price(mut self, price: Option<f64>) -> Self {
        self.min_price = Some(price);
        self
    }

    #[must_use]
    pub fn max_price(mut self, price: Option<f64>) -> Self {
        self.max_price = Some(price);
        self
    }

    #[must_use]
    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    #[must_use]
    pub fn sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = Some(sort_order);
        self
    }
}

/// Current page and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    /// 1-based page number.
    pub current_page: u32,
    pub items_per_page: u32,
}

/// Complete listing query: what the URL shows and what the server is asked.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub filters: FilterState,
    pub pagination: PaginationState,
    default_items_per_page: u32,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl ListingQuery {
    /// Creates the default query with the given default page size.
    ///
    /// A zero page size falls back to [`DEFAULT_ITEMS_PER_PAGE`].
    #[must_use]
    pub fn new(default_items_per_page: u32) -> Self {
        let default_items_per_page = if default_items_per_page == 0 {
            DEFAULT_ITEMS_PER_PAGE
        } else {
            default_items_per_page
        };
        Self {
            filters: FilterState::default(),
            pagination: PaginationState {
                current_page: 1,
                items_per_page: default_items_per_page,
            },
            default_items_per_page,
        }
    }

    /// Page size this query omits from the URL.
    #[must_use]
    pub const fn default_items_per_page(&self) -> u32 {
        self.default_items_per_page
    }

    /// Parses a URL query string, with or without the leading `?`.
    ///
    /// Never fails. Recognized keys: `search`, `status` (repeatable),
    /// `categoryId`, `minPrice`, `maxPrice`, `sortBy`, `sortOrder`, `page`,
    /// `limit`. For keys other than `status` the last occurrence wins.
    ///
    /// # Example
    ///
    /// ```rust
    /// use marketmod::app::query::ListingQuery;
    ///
    /// let query = ListingQuery::from_query_str("?page=3&status=pending&minPrice=-5&bogus=1", 10);
    /// assert_eq!(query.pagination.current_page, 3);
    /// assert_eq!(query.filters.status.len(), 1);
    /// assert_eq!(query.filters.min_price, None);
    /// ```
    #[must_use]
    pub fn from_query_str(query: &str, default_items_per_page: u32) -> Self {
        let mut parsed = Self::new(default_items_per_page);
        let filters = &mut parsed.filters;

        for (key, value) in query_string::parse(query) {
            match key.as_str() {
                "search" => filters.search = value.trim().to_string(),
                "status" => {
                    if let Some(status) = AdvertisementStatus::parse(&value) {
                        filters.status.insert(status);
                    } else {
                        tracing::debug!(value = %value, "ignoring unknown status");
                    }
                }
                "categoryId" => {
                    if let Ok(id) = value.parse() {
                        filters.category_id = Some(id);
                    }
                }
                "minPrice" => {
                    if let Some(price) = parse_price(&value) {
                        filters.min_price = Some(price);
                    }
                }
                "maxPrice" => {
                    if let Some(price) = parse_price(&value) {
                        filters.max_price = Some(price);
                    }
                }
                "sortBy" => {
                    if let Some(sort_by) = SortBy::parse(&value) {
                        filters.sort_by = sort_by;
                    }
                }
                "sortOrder" => {
                    if let Some(sort_order) = SortOrder::parse(&value) {
                        filters.sort_order = sort_order;
                    }
                }
                "page" => {
                    if let Some(page) = parse_positive(&value) {
                        parsed.pagination.current_page = page;
                    }
                }
                "limit" => {
                    if let Some(limit) = parse_positive(&value) {
                        parsed.pagination.items_per_page = limit;
                    }
                }
                _ => tracing::debug!(key = %key, "ignoring unknown query key"),
            }
        }

        parsed
    }

    /// Canonical URL query (no leading `?`); fields at their default are omitted.
    ///
    /// The default query serializes to an empty string.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let filters = &self.filters;
        let mut pairs: Vec<(&str, String)> = Vec::new();

        if !filters.search.is_empty() {
            pairs.push(("search", filters.search.clone()));
        }
        self.push_shared_filters(&mut pairs);
        if filters.sort_by != SortBy::default() {
            pairs.push(("sortBy", filters.sort_by.as_str().to_string()));
        }
        if filters.sort_order != SortOrder::default() {
            pairs.push(("sortOrder", filters.sort_order.as_str().to_string()));
        }
        if self.pagination.current_page != 1 {
            pairs.push(("page", self.pagination.current_page.to_string()));
        }
        if self.pagination.items_per_page != self.default_items_per_page {
            pairs.push(("limit", self.pagination.items_per_page.to_string()));
        }

        query_string::encode(pairs)
    }

    /// Query pairs for `GET /ads`, in the order the server receives them.
    #[must_use]
    pub fn request_pairs(&self) -> Vec<(&'static str, String)> {
        let filters = &self.filters;
        let mut pairs = vec![
            ("page", self.pagination.current_page.to_string()),
            ("limit", self.pagination.items_per_page.to_string()),
        ];
        if !filters.search.is_empty() {
            pairs.push(("search", filters.search.clone()));
        }
        self.push_shared_filters(&mut pairs);
        pairs.push(("sortBy", filters.sort_by.as_str().to_string()));
        pairs.push(("sortOrder", filters.sort_order.as_str().to_string()));
        pairs
    }

    /// Path and query of the listing request, e.g.
    /// `/ads?page=1&limit=10&sortBy=createdAt&sortOrder=desc`.
    #[must_use]
    pub fn request_path(&self) -> String {
        format!("/ads?{}", query_string::encode(self.request_pairs()))
    }

    fn push_shared_filters(&self, pairs: &mut Vec<(&'static str, String)>) {
        let filters = &self.filters;
        pairs.extend(
            filters
                .status
                .iter()
                .map(|status| ("status", status.as_str().to_string())),
        );
        if let Some(id) = filters.category_id {
            pairs.push(("categoryId", id.to_string()));
        }
        if let Some(price) = filters.min_price {
            pairs.push(("minPrice", price.to_string()));
        }
        if let Some(price) = filters.max_price {
            pairs.push(("maxPrice", price.to_string()));
        }
    }

    /// Merges a filter patch; any effective change returns to page 1.
    ///
    /// Returns `None` when the merged filters equal the current ones.
    #[must_use]
    pub fn with_filters(&self, patch: &FilterPatch) -> Option<Self> {
        let filters = self.filters.apply(patch);
        if filters == self.filters {
            return None;
        }
        Some(Self {
            filters,
            pagination: PaginationState {
                current_page: 1,
                ..self.pagination
            },
            default_items_per_page: self.default_items_per_page,
        })
    }

    /// Moves to `page`, which may lie beyond the last known page.
    ///
    /// # Errors
    ///
    /// Returns [`MarketmodError::Validation`] for page 0.
    pub fn with_page(&self, page: u32) -> Result<Option<Self>> {
        if page == 0 {
            return Err(MarketmodError::Validation(
                "Номер страницы должен быть больше 0".to_string(),
            ));
        }
        if page == self.pagination.current_page {
            return Ok(None);
        }
        let mut next = self.clone();
        next.pagination.current_page = page;
        Ok(Some(next))
    }

    /// Changes the page size and returns to page 1.
    ///
    /// # Errors
    ///
    /// Returns [`MarketmodError::Validation`] for a page size of 0.
    pub fn with_items_per_page(&self, items_per_page: u32) -> Result<Option<Self>> {
        if items_per_page == 0 {
            return Err(MarketmodError::Validation(
                "Размер страницы должен быть больше 0".to_string(),
            ));
        }
        if items_per_page == self.pagination.items_per_page {
            return Ok(None);
        }
        let mut next = self.clone();
        next.pagination = PaginationState {
            current_page: 1,
            items_per_page,
        };
        Ok(Some(next))
    }

    /// Default filters on page 1, keeping the page size.
    #[must_use]
    pub fn reset(&self) -> Option<Self> {
        if self.filters.is_default() && self.pagination.current_page == 1 {
            return None;
        }
        let mut next = self.clone();
        next.filters = FilterState::default();
        next.pagination.current_page = 1;
        Some(next)
    }
}

fn normalize_price(price: f64) -> Option<f64> {
    // `+ 0.0` folds -0.0 into 0.0
    (price.is_finite() && price >= 0.0).then_some(price + 0.0)
}

fn parse_price(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().and_then(normalize_price)
}

fn parse_positive(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use AdvertisementStatus::{Approved, Draft, Pending};

    fn query_with(patch: &FilterPatch) -> ListingQuery {
        ListingQuery::default()
            .with_filters(patch)
            .unwrap_or_default()
    }

    #[test]
    fn empty_query_yields_defaults() {
        let query = ListingQuery::from_query_str("", 10);
        assert_eq!(query, ListingQuery::default());
        assert_eq!(query.to_query_string(), "");
        assert_eq!(
            query.request_path(),
            "/ads?page=1&limit=10&sortBy=createdAt&sortOrder=desc"
        );
    }

    #[test]
    fn malformed_values_are_dropped_individually() {
        let query = ListingQuery::from_query_str(
            "?status=pending&status=archived&status=draft&categoryId=x&minPrice=NaN\
             &maxPrice=250.5&sortBy=title&sortOrder=asc&page=0&limit=-3",
            10,
        );
        assert_eq!(query.filters.status, BTreeSet::from([Pending, Draft]));
        assert_eq!(query.filters.category_id, None);
        assert_eq!(query.filters.min_price, None);
        assert_eq!(query.filters.max_price, Some(250.5));
        assert_eq!(query.filters.sort_by, SortBy::CreatedAt);
        assert_eq!(query.filters.sort_order, SortOrder::Asc);
        assert_eq!(query.pagination.current_page, 1);
        assert_eq!(query.pagination.items_per_page, 10);
    }

    #[test]
    fn url_round_trip_is_stable() {
        let samples = [
            query_with(&FilterPatch::default().search("  велосипед  ")),
            query_with(&FilterPatch::default().statuses([Draft, Pending, Approved])),
            query_with(
                &FilterPatch::default()
                    .category(Some(4))
                    .min_price(Some(0.0))
                    .max_price(Some(1999.99))
                    .sort_by(SortBy::Priority)
                    .sort_order(SortOrder::Asc),
            ),
            query_with(&FilterPatch::default().search("c++ & rust=fast"))
                .with_page(7)
                .ok()
                .flatten()
                .unwrap_or_default(),
            ListingQuery::default()
                .with_items_per_page(50)
                .ok()
                .flatten()
                .unwrap_or_default(),
        ];

        for query in samples {
            let url = query.to_query_string();
            let reparsed = ListingQuery::from_query_str(&url, DEFAULT_ITEMS_PER_PAGE);
            assert_eq!(reparsed, query, "url: {url}");
            assert_eq!(reparsed.to_query_string(), url);
        }
    }

    #[test]
    fn url_uses_canonical_key_order_and_omits_defaults() {
        let query = query_with(
            &FilterPatch::default()
                .search("lamp")
                .statuses([Draft, Pending])
                .max_price(Some(50.0))
                .sort_by(SortBy::Price),
        );
        assert_eq!(
            query.to_query_string(),
            "search=lamp&status=pending&status=draft&maxPrice=50&sortBy=price"
        );
    }

    #[test]
    fn request_path_orders_keys_and_always_sends_sort() {
        let query = query_with(
            &FilterPatch::default()
                .search("red bike")
                .statuses([Pending])
                .category(Some(2))
                .min_price(Some(100.0))
                .max_price(Some(50.0)),
        );
        assert_eq!(
            query.request_path(),
            "/ads?page=1&limit=10&search=red+bike&status=pending&categoryId=2\
             &minPrice=100&maxPrice=50&sortBy=createdAt&sortOrder=desc"
        );
    }

    #[test]
    fn filter_change_resets_page() {
        let on_page_three = ListingQuery::default().with_page(3).ok().flatten();
        let Some(on_page_three) = on_page_three else {
            panic!("page change expected");
        };

        let patches = [
            FilterPatch::default().search("x"),
            FilterPatch::default().statuses([Approved]),
            FilterPatch::default().category(Some(1)),
            FilterPatch::default().min_price(Some(1.0)),
            FilterPatch::default().max_price(Some(1.0)),
            FilterPatch::default().sort_by(SortBy::Price),
            FilterPatch::default().sort_order(SortOrder::Asc),
        ];
        for patch in patches {
            let next = on_page_three.with_filters(&patch);
            assert_eq!(next.map(|q| q.pagination.current_page), Some(1), "{patch:?}");
        }

        let resized = on_page_three.with_items_per_page(20).ok().flatten();
        assert_eq!(resized.map(|q| q.pagination.current_page), Some(1));
    }

    #[test]
    fn identical_patch_is_a_no_op() {
        let query = query_with(&FilterPatch::default().search("lamp"));
        assert!(query.with_filters(&FilterPatch::default().search(" lamp ")).is_none());
        assert!(query.with_filters(&FilterPatch::default()).is_none());
        assert!(matches!(query.with_page(1), Ok(None)));
    }

    #[test]
    fn page_zero_is_rejected() {
        let err = ListingQuery::default().with_page(0).unwrap_err();
        assert!(matches!(err, MarketmodError::Validation(_)));
        assert!(ListingQuery::default().with_items_per_page(0).is_err());
    }

    #[test]
    fn pages_beyond_known_total_are_allowed() {
        let next = ListingQuery::default().with_page(5).unwrap();
        assert_eq!(next.map(|q| q.pagination.current_page), Some(5));
    }

    #[test]
    fn inverted_price_range_is_kept() {
        let query = query_with(&FilterPatch::default().min_price(Some(100.0)));
        let query = query
            .with_filters(&FilterPatch::default().max_price(Some(50.0)))
            .unwrap();
        assert_eq!(query.filters.min_price, Some(100.0));
        assert_eq!(query.filters.max_price, Some(50.0));
    }

    #[test]
    fn negative_price_patch_clears_the_filter() {
        let query = query_with(&FilterPatch::default().min_price(Some(10.0)));
        let cleared = query
            .with_filters(&FilterPatch::default().min_price(Some(-1.0)))
            .unwrap();
        assert_eq!(cleared.filters.min_price, None);
    }

    #[test]
    fn reset_keeps_page_size() {
        let query = ListingQuery::default()
            .with_items_per_page(20)
            .unwrap()
            .unwrap()
            .with_filters(&FilterPatch::default().search("x"))
            .unwrap();
        let reset = query.reset().unwrap();
        assert!(reset.filters.is_default());
        assert_eq!(reset.pagination.items_per_page, 20);
        assert!(reset.reset().is_none());
    }

    #[test]
    fn configured_default_limit_is_omitted_from_url() {
        let query = ListingQuery::from_query_str("limit=20", 20);
        assert_eq!(query.to_query_string(), "");
        let query = ListingQuery::from_query_str("limit=10", 20);
        assert_eq!(query.to_query_string(), "limit=10");
    }
}
