//! Listing state management and view model computation.
//!
//! This module defines [`ListingState`], the single source of truth for the
//! advertisement listing, and [`ListingSnapshot`], the immutable copy the
//! runtime publishes to views after every change.
//!
//! # State Components
//!
//! - **Query**: committed filters and pagination, mirrored into the URL
//! - **Staged search**: text typed but not yet committed by the debounce timer
//! - **Epochs**: `latest_epoch` is stamped on every fetch; only a response
//!   echoing the in-flight epoch is applied
//! - **Result**: the last successfully loaded page, replaced atomically
//! - **Banner**: the last load failure, cleared by the next fetch
//!
//! # Example
//!
//! ```rust
//! use marketmod::app::ListingState;
//! use std::time::Duration;
//!
//! let state = ListingState::new(10, Duration::from_millis(500));
//! let snapshot = state.snapshot();
//! assert!(!snapshot.loading);
//! let viewmodel = snapshot.compute_viewmodel(100);
//! assert!(viewmodel.rows.is_empty());
//! ```

use super::actions::Action;
use super::modes::Banner;
use super::query::{FilterState, ListingQuery};
use crate::domain::advertisement::format_price;
use crate::domain::{Advertisement, Pagination, ResultPage};
use crate::ui::components::title_column_width;
use crate::ui::helpers::{truncate, width};
use crate::ui::viewmodel::{
    DisplayItem, EmptyState, FooterInfo, HeaderInfo, ListingViewModel, SearchBarInfo,
};
use fuzzy_matcher::skim::SkimMatcherV2;
use std::time::Duration;

/// Path of the listing page in the address bar.
pub const LISTING_PATH: &str = "/list";

/// Central listing state container.
///
/// Mutated only by [`handle_event`](crate::app::handle_event); every other
/// reader works from a [`ListingSnapshot`].
#[derive(Debug, Clone)]
pub struct ListingState {
    /// Committed query; what the URL shows and the last fetch requested.
    pub query: ListingQuery,

    /// Search text as typed, committed after `search_debounce` of quiet.
    pub staged_search: String,

    /// Ticket of the newest scheduled search commit.
    ///
    /// A timer that fires with an older ticket is ignored.
    pub search_ticket: u64,

    /// Quiet period before staged search text is committed.
    pub search_debounce: Duration,

    /// Epoch of the newest fetch ever issued.
    pub latest_epoch: u64,

    /// Epoch of the fetch whose response is still awaited.
    pub in_flight: Option<u64>,

    /// Last successfully loaded page.
    pub result: ResultPage,

    /// Last load failure, shown until the next fetch starts.
    pub banner: Option<Banner>,

    /// Whether the listing view is active.
    ///
    /// Events other than `Mount` are ignored while unmounted.
    pub mounted: bool,
}

impl ListingState {
    /// Creates an unmounted listing with the default query.
    ///
    /// # Parameters
    ///
    /// * `default_items_per_page` - Page size used when the URL names none
    /// * `search_debounce` - Quiet period before search text is committed
    #[must_use]
    pub fn new(default_items_per_page: u32, search_debounce: Duration) -> Self {
        let query = ListingQuery::new(default_items_per_page);
        Self {
            result: ResultPage::empty(query.pagination.items_per_page),
            query,
            staged_search: String::new(),
            search_ticket: 0,
            search_debounce,
            latest_epoch: 0,
            in_flight: None,
            banner: None,
            mounted: false,
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Stamps a new epoch and returns the actions that start its fetch.
    ///
    /// Any fetch still in flight is cancelled first. The banner is cleared;
    /// the previous result stays until the new one arrives.
    pub(crate) fn issue_fetch(&mut self) -> Vec<Action> {
        let mut actions = Vec::with_capacity(2);
        if self.in_flight.is_some() {
            actions.push(Action::CancelFetch);
        }
        self.latest_epoch += 1;
        self.in_flight = Some(self.latest_epoch);
        self.banner = None;

        tracing::debug!(epoch = self.latest_epoch, "issuing listing fetch");
        actions.push(Action::Fetch {
            epoch: self.latest_epoch,
            query: self.query.clone(),
        });
        actions
    }

    /// Installs a new committed query: one URL replacement and one fetch.
    pub(crate) fn commit_query(&mut self, query: ListingQuery) -> Vec<Action> {
        self.query = query;
        let mut actions = vec![Action::ReplaceUrl {
            query: self.query.to_query_string(),
        }];
        actions.extend(self.issue_fetch());
        actions
    }

    /// Immutable copy for views.
    #[must_use]
    pub fn snapshot(&self) -> ListingSnapshot {
        ListingSnapshot {
            query: self.query.clone(),
            staged_search: self.staged_search.clone(),
            items: self.result.items.clone(),
            pagination: self.result.pagination,
            loading: self.is_loading(),
            banner: self.banner.clone(),
        }
    }
}

/// What a view needs to draw the listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSnapshot {
    pub query: ListingQuery,
    pub staged_search: String,
    pub items: Vec<Advertisement>,
    /// Pagination reported by the server for `items`.
    pub pagination: Pagination,
    pub loading: bool,
    pub banner: Option<Banner>,
}

impl Default for ListingSnapshot {
    fn default() -> Self {
        ListingState::new(
            crate::app::query::DEFAULT_ITEMS_PER_PAGE,
            Duration::ZERO,
        )
        .snapshot()
    }
}

impl ListingSnapshot {
    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.query.filters
    }

    /// Message of the current load failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.banner.as_ref().map(|banner| banner.message.as_str())
    }

    /// Address-bar form of the committed query.
    #[must_use]
    pub fn location(&self) -> String {
        let query = self.query.to_query_string();
        if query.is_empty() {
            LISTING_PATH.to_string()
        } else {
            format!("{LISTING_PATH}?{query}")
        }
    }

    /// Computes a renderable view model for a terminal `cols` wide.
    ///
    /// Titles are truncated to the space left by the fixed columns and the
    /// committed search is highlighted with fuzzy match ranges.
    ///
    /// # Example
    ///
    /// ```rust
    /// use marketmod::app::ListingSnapshot;
    ///
    /// let viewmodel = ListingSnapshot::default().compute_viewmodel(80);
    /// assert_eq!(viewmodel.header.location, "/list");
    /// ```
    #[must_use]
    pub fn compute_viewmodel(&self, cols: usize) -> ListingViewModel {
        let title_width = title_column_width(cols);
        let search = &self.query.filters.search;
        let matcher = (!search.is_empty()).then(SkimMatcherV2::default);

        let rows: Vec<DisplayItem> = self
            .items
            .iter()
            .map(|ad| compute_display_item(ad, title_width, search, matcher.as_ref()))
            .collect();

        let empty_state = (rows.is_empty() && !self.loading && self.banner.is_none()).then(|| {
            EmptyState {
                message: "Объявления не найдены".to_string(),
                subtitle: if self.query.filters.is_default() {
                    "Список пуст".to_string()
                } else {
                    "Попробуйте изменить фильтры".to_string()
                },
            }
        });

        ListingViewModel {
            header: HeaderInfo {
                title: format!(" Модерация объявлений ({}) ", self.pagination.total_items),
                location: self.location(),
            },
            search_bar: SearchBarInfo {
                query: self.staged_search.clone(),
                pending: self.staged_search.trim() != search.as_str(),
            },
            filter_summary: summarize_filters(&self.query.filters),
            banner: self.banner.clone(),
            rows,
            empty_state,
            footer: FooterInfo {
                pagination: self.pagination_text(),
                keybindings: "search <текст> · status <...> · page <n> · show <id> · stats · quit"
                    .to_string(),
            },
            loading: self.loading,
        }
    }

    fn pagination_text(&self) -> String {
        let requested = self.query.pagination;
        format!(
            "Страница {} из {} · всего {} · по {} на странице",
            requested.current_page,
            self.pagination.total_pages.max(1),
            self.pagination.total_items,
            requested.items_per_page,
        )
    }
}

fn compute_display_item(
    ad: &Advertisement,
    title_width: usize,
    search: &str,
    matcher: Option<&SkimMatcherV2>,
) -> DisplayItem {
    let title = truncate(&ad.title, title_width);
    // A shortened title keeps `title_width - 3` characters before the dots.
    let visible = if width(&ad.title) > title_width {
        title_width.saturating_sub(3)
    } else {
        usize::MAX
    };

    DisplayItem {
        id: ad.id,
        title,
        price: format_price(ad.price),
        category: ad.category.clone(),
        status: ad.status,
        created: ad.created_at.format("%d.%m.%Y").to_string(),
        is_urgent: ad.is_urgent(),
        highlight_ranges: matcher.map_or_else(Vec::new, |m| {
            clip_ranges(compute_highlight_ranges(&ad.title, search, m), visible)
        }),
    }
}

/// Coalesces fuzzy match character indices into `(start, end)` ranges.
fn compute_highlight_ranges(text: &str, pattern: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
    use fuzzy_matcher::FuzzyMatcher;

    let Some((_score, indices)) = matcher.fuzzy_indices(text, pattern) else {
        return vec![];
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}

/// Drops ranges starting at or past `visible` and shortens the rest.
fn clip_ranges(ranges: Vec<(usize, usize)>, visible: usize) -> Vec<(usize, usize)> {
    ranges
        .into_iter()
        .filter(|&(start, _)| start < visible)
        .map(|(start, end)| (start, end.min(visible)))
        .collect()
}

fn summarize_filters(filters: &FilterState) -> String {
    let mut parts = Vec::new();

    if !filters.status.is_empty() {
        let labels: Vec<&str> = filters.status.iter().map(|s| s.label()).collect();
        parts.push(format!("Статус: {}", labels.join(", ")));
    }
    if let Some(id) = filters.category_id {
        parts.push(format!("Категория: {id}"));
    }
    match (filters.min_price, filters.max_price) {
        (Some(min), Some(max)) => parts.push(format!("Цена: от {min} до {max}")),
        (Some(min), None) => parts.push(format!("Цена: от {min}")),
        (None, Some(max)) => parts.push(format!("Цена: до {max}")),
        (None, None) => {}
    }
    parts.push(format!(
        "Сортировка: {}, {}",
        filters.sort_by.label(),
        filters.sort_order.label().to_lowercase()
    ));

    parts.join(" · ")
}
