//! View model types representing renderable console state.
//!
//! View models are computed from application state and consumed by the
//! renderer. They contain no business logic, only display-ready data: prices
//! are already formatted, titles truncated, and bar ratios scaled to 0..=100.
//!
//! # Architecture
//!
//! ```text
//! ListingSnapshot::compute_viewmodel ──▶ ListingViewModel ─┐
//! AdvertisementDetail::compute_viewmodel ──▶ DetailViewModel ├──▶ renderer
//! StatsDashboard::compute_viewmodel ──▶ StatsViewModel ─────┘
//! ```

use crate::app::modes::Banner;
use crate::domain::AdvertisementStatus;

/// Complete view model of the listing screen.
#[derive(Debug, Clone)]
pub struct ListingViewModel {
    pub header: HeaderInfo,
    pub search_bar: SearchBarInfo,

    /// Human-readable summary of the active filters and sort.
    pub filter_summary: String,

    /// Last load failure; rows keep the previous page underneath it.
    pub banner: Option<Banner>,

    /// One row per advertisement of the current page.
    pub rows: Vec<DisplayItem>,

    /// Present when a successful load returned no rows.
    pub empty_state: Option<EmptyState>,

    pub footer: FooterInfo,

    /// A fetch is in flight.
    pub loading: bool,
}

/// Display information for a single advertisement row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub id: u64,

    /// Title, truncated by characters to fit the terminal.
    pub title: String,

    /// Price formatted with thousands separators and the ruble sign.
    pub price: String,

    pub category: String,
    pub status: AdvertisementStatus,

    /// Creation date as `dd.mm.yyyy`.
    pub created: String,

    pub is_urgent: bool,

    /// Character ranges of the title matching the committed search.
    ///
    /// Each tuple is `(start, end)` in character indices, end exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,

    /// Address-bar location, e.g. `/list?page=2`.
    pub location: String,
}

/// Search input display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    /// Text as typed.
    pub query: String,

    /// Typed text differs from the committed search (debounce pending).
    pub pending: bool,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Page position and totals.
    pub pagination: String,

    /// Command help text.
    pub keybindings: String,
}

/// Empty result message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

/// View model of the advertisement detail screen.
#[derive(Debug, Clone)]
pub struct DetailViewModel {
    pub id: u64,
    pub title: String,

    /// Remaining fields are `None` (or empty) until the advertisement loads.
    pub status: Option<AdvertisementStatus>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub priority: Option<&'static str>,
    pub created: Option<String>,
    pub description: String,
    pub characteristics: Vec<(String, String)>,
    pub images: Vec<String>,
    pub seller: Option<String>,
    pub history: Vec<HistoryLine>,

    pub banner: Option<Banner>,
    pub loading: bool,

    /// A moderation decision is being submitted.
    pub processing: bool,

    pub previous_id: u64,
    pub next_id: u64,
}

/// One moderation history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLine {
    pub when: String,
    pub moderator: String,
    pub action: &'static str,
    pub reason: Option<String>,
    pub comment: String,
}

/// View model of the statistics screen.
#[derive(Debug, Clone)]
pub struct StatsViewModel {
    /// Label of the selected period.
    pub period: String,
    pub cards: Vec<SummaryCard>,
    pub activity: Vec<ActivityBar>,
    pub decisions: Vec<DecisionSlice>,
    pub categories: Vec<CategoryBar>,

    /// Last load failure; the previous payload stays visible.
    pub banner: Option<Banner>,
    pub loading: bool,
}

/// A labelled metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCard {
    pub label: &'static str,
    pub value: String,
}

impl SummaryCard {
    #[must_use]
    pub const fn new(label: &'static str, value: String) -> Self {
        Self { label, value }
    }
}

/// One day of moderation activity.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityBar {
    /// Day as `dd.mm`.
    pub label: String,
    pub approved: u64,
    pub rejected: u64,
    pub request_changes: u64,
    pub total: u64,

    /// Share of the busiest day, 0..=100.
    pub ratio: f64,
}

/// One share of the decisions distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionSlice {
    pub label: &'static str,

    /// Share formatted with one decimal, e.g. `72.3%`.
    pub share: String,

    /// Share of the largest slice, 0..=100.
    pub ratio: f64,
}

/// Reviewed advertisements in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBar {
    pub name: String,
    pub count: u64,

    /// Share of the largest category, 0..=100.
    pub ratio: f64,
}
