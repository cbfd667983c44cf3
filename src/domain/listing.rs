//! Paginated listing payloads.
//!
//! `GET /ads` answers with a page of advertisements plus server-side
//! pagination metadata. The console never estimates totals itself; the
//! server's `totalItems`/`totalPages` are authoritative.

use super::advertisement::Advertisement;
use serde::{Deserialize, Serialize};

/// Server-provided pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub items_per_page: u32,
}

impl Pagination {
    /// Metadata for an empty result, used before the first response arrives.
    #[must_use]
    pub const fn empty(items_per_page: u32) -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            total_items: 0,
            items_per_page,
        }
    }
}

/// Body of `GET /ads`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvertisementsResponse {
    pub ads: Vec<Advertisement>,
    pub pagination: Pagination,
}

/// The result set currently on display.
///
/// Owned by the listing state for the lifetime of the latest completed
/// request and superseded as a whole by the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage {
    pub items: Vec<Advertisement>,
    pub pagination: Pagination,
}

impl ResultPage {
    #[must_use]
    pub const fn empty(items_per_page: u32) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::empty(items_per_page),
        }
    }

    /// `true` when the page holds no advertisements ("no results", not an error).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<AdvertisementsResponse> for ResultPage {
    fn from(response: AdvertisementsResponse) -> Self {
        Self {
            items: response.ads,
            pagination: response.pagination,
        }
    }
}
