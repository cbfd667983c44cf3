//! Actions representing side effects to be executed by the listing runtime.
//!
//! The event handler never touches the network, timers or history directly.
//! It returns a `Vec<Action>` after each event and the runtime
//! ([`ListingController`](crate::app::controller::ListingController)) executes
//! them in order.
//!
//! # Example
//!
//! ```rust
//! use marketmod::app::{Action, ListingQuery};
//!
//! let actions = vec![
//!     Action::ReplaceUrl { query: String::new() },
//!     Action::Fetch { epoch: 1, query: ListingQuery::default() },
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use super::query::ListingQuery;
use std::time::Duration;

/// Commands representing side effects to be executed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Requests `GET /ads` for `query`, stamped with `epoch`.
    ///
    /// Starting a fetch supersedes any fetch still in flight.
    Fetch {
        /// Epoch the response must echo back to be applied.
        epoch: u64,
        /// Query to request.
        query: ListingQuery,
    },

    /// Cancels the in-flight fetch, if any.
    CancelFetch,

    /// Replaces the current history entry with `query` (no leading `?`).
    ReplaceUrl {
        /// Canonical query string.
        query: String,
    },

    /// (Re)starts the search debounce timer.
    ///
    /// When it elapses the runtime feeds
    /// [`Event::SearchDebounceElapsed`](crate::app::Event::SearchDebounceElapsed)
    /// with the same ticket.
    ScheduleSearchCommit {
        ticket: u64,
        delay: Duration,
    },

    /// Stops the search debounce timer without committing.
    CancelSearchCommit,
}
