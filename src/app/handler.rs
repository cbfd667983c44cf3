//! Event handling and state transition logic for the listing.
//!
//! This module implements the listing reducer: it applies an [`Event`] to a
//! [`ListingState`] and returns the [`Action`]s the runtime must execute. It
//! never performs I/O, which keeps every transition testable without a
//! runtime or a server.
//!
//! # Event Types
//!
//! - **Lifecycle**: `Mount`, `Unmount`
//! - **Intents**: `SetFilter`, `SetPage`, `SetItemsPerPage`, `ResetFilters`,
//!   `Refresh`, `SearchInput`
//! - **Timers**: `SearchDebounceElapsed`
//! - **Responses**: `FetchCompleted`, `FetchFailed`
//!
//! # Example
//!
//! ```rust
//! use marketmod::app::{handle_event, Action, Event, ListingState};
//! use std::time::Duration;
//!
//! let mut state = ListingState::new(10, Duration::from_millis(500));
//! let (render, actions) = handle_event(&mut state, &Event::Mount { query: String::new() })?;
//! assert!(render);
//! assert!(matches!(actions.last(), Some(Action::Fetch { epoch: 1, .. })));
//! # Ok::<(), marketmod::MarketmodError>(())
//! ```

use super::actions::Action;
use super::modes::Banner;
use super::query::{FilterPatch, ListingQuery};
use super::state::ListingState;
use crate::domain::{MarketmodError, Result, ResultPage};

/// Events triggered by user intents, timers or fetch completions.
///
/// The runtime feeds them to [`handle_event`] one at a time, in arrival order.
#[derive(Debug)]
pub enum Event {
    /// The listing view became active with the given URL query.
    Mount {
        /// Query string from the address bar, with or without `?`.
        query: String,
    },

    /// The listing view was left; outstanding work is cancelled silently.
    Unmount,

    /// Merges a partial filter change.
    SetFilter(FilterPatch),

    /// Jumps to a 1-based page.
    SetPage(u32),

    /// Changes the page size.
    SetItemsPerPage(u32),

    /// Restores default filters on page 1.
    ResetFilters,

    /// Re-requests the current query.
    Refresh,

    /// Search box contents changed; committed after the debounce delay.
    SearchInput(String),

    /// A search debounce timer elapsed.
    SearchDebounceElapsed {
        /// Ticket the timer was scheduled with.
        ticket: u64,
    },

    /// A fetch finished successfully.
    FetchCompleted {
        epoch: u64,
        page: ResultPage,
    },

    /// A fetch failed or was cancelled.
    FetchFailed {
        epoch: u64,
        error: MarketmodError,
    },
}

/// Processes an event, mutates listing state, and returns actions to execute.
///
/// # Parameters
///
/// * `state` - Mutable reference to the listing state
/// * `event` - Event to process
///
/// # Returns
///
/// `(render, actions)`: whether the visible state changed, and the side
/// effects to run in order. A query change always yields exactly one
/// [`Action::ReplaceUrl`] followed by one [`Action::Fetch`].
///
/// # Errors
///
/// Returns [`MarketmodError::Validation`] for a page or page size of 0; the
/// state is left untouched.
///
/// # Tracing
///
/// Each call creates a debug-level span with the event type.
pub fn handle_event(state: &mut ListingState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(event)).entered();

    if !state.mounted && !matches!(event, Event::Mount { .. }) {
        tracing::debug!("listing not mounted, ignoring event");
        return Ok((false, vec![]));
    }

    match event {
        Event::Mount { query } => {
            let parsed = ListingQuery::from_query_str(query, state.query.default_items_per_page());
            state.mounted = true;
            state.staged_search.clone_from(&parsed.filters.search);

            let canonical = parsed.to_query_string();
            state.query = parsed;

            let mut actions = Vec::new();
            if canonical != query.trim_start_matches('?') {
                tracing::debug!(canonical = %canonical, "normalizing initial url");
                actions.push(Action::ReplaceUrl { query: canonical });
            }
            actions.extend(state.issue_fetch());
            Ok((true, actions))
        }
        Event::Unmount => {
            state.mounted = false;
            state.in_flight = None;
            state.search_ticket += 1;
            tracing::debug!("listing unmounted, cancelling outstanding work");
            Ok((false, vec![Action::CancelFetch, Action::CancelSearchCommit]))
        }
        Event::SetFilter(patch) => {
            let mut actions = Vec::new();
            if let Some(search) = &patch.search {
                state.staged_search.clone_from(search);
                state.search_ticket += 1;
                actions.push(Action::CancelSearchCommit);
            }

            match state.query.with_filters(patch) {
                Some(next) => {
                    actions.extend(state.commit_query(next));
                    Ok((true, actions))
                }
                None => {
                    tracing::debug!("filters unchanged");
                    Ok((patch.search.is_some(), actions))
                }
            }
        }
        Event::SetPage(page) => {
            let next = state.query.with_page(*page)?;
            Ok(transition(state, next))
        }
        Event::SetItemsPerPage(items_per_page) => {
            let next = state.query.with_items_per_page(*items_per_page)?;
            Ok(transition(state, next))
        }
        Event::ResetFilters => {
            state.staged_search.clear();
            state.search_ticket += 1;
            let mut actions = vec![Action::CancelSearchCommit];
            if let Some(next) = state.query.reset() {
                actions.extend(state.commit_query(next));
            }
            Ok((true, actions))
        }
        Event::Refresh => Ok((true, state.issue_fetch())),
        Event::SearchInput(text) => {
            state.staged_search.clone_from(text);
            state.search_ticket += 1;
            Ok((
                true,
                vec![Action::ScheduleSearchCommit {
                    ticket: state.search_ticket,
                    delay: state.search_debounce,
                }],
            ))
        }
        Event::SearchDebounceElapsed { ticket } => {
            if *ticket != state.search_ticket {
                tracing::debug!(ticket, current = state.search_ticket, "ignoring stale search timer");
                return Ok((false, vec![]));
            }
            let patch = FilterPatch::default().search(state.staged_search.clone());
            match state.query.with_filters(&patch) {
                Some(next) => Ok((true, state.commit_query(next))),
                None => Ok((true, vec![])),
            }
        }
        Event::FetchCompleted { epoch, page } => {
            if state.in_flight != Some(*epoch) {
                tracing::debug!(epoch, latest = state.latest_epoch, "discarding stale response");
                return Ok((false, vec![]));
            }
            tracing::debug!(epoch, items = page.items.len(), "applying listing page");
            state.in_flight = None;
            state.banner = None;
            state.result = page.clone();
            Ok((true, vec![]))
        }
        Event::FetchFailed { epoch, error } => {
            if state.in_flight != Some(*epoch) {
                tracing::debug!(epoch, latest = state.latest_epoch, "discarding stale failure");
                return Ok((false, vec![]));
            }
            state.in_flight = None;
            if error.is_cancelled() {
                tracing::debug!(epoch, "fetch cancelled");
            } else {
                tracing::warn!(epoch, error = %error, "listing fetch failed");
                state.banner = Banner::from_error(error);
            }
            Ok((true, vec![]))
        }
    }
}

fn transition(state: &mut ListingState, next: Option<ListingQuery>) -> (bool, Vec<Action>) {
    next.map_or_else(
        || (false, vec![]),
        |next| (true, state.commit_query(next)),
    )
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Mount { .. } => "mount",
        Event::Unmount => "unmount",
        Event::SetFilter(_) => "set_filter",
        Event::SetPage(_) => "set_page",
        Event::SetItemsPerPage(_) => "set_items_per_page",
        Event::ResetFilters => "reset_filters",
        Event::Refresh => "refresh",
        Event::SearchInput(_) => "search_input",
        Event::SearchDebounceElapsed { .. } => "search_debounce_elapsed",
        Event::FetchCompleted { .. } => "fetch_completed",
        Event::FetchFailed { .. } => "fetch_failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::modes::BannerKind;
    use crate::domain::advertisement::fixtures::advertisement;
    use crate::domain::{AdvertisementStatus, Pagination};
    use std::time::Duration;

    fn mounted(query: &str) -> (ListingState, Vec<Action>) {
        let mut state = ListingState::new(10, Duration::from_millis(500));
        let (_, actions) = handle_event(&mut state, &Event::Mount { query: query.to_string() }).unwrap();
        (state, actions)
    }

    fn page_of(titles: &[&str]) -> ResultPage {
        ResultPage {
            items: titles
                .iter()
                .enumerate()
                .map(|(i, t)| advertisement(i as u64 + 1, t))
                .collect(),
            pagination: Pagination {
                current_page: 1,
                total_pages: 1,
                total_items: titles.len() as u64,
                items_per_page: 10,
            },
        }
    }

    fn fetch_paths(actions: &[Action]) -> Vec<String> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::Fetch { query, .. } => Some(query.request_path()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn mount_with_empty_query_fetches_defaults_without_touching_url() {
        let (state, actions) = mounted("");
        assert_eq!(
            fetch_paths(&actions),
            vec!["/ads?page=1&limit=10&sortBy=createdAt&sortOrder=desc"]
        );
        assert!(!actions.iter().any(|a| matches!(a, Action::ReplaceUrl { .. })));
        assert!(state.is_loading());
    }

    #[test]
    fn mount_normalizes_a_noisy_url() {
        let (state, actions) = mounted("?page=1&status=bogus&search=%20lamp%20&sortOrder=desc");
        assert_eq!(
            actions[0],
            Action::ReplaceUrl {
                query: "search=lamp".to_string()
            }
        );
        assert_eq!(state.staged_search, "lamp");
    }

    #[test]
    fn filter_change_replaces_url_once_and_fetches_once() {
        let (mut state, _) = mounted("page=4");
        let patch = FilterPatch::default().statuses([AdvertisementStatus::Pending]);
        let (render, actions) = handle_event(&mut state, &Event::SetFilter(patch)).unwrap();

        assert!(render);
        let replaces: Vec<_> = actions
            .iter()
            .filter(|a| matches!(a, Action::ReplaceUrl { .. }))
            .collect();
        assert_eq!(replaces, vec![&Action::ReplaceUrl { query: "status=pending".into() }]);
        assert_eq!(fetch_paths(&actions).len(), 1);
        assert_eq!(state.query.pagination.current_page, 1);
    }

    #[test]
    fn identical_filter_is_a_no_op() {
        let (mut state, _) = mounted("categoryId=3");
        let (render, actions) =
            handle_event(&mut state, &Event::SetFilter(FilterPatch::default().category(Some(3)))).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
    }

    #[test]
    fn page_zero_is_rejected_without_state_change() {
        let (mut state, _) = mounted("");
        let epoch = state.latest_epoch;
        let err = handle_event(&mut state, &Event::SetPage(0)).unwrap_err();
        assert!(matches!(err, MarketmodError::Validation(_)));
        assert_eq!(state.latest_epoch, epoch);
    }

    #[test]
    fn late_response_never_replaces_newer_result() {
        let (mut state, _) = mounted("");
        let first = state.latest_epoch;
        handle_event(&mut state, &Event::SetPage(2)).unwrap();
        let second = state.latest_epoch;

        let (render, _) = handle_event(
            &mut state,
            &Event::FetchCompleted { epoch: second, page: page_of(&["новое"]) },
        )
        .unwrap();
        assert!(render);

        let (render, _) = handle_event(
            &mut state,
            &Event::FetchCompleted { epoch: first, page: page_of(&["старое"]) },
        )
        .unwrap();
        assert!(!render);
        assert_eq!(state.result.items[0].title, "новое");
        assert!(!state.is_loading());
    }

    #[test]
    fn stale_failure_does_not_raise_a_banner() {
        let (mut state, _) = mounted("");
        let first = state.latest_epoch;
        handle_event(&mut state, &Event::Refresh).unwrap();
        handle_event(
            &mut state,
            &Event::FetchFailed { epoch: first, error: MarketmodError::Connection("down".into()) },
        )
        .unwrap();
        assert!(state.banner.is_none());
        assert!(state.is_loading());
    }

    #[test]
    fn failure_keeps_previous_result_and_sets_banner() {
        let (mut state, _) = mounted("");
        let epoch = state.latest_epoch;
        handle_event(&mut state, &Event::FetchCompleted { epoch, page: page_of(&["a", "b"]) }).unwrap();

        handle_event(&mut state, &Event::Refresh).unwrap();
        let epoch = state.latest_epoch;
        handle_event(
            &mut state,
            &Event::FetchFailed { epoch, error: MarketmodError::Connection("Не удалось подключиться к серверу".into()) },
        )
        .unwrap();

        assert_eq!(state.result.items.len(), 2);
        assert_eq!(state.banner.as_ref().map(|b| b.kind), Some(BannerKind::Connection));
    }

    #[test]
    fn cancellation_is_swallowed() {
        let (mut state, _) = mounted("");
        let epoch = state.latest_epoch;
        handle_event(&mut state, &Event::FetchFailed { epoch, error: MarketmodError::Cancelled }).unwrap();
        assert!(state.banner.is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn only_the_latest_search_timer_commits() {
        let (mut state, _) = mounted("");
        let mut tickets = Vec::new();
        for text in ["в", "ве", "вел"] {
            let (_, actions) = handle_event(&mut state, &Event::SearchInput(text.to_string())).unwrap();
            match actions.as_slice() {
                [Action::ScheduleSearchCommit { ticket, delay }] => {
                    assert_eq!(*delay, Duration::from_millis(500));
                    tickets.push(*ticket);
                }
                other => panic!("unexpected actions {other:?}"),
            }
        }

        let (_, stale) =
            handle_event(&mut state, &Event::SearchDebounceElapsed { ticket: tickets[0] }).unwrap();
        assert!(stale.is_empty());

        let (_, actions) =
            handle_event(&mut state, &Event::SearchDebounceElapsed { ticket: tickets[2] }).unwrap();
        let paths = fetch_paths(&actions);
        assert_eq!(paths.len(), 1);
        assert!(paths[0].contains("search=%D0%B2%D0%B5%D0%BB"));
        assert_eq!(state.query.filters.search, "вел");
    }

    #[test]
    fn reset_restores_defaults_and_keeps_page_size() {
        let (mut state, _) = mounted("search=x&limit=20&page=3&status=draft");
        let (_, actions) = handle_event(&mut state, &Event::ResetFilters).unwrap();
        assert!(actions.contains(&Action::ReplaceUrl { query: "limit=20".into() }));
        assert_eq!(state.staged_search, "");
        assert_eq!(state.query.pagination.items_per_page, 20);
    }

    #[test]
    fn unmount_cancels_and_ignores_later_events() {
        let (mut state, _) = mounted("");
        let epoch = state.latest_epoch;
        let (_, actions) = handle_event(&mut state, &Event::Unmount).unwrap();
        assert_eq!(actions, vec![Action::CancelFetch, Action::CancelSearchCommit]);

        let (render, actions) =
            handle_event(&mut state, &Event::FetchCompleted { epoch, page: page_of(&["x"]) }).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
        assert!(state.result.is_empty());
    }
}
