//! Async runtime for the listing state machine.
//!
//! [`ListingController`] owns a [`ListingState`] inside a single tokio task.
//! Views send intents through the controller's methods and observe the state
//! through a `watch` channel of [`ListingSnapshot`]s; nothing else ever writes
//! the state.
//!
//! ```text
//! intent ──mpsc──▶ actor ──handle_event──▶ actions ──▶ fetch task / timer / history
//!                    ▲                                       │
//!                    └──────────── completion events ◀───────┘
//! ```
//!
//! Each fetch runs in its own task with a [`CancellationToken`]; a newer fetch
//! or an unmount cancels it. The search debounce is one sleeping task that is
//! aborted whenever a newer keystroke reschedules it.

use super::actions::Action;
use super::handler::{handle_event, Event};
use super::query::FilterPatch;
use super::state::{ListingSnapshot, ListingState};
use crate::api::{ApiClient, Transport};
use crate::domain::{MarketmodError, Result, ResultPage};
use crate::infrastructure::UrlSink;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to a running listing actor.
///
/// Dropping the handle without calling [`ListingController::unmount`] also
/// stops the actor once its queue drains, but outstanding work is only
/// cancelled promptly through `unmount`.
pub struct ListingController {
    events: mpsc::UnboundedSender<Event>,
    snapshots: watch::Receiver<ListingSnapshot>,
    task: JoinHandle<()>,
}

impl ListingController {
    /// Spawns the actor and mounts the listing with `url_query`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Parameters
    ///
    /// * `client` - API client used for `GET /ads`
    /// * `history` - Receives every canonical URL query
    /// * `state` - Initial (unmounted) state carrying configuration
    /// * `url_query` - Query string of the address bar at mount time
    pub fn spawn<T>(
        client: Arc<ApiClient<T>>,
        history: Arc<dyn UrlSink>,
        state: ListingState,
        url_query: &str,
    ) -> Self
    where
        T: Transport + 'static,
    {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot());

        let runtime = Runtime {
            state,
            client,
            history,
            events: events_tx.downgrade(),
            snapshots: snapshot_tx,
            fetch_cancel: None,
            debounce: None,
        };
        let task = tokio::spawn(runtime.run(events_rx));

        let controller = Self {
            events: events_tx,
            snapshots: snapshot_rx,
            task,
        };
        let mount = Event::Mount {
            query: url_query.to_string(),
        };
        if controller.events.send(mount).is_err() {
            tracing::debug!("listing actor stopped before mount");
        }
        controller
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ListingSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified on every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListingSnapshot> {
        self.snapshots.clone()
    }

    /// Merges a partial filter change.
    ///
    /// # Errors
    ///
    /// Returns [`MarketmodError::Worker`] if the actor has stopped.
    pub fn set_filter(&self, patch: FilterPatch) -> Result<()> {
        self.send(Event::SetFilter(patch))
    }

    /// Jumps to a 1-based page.
    ///
    /// # Errors
    ///
    /// Returns [`MarketmodError::Validation`] for page 0, or
    /// [`MarketmodError::Worker`] if the actor has stopped.
    pub fn set_page(&self, page: u32) -> Result<()> {
        if page == 0 {
            return Err(MarketmodError::Validation(
                "Номер страницы должен быть больше 0".to_string(),
            ));
        }
        self.send(Event::SetPage(page))
    }

    /// Changes the page size.
    ///
    /// # Errors
    ///
    /// Returns [`MarketmodError::Validation`] for 0, or
    /// [`MarketmodError::Worker`] if the actor has stopped.
    pub fn set_items_per_page(&self, items_per_page: u32) -> Result<()> {
        if items_per_page == 0 {
            return Err(MarketmodError::Validation(
                "Размер страницы должен быть больше 0".to_string(),
            ));
        }
        self.send(Event::SetItemsPerPage(items_per_page))
    }

    /// Stages search text; it is committed after the debounce delay.
    ///
    /// # Errors
    ///
    /// Returns [`MarketmodError::Worker`] if the actor has stopped.
    pub fn search_input(&self, text: impl Into<String>) -> Result<()> {
        self.send(Event::SearchInput(text.into()))
    }

    /// Restores default filters on page 1.
    ///
    /// # Errors
    ///
    /// Returns [`MarketmodError::Worker`] if the actor has stopped.
    pub fn reset_filters(&self) -> Result<()> {
        self.send(Event::ResetFilters)
    }

    /// Re-requests the current query.
    ///
    /// # Errors
    ///
    /// Returns [`MarketmodError::Worker`] if the actor has stopped.
    pub fn refresh(&self) -> Result<()> {
        self.send(Event::Refresh)
    }

    /// Cancels outstanding work and waits for the actor to stop.
    pub async fn unmount(self) {
        if self.events.send(Event::Unmount).is_err() {
            tracing::debug!("listing actor already stopped");
        }
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "listing actor ended abnormally");
        }
    }

    fn send(&self, event: Event) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| MarketmodError::Worker("listing actor stopped".to_string()))
    }
}

struct Runtime<T> {
    state: ListingState,
    client: Arc<ApiClient<T>>,
    history: Arc<dyn UrlSink>,
    /// Weak so the actor stops once every controller handle is gone.
    events: mpsc::WeakUnboundedSender<Event>,
    snapshots: watch::Sender<ListingSnapshot>,
    fetch_cancel: Option<CancellationToken>,
    debounce: Option<JoinHandle<()>>,
}

impl<T: Transport + 'static> Runtime<T> {
    async fn run(mut self, mut events: mpsc::UnboundedReceiver<Event>) {
        while let Some(event) = events.recv().await {
            let unmount = matches!(event, Event::Unmount);

            match handle_event(&mut self.state, &event) {
                Ok((render, actions)) => {
                    for action in actions {
                        self.execute(action);
                    }
                    if render {
                        self.snapshots.send_replace(self.state.snapshot());
                    }
                }
                Err(e) => tracing::debug!(error = %e, "event rejected"),
            }

            if unmount {
                break;
            }
        }

        self.cancel_fetch();
        self.cancel_debounce();
        tracing::debug!("listing actor stopped");
    }

    fn execute(&mut self, action: Action) {
        match action {
            Action::Fetch { epoch, query } => {
                self.cancel_fetch();
                let cancel = CancellationToken::new();
                self.fetch_cancel = Some(cancel.clone());

                let client = Arc::clone(&self.client);
                let events = self.events.clone();
                tokio::spawn(async move {
                    let event = match client.list_advertisements(&query, &cancel).await {
                        Ok(response) => Event::FetchCompleted {
                            epoch,
                            page: ResultPage::from(response),
                        },
                        Err(error) => Event::FetchFailed { epoch, error },
                    };
                    let delivered = events.upgrade().is_some_and(|events| events.send(event).is_ok());
                    if !delivered {
                        tracing::debug!(epoch, "listing actor gone, dropping fetch result");
                    }
                });
            }
            Action::CancelFetch => self.cancel_fetch(),
            Action::ReplaceUrl { query } => self.history.replace(&query),
            Action::ScheduleSearchCommit { ticket, delay } => {
                self.cancel_debounce();
                let events = self.events.clone();
                self.debounce = Some(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let elapsed = Event::SearchDebounceElapsed { ticket };
                    let delivered = events.upgrade().is_some_and(|events| events.send(elapsed).is_ok());
                    if !delivered {
                        tracing::debug!(ticket, "listing actor gone, dropping search commit");
                    }
                }));
            }
            Action::CancelSearchCommit => self.cancel_debounce(),
        }
    }

    fn cancel_fetch(&mut self) {
        if let Some(token) = self.fetch_cancel.take() {
            token.cancel();
        }
    }

    fn cancel_debounce(&mut self) {
        if let Some(handle) = self.debounce.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use crate::api::request::Method;
    use crate::app::modes::BannerKind;
    use crate::app::query::{SortBy, SortOrder};
    use crate::domain::advertisement::fixtures::advertisement;
    use crate::domain::AdvertisementStatus;
    use crate::infrastructure::query_string;
    use crate::infrastructure::MemoryHistory;
    use serde_json::{json, Value};
    use std::time::Duration;

    const DEFAULT_PATH: &str = "/ads?page=1&limit=10&sortBy=createdAt&sortOrder=desc";

    fn page(titles: &[&str], current_page: u32) -> Value {
        let ads: Vec<_> = titles
            .iter()
            .zip(1..)
            .map(|(title, id)| advertisement(id, title))
            .collect();
        json!({
            "ads": ads,
            "pagination": {
                "currentPage": current_page,
                "totalPages": 2,
                "totalItems": 12,
                "itemsPerPage": 10
            }
        })
    }

    struct Harness {
        transport: MockTransport,
        history: Arc<MemoryHistory>,
        controller: ListingController,
    }

    fn mount(transport: &MockTransport, url_query: &str) -> Harness {
        let client = Arc::new(ApiClient::new(transport.clone(), "http://localhost:3001/api/v1"));
        let history = Arc::new(MemoryHistory::new(url_query));
        let state = ListingState::new(10, Duration::from_millis(500));
        let controller = ListingController::spawn(client, history.clone(), state, url_query);
        Harness {
            transport: transport.clone(),
            history,
            controller,
        }
    }

    /// Lets every ready task run; paused time only moves by a millisecond.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    fn titles(snapshot: &ListingSnapshot) -> Vec<String> {
        snapshot.items.iter().map(|ad| ad.title.clone()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn mount_fetches_the_default_query() {
        let transport = MockTransport::new();
        transport.add_response(Method::Get, "/ads", 200, page(&["Диван", "Стол"], 1));
        let h = mount(&transport, "");
        settle().await;

        assert_eq!(h.transport.called_paths(), vec![DEFAULT_PATH]);
        let snapshot = h.controller.snapshot();
        assert_eq!(titles(&snapshot), vec!["Диван", "Стол"]);
        assert!(!snapshot.loading);
        assert_eq!(snapshot.pagination.total_items, 12);
        h.controller.unmount().await;
    }

    #[tokio::test(start_paused = true)]
    async fn typing_commits_search_once_after_quiet_period() {
        let transport = MockTransport::new();
        transport.add_response(Method::Get, "/ads", 200, page(&["Велосипед"], 1));
        let h = mount(&transport, "");
        settle().await;

        for text in ["в", "ве", "вел"] {
            h.controller.search_input(text).unwrap();
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        assert_eq!(h.transport.called_paths().len(), 1);
        assert_eq!(h.controller.snapshot().staged_search, "вел");

        tokio::time::sleep(Duration::from_millis(400)).await;
        let paths = h.transport.called_paths();
        assert_eq!(paths.len(), 2);
        let query = query_string::parse(paths[1].trim_start_matches("/ads"));
        assert!(query.contains(&("search".to_string(), "вел".to_string())));
        assert!(query.contains(&("page".to_string(), "1".to_string())));
        assert_eq!(h.controller.snapshot().query.filters.search, "вел");
        h.controller.unmount().await;
    }

    #[tokio::test(start_paused = true)]
    async fn newest_query_wins_over_a_slower_older_one() {
        let transport = MockTransport::new();
        transport.add_response_with_delay(
            Method::Get,
            DEFAULT_PATH,
            200,
            page(&["Старый результат"], 1),
            Duration::from_millis(300),
        );
        transport.add_response(Method::Get, "/ads?page=1&limit=10&status=pending", 200, page(&["Новый"], 1));
        let h = mount(&transport, "");

        h.controller
            .set_filter(FilterPatch::default().statuses([AdvertisementStatus::Pending]))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;

        let snapshot = h.controller.snapshot();
        assert_eq!(titles(&snapshot), vec!["Новый"]);
        assert!(!snapshot.loading);
        assert_eq!(h.history.current(), "status=pending");
        h.controller.unmount().await;
    }

    #[tokio::test(start_paused = true)]
    async fn crossed_price_bounds_are_sent_as_is() {
        let transport = MockTransport::new();
        transport.add_response(Method::Get, "/ads", 200, page(&[], 1));
        let h = mount(&transport, "");
        settle().await;

        h.controller.set_filter(FilterPatch::default().min_price(Some(100.0))).unwrap();
        settle().await;
        h.controller.set_filter(FilterPatch::default().max_price(Some(50.0))).unwrap();
        settle().await;

        let paths = h.transport.called_paths();
        assert_eq!(paths.len(), 3);
        assert!(paths[2].contains("minPrice=100&maxPrice=50"));
        h.controller.unmount().await;
    }

    #[tokio::test(start_paused = true)]
    async fn page_past_the_end_shows_the_empty_state() {
        let transport = MockTransport::new();
        transport.add_response(Method::Get, "/ads?page=5", 200, page(&[], 5));
        transport.add_response(Method::Get, "/ads", 200, page(&["Диван"], 1));
        let h = mount(&transport, "");
        settle().await;

        h.controller.set_page(5).unwrap();
        settle().await;

        let snapshot = h.controller.snapshot();
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.query.pagination.current_page, 5);
        assert!(snapshot.compute_viewmodel(100).empty_state.is_some());
        assert_eq!(h.history.current(), "page=5");
        h.controller.unmount().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_keeps_rows_under_a_banner() {
        let transport = MockTransport::new();
        transport.add_response_once(Method::Get, "/ads", 200, page(&["Диван"], 1), Duration::ZERO);
        transport.add_unreachable(Method::Get, "/ads");
        let h = mount(&transport, "");
        settle().await;

        h.controller.refresh().unwrap();
        settle().await;

        let snapshot = h.controller.snapshot();
        assert_eq!(titles(&snapshot), vec!["Диван"]);
        assert_eq!(snapshot.banner.map(|b| b.kind), Some(BannerKind::Connection));
        h.controller.unmount().await;
    }

    #[tokio::test(start_paused = true)]
    async fn url_state_survives_a_remount() {
        let transport = MockTransport::new();
        transport.add_response(Method::Get, "/ads", 200, page(&[], 1));
        let first = mount(&transport, "?page=2&status=pending");
        settle().await;
        assert_eq!(first.controller.snapshot().query.pagination.current_page, 2);

        first
            .controller
            .set_filter(FilterPatch::default().sort_by(SortBy::Price).sort_order(SortOrder::Asc))
            .unwrap();
        settle().await;
        let url = first.history.current();
        assert_eq!(url, "status=pending&sortBy=price&sortOrder=asc");
        let query = first.controller.snapshot().query;
        first.controller.unmount().await;

        let second = mount(&transport, &url);
        settle().await;
        assert_eq!(second.controller.snapshot().query, query);
        second.controller.unmount().await;
    }

    #[tokio::test]
    async fn intents_fail_once_the_actor_is_gone() {
        let transport = MockTransport::new();
        let h = mount(&transport, "");
        let events = h.controller.events.clone();
        h.controller.unmount().await;

        assert!(events.send(Event::Refresh).is_err());
    }
}
