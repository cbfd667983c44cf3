//! Statistics screen loader.
//!
//! A period change starts a new generation and cancels the previous load.
//! Results are applied only if their generation is still current, so a slow
//! answer for an old period can never overwrite a newer one. On failure the
//! previous payload stays on screen under a banner.

use super::aggregate::{compute_viewmodel, StatsData};
use super::modes::Banner;
use crate::api::{ApiClient, Transport};
use crate::domain::{Result, StatsPeriod};
use crate::ui::viewmodel::StatsViewModel;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// One load of the four stats endpoints for a period.
#[derive(Debug, Clone)]
pub struct StatsRequest {
    pub generation: u64,
    pub period: StatsPeriod,
    pub cancel: CancellationToken,
}

impl StatsRequest {
    /// Fetches summary, activity, decisions and categories concurrently.
    ///
    /// # Errors
    ///
    /// The first failing endpoint's error; the others are dropped.
    pub async fn run<T: Transport>(&self, client: &ApiClient<T>) -> Result<StatsData> {
        let (summary, activity, decisions, categories) = tokio::try_join!(
            client.stats_summary(&self.period, &self.cancel),
            client.activity_chart(&self.period, &self.cancel),
            client.decisions_chart(&self.period, &self.cancel),
            client.categories_chart(&self.period, &self.cancel),
        )?;
        Ok(StatsData {
            summary,
            activity,
            decisions,
            categories,
        })
    }
}

/// State of the statistics screen.
pub struct StatsDashboard<T> {
    client: Arc<ApiClient<T>>,
    period: StatsPeriod,
    generation: u64,
    data: Option<StatsData>,
    banner: Option<Banner>,
    loading: bool,
    cancel: Option<CancellationToken>,
}

impl<T: Transport> StatsDashboard<T> {
    #[must_use]
    pub fn new(client: Arc<ApiClient<T>>) -> Self {
        Self {
            client,
            period: StatsPeriod::default(),
            generation: 0,
            data: None,
            banner: None,
            loading: false,
            cancel: None,
        }
    }

    #[must_use]
    pub const fn period(&self) -> &StatsPeriod {
        &self.period
    }

    #[must_use]
    pub const fn data(&self) -> Option<&StatsData> {
        self.data.as_ref()
    }

    #[must_use]
    pub const fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Selects `period` and starts a new generation, cancelling the previous load.
    pub fn begin(&mut self, period: StatsPeriod) -> StatsRequest {
        if let Some(previous) = self.cancel.take() {
            previous.cancel();
        }
        self.generation += 1;
        self.period = period;
        self.loading = true;

        let cancel = CancellationToken::new();
        self.cancel = Some(cancel.clone());
        tracing::debug!(generation = self.generation, period = period.as_str(), "loading stats");
        StatsRequest {
            generation: self.generation,
            period,
            cancel,
        }
    }

    /// Applies a finished load; returns `false` when it was superseded.
    pub fn apply(&mut self, generation: u64, result: Result<StatsData>) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "discarding stale stats");
            return false;
        }
        self.loading = false;
        self.cancel = None;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.banner = None;
            }
            Err(e) if e.is_cancelled() => tracing::debug!("stats load cancelled"),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load stats");
                self.banner = Banner::from_error(&e);
            }
        }
        true
    }

    /// Loads `period` and applies the result.
    pub async fn load(&mut self, period: StatsPeriod) -> bool {
        let request = self.begin(period);
        let result = request.run(&self.client).await;
        self.apply(request.generation, result)
    }

    /// Renderable view; `None` until the first successful load.
    #[must_use]
    pub fn compute_viewmodel(&self) -> Option<StatsViewModel> {
        self.data.as_ref().map(|data| StatsViewModel {
            banner: self.banner.clone(),
            loading: self.loading,
            ..compute_viewmodel(&self.period, data)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use crate::api::Method;
    use crate::domain::MarketmodError;
    use serde_json::json;

    fn stub_stats(transport: &MockTransport, total: u64) {
        transport.add_response(
            Method::Get,
            "/stats/summary",
            200,
            json!({
                "totalReviewed": total, "totalReviewedToday": 1, "totalReviewedThisWeek": 5,
                "totalReviewedThisMonth": total, "approvedPercentage": 60.0,
                "rejectedPercentage": 30.0, "requestChangesPercentage": 10.0,
                "averageReviewTime": 125
            }),
        );
        transport.add_response(
            Method::Get,
            "/stats/chart/activity",
            200,
            json!([{"date": "2024-01-15", "approved": 3, "rejected": 1, "requestChanges": 0}]),
        );
        transport.add_response(
            Method::Get,
            "/stats/chart/decisions",
            200,
            json!({"approved": 60.0, "rejected": 30.0, "requestChanges": 10.0}),
        );
        transport.add_response(Method::Get, "/stats/chart/categories", 200, json!({"Электроника": 4}));
    }

    fn dashboard(transport: &MockTransport) -> StatsDashboard<MockTransport> {
        StatsDashboard::new(Arc::new(ApiClient::new(transport.clone(), "http://localhost:3001/api/v1")))
    }

    #[tokio::test]
    async fn load_fetches_all_four_endpoints_for_the_period() {
        let transport = MockTransport::new();
        stub_stats(&transport, 40);
        let mut dashboard = dashboard(&transport);

        assert!(dashboard.load(StatsPeriod::Month).await);

        let mut paths = transport.called_paths();
        paths.sort();
        assert_eq!(
            paths,
            vec![
                "/stats/chart/activity?period=month",
                "/stats/chart/categories?period=month",
                "/stats/chart/decisions?period=month",
                "/stats/summary?period=month",
            ]
        );
        let vm = dashboard.compute_viewmodel().unwrap();
        assert_eq!(vm.cards[0].value, "40");
        assert_eq!(vm.cards[7].value, "2м 5с");
    }

    #[tokio::test]
    async fn stale_generation_is_discarded() {
        let transport = MockTransport::new();
        stub_stats(&transport, 7);
        let mut dashboard = dashboard(&transport);

        let old = dashboard.begin(StatsPeriod::Today);
        let new = dashboard.begin(StatsPeriod::Month);
        assert!(old.cancel.is_cancelled());

        let client = ApiClient::new(transport.clone(), "http://localhost:3001/api/v1");
        let fresh = new.run(&client).await;
        assert!(dashboard.apply(new.generation, fresh));
        assert!(!dashboard.apply(old.generation, Err(MarketmodError::Cancelled)));

        assert_eq!(dashboard.period(), &StatsPeriod::Month);
        assert!(dashboard.data().is_some());
        assert!(!dashboard.is_loading());
    }

    #[tokio::test]
    async fn failure_keeps_previous_payload() {
        let transport = MockTransport::new();
        stub_stats(&transport, 7);
        let mut dashboard = dashboard(&transport);
        dashboard.load(StatsPeriod::Week).await;

        let request = dashboard.begin(StatsPeriod::Today);
        dashboard.apply(request.generation, Err(MarketmodError::Connection("offline".into())));

        assert_eq!(dashboard.data().map(|d| d.summary.total_reviewed), Some(7));
        assert_eq!(dashboard.banner().map(|b| b.message.as_str()), Some("offline"));
    }
}
