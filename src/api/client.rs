//! Typed client for the marketplace REST API.
//!
//! Every call takes a [`CancellationToken`]. Cancelling it drops the transport
//! future, which aborts the HTTP request, and the call resolves to
//! [`MarketmodError::Cancelled`].

use super::endpoint::{origin_of, Endpoint};
use super::request::ApiRequest;
use super::transport::Transport;
use crate::app::query::ListingQuery;
use crate::domain::moderation::AdvertisementEnvelope;
use crate::domain::{
    ActivityData, Advertisement, AdvertisementsResponse, CategoryCounts, Decision, DecisionsData,
    MarketmodError, NewAdvertisement, Result, StatsPeriod, StatsSummary,
};
use crate::infrastructure::query_string;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// REST client over any [`Transport`].
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> ApiClient<T> {
    /// Creates a client.
    ///
    /// `base_url` is only used for user-facing messages; the transport owns
    /// the actual address.
    #[must_use]
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// `GET /ads` for the given query.
    ///
    /// # Errors
    ///
    /// Connection, status, decode errors, or `Cancelled`.
    pub async fn list_advertisements(
        &self,
        query: &ListingQuery,
        cancel: &CancellationToken,
    ) -> Result<AdvertisementsResponse> {
        let request = ApiRequest::get(query.request_path());
        self.execute(Endpoint::ListAdvertisements, request, cancel).await
    }

    /// `GET /ads/{id}`; a 404 yields "Объявление не найдено".
    ///
    /// # Errors
    ///
    /// Connection, status, decode errors, or `Cancelled`.
    pub async fn get_advertisement(&self, id: u64, cancel: &CancellationToken) -> Result<Advertisement> {
        let request = ApiRequest::get(format!("/ads/{id}"));
        self.execute(Endpoint::GetAdvertisement, request, cancel).await
    }

    /// `POST /ads/{id}/approve`.
    ///
    /// # Errors
    ///
    /// Connection, status, decode errors, or `Cancelled`.
    pub async fn approve(&self, id: u64, cancel: &CancellationToken) -> Result<Advertisement> {
        let request = ApiRequest::post::<Value>(format!("/ads/{id}/approve"), None)?;
        let envelope: AdvertisementEnvelope = self.execute(Endpoint::Approve, request, cancel).await?;
        Ok(envelope.into())
    }

    /// `POST /ads/{id}/reject`.
    ///
    /// # Errors
    ///
    /// Connection, status, decode errors, or `Cancelled`.
    pub async fn reject(&self, id: u64, decision: &Decision, cancel: &CancellationToken) -> Result<Advertisement> {
        let request = ApiRequest::post(format!("/ads/{id}/reject"), Some(decision))?;
        let envelope: AdvertisementEnvelope = self.execute(Endpoint::Reject, request, cancel).await?;
        Ok(envelope.into())
    }

    /// `POST /ads/{id}/request-changes`.
    ///
    /// # Errors
    ///
    /// Connection, status, decode errors, or `Cancelled`.
    pub async fn request_changes(
        &self,
        id: u64,
        decision: &Decision,
        cancel: &CancellationToken,
    ) -> Result<Advertisement> {
        let request = ApiRequest::post(format!("/ads/{id}/request-changes"), Some(decision))?;
        let envelope: AdvertisementEnvelope = self.execute(Endpoint::RequestChanges, request, cancel).await?;
        Ok(envelope.into())
    }

    /// `POST /ads`.
    ///
    /// # Errors
    ///
    /// Connection, status, decode errors, or `Cancelled`.
    pub async fn create_advertisement(
        &self,
        advertisement: &NewAdvertisement,
        cancel: &CancellationToken,
    ) -> Result<Advertisement> {
        let request = ApiRequest::post("/ads", Some(advertisement))?;
        let envelope: AdvertisementEnvelope =
            self.execute(Endpoint::CreateAdvertisement, request, cancel).await?;
        Ok(envelope.into())
    }

    /// `GET /stats/summary`.
    ///
    /// # Errors
    ///
    /// Connection, status, decode errors, or `Cancelled`.
    pub async fn stats_summary(&self, period: &StatsPeriod, cancel: &CancellationToken) -> Result<StatsSummary> {
        let request = ApiRequest::get(stats_path("/stats/summary", period));
        self.execute(Endpoint::StatsSummary, request, cancel).await
    }

    /// `GET /stats/chart/activity`.
    ///
    /// # Errors
    ///
    /// Connection, status, decode errors, or `Cancelled`.
    pub async fn activity_chart(
        &self,
        period: &StatsPeriod,
        cancel: &CancellationToken,
    ) -> Result<Vec<ActivityData>> {
        let request = ApiRequest::get(stats_path("/stats/chart/activity", period));
        self.execute(Endpoint::ActivityChart, request, cancel).await
    }

    /// `GET /stats/chart/decisions`.
    ///
    /// # Errors
    ///
    /// Connection, status, decode errors, or `Cancelled`.
    pub async fn decisions_chart(&self, period: &StatsPeriod, cancel: &CancellationToken) -> Result<DecisionsData> {
        let request = ApiRequest::get(stats_path("/stats/chart/decisions", period));
        self.execute(Endpoint::DecisionsChart, request, cancel).await
    }

    /// `GET /stats/chart/categories`.
    ///
    /// # Errors
    ///
    /// Connection, status, decode errors, or `Cancelled`.
    pub async fn categories_chart(&self, period: &StatsPeriod, cancel: &CancellationToken) -> Result<CategoryCounts> {
        let request = ApiRequest::get(stats_path("/stats/chart/categories", period));
        self.execute(Endpoint::CategoriesChart, request, cancel).await
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<R> {
        let span = tracing::debug_span!(
            "api_request",
            endpoint = ?endpoint,
            method = request.method.as_str(),
            path = %request.path,
        );

        async move {
            if cancel.is_cancelled() {
                return Err(MarketmodError::Cancelled);
            }

            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::debug!("request cancelled");
                    return Err(MarketmodError::Cancelled);
                }
                outcome = self.transport.send(request) => outcome,
            };

            let response = outcome.map_err(|e| {
                tracing::warn!(error = %e, "api unreachable");
                endpoint.unreachable_error(origin_of(&self.base_url))
            })?;

            if !response.is_success() {
                tracing::warn!(status = response.status, "api returned error status");
                return Err(endpoint.status_error(response.status));
            }

            tracing::debug!(status = response.status, bytes = response.body.len(), "api response");
            serde_json::from_str(&response.body).map_err(MarketmodError::from)
        }
        .instrument(span)
        .await
    }
}

fn stats_path(path: &str, period: &StatsPeriod) -> String {
    format!("{path}?{}", query_string::encode(period.query_pairs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use crate::api::request::Method;
    use crate::domain::advertisement::fixtures::advertisement;
    use crate::domain::RejectionReason;
    use serde_json::json;
    use std::time::Duration;

    fn client() -> ApiClient<MockTransport> {
        ApiClient::new(MockTransport::new(), "http://localhost:3001/api/v1")
    }

    #[tokio::test]
    async fn list_requests_canonical_path() {
        let client = client();
        client.transport().add_response(
            Method::Get,
            "/ads",
            200,
            json!({"ads": [], "pagination": {"currentPage": 1, "totalPages": 0, "totalItems": 0, "itemsPerPage": 10}}),
        );

        let response = client
            .list_advertisements(&ListingQuery::default(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(response.ads.is_empty());
        assert_eq!(
            client.transport().called_paths(),
            vec!["/ads?page=1&limit=10&sortBy=createdAt&sortOrder=desc"]
        );
    }

    #[tokio::test]
    async fn missing_advertisement_is_reported_as_not_found() {
        let client = client();
        client.transport().add_response(Method::Get, "/ads/999", 404, json!({"error": "Ad not found"}));

        let err = client.get_advertisement(999, &CancellationToken::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "Объявление не найдено");
    }

    #[tokio::test]
    async fn connection_failure_names_the_server_for_listing() {
        let client = client();
        client.transport().add_unreachable(Method::Get, "/ads");

        let err = client
            .list_advertisements(&ListingQuery::default(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.is_connection());
        assert!(err.to_string().ends_with("http://localhost:3001"));
    }

    #[tokio::test]
    async fn reject_posts_decision_and_unwraps_envelope() {
        let client = client();
        let mut ad = advertisement(4, "Стул");
        ad.status = crate::domain::AdvertisementStatus::Rejected;
        client.transport().add_response(Method::Post, "/ads/4/reject", 200, json!({"message": "ok", "ad": ad}));

        let decision = Decision {
            reason: RejectionReason::SuspectedFraud,
            comment: Some("дубликат".to_string()),
        };
        let updated = client.reject(4, &decision, &CancellationToken::new()).await.unwrap();

        assert_eq!(updated.status, crate::domain::AdvertisementStatus::Rejected);
        let calls = client.transport().get_call_history();
        assert_eq!(
            calls[0].body,
            Some(json!({"reason": "Подозрение на мошенничество", "comment": "дубликат"}))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_aborts_a_slow_request() {
        let client = client();
        client.transport().add_response_with_delay(
            Method::Get,
            "/stats/summary",
            200,
            json!({}),
            Duration::from_secs(10),
        );
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = client.stats_summary(&StatsPeriod::Week, &cancel).await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn stats_requests_carry_period() {
        let client = client();
        client.transport().add_response(Method::Get, "/stats/chart/categories", 200, json!({"Авто": 3}));

        let counts = client
            .categories_chart(&StatsPeriod::Month, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(counts.get("Авто"), Some(&3));
        assert_eq!(client.transport().called_paths(), vec!["/stats/chart/categories?period=month"]);
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let client = client();
        client.transport().add_response(Method::Get, "/ads/1", 200, json!({"id": "x"}));
        let err = client.get_advertisement(1, &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, MarketmodError::Decode(_)));
    }
}
