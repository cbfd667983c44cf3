//! Single advertisement view with moderation actions.
//!
//! [`AdvertisementDetail`] loads one advertisement and performs the three
//! moderation decisions on it. Load failures become a [`Banner`]; decision
//! outcomes, good or bad, become a [`Notification`].
//!
//! # Example
//!
//! ```no_run
//! use marketmod::api::{ApiClient, HttpTransport};
//! use marketmod::app::detail::AdvertisementDetail;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn demo() -> marketmod::Result<()> {
//! let transport = HttpTransport::new("http://localhost:3001/api/v1", Duration::from_secs(10))?;
//! let client = Arc::new(ApiClient::new(transport, "http://localhost:3001/api/v1"));
//! let mut detail = AdvertisementDetail::new(client, 42);
//! detail.load().await;
//! let note = detail.approve().await?;
//! println!("{}", note.message);
//! # Ok(())
//! # }
//! ```

use super::forms::DecisionForm;
use super::modes::{Banner, Notification, Tone};
use crate::api::{ApiClient, Transport};
use crate::domain::advertisement::format_price;
use crate::domain::{Advertisement, MarketmodError, Result};
use crate::ui::viewmodel::{DetailViewModel, HistoryLine};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// What the detail view currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailState {
    pub id: u64,
    /// `None` until a load succeeds.
    pub advertisement: Option<Advertisement>,
    pub loading: bool,
    /// A moderation request is in flight; action buttons are disabled.
    pub processing: bool,
    pub banner: Option<Banner>,
}

/// Loader and moderation controller for one advertisement.
///
/// Dropping it cancels any request still in flight.
pub struct AdvertisementDetail<T> {
    client: Arc<ApiClient<T>>,
    state: DetailState,
    cancel: CancellationToken,
}

impl<T: Transport> AdvertisementDetail<T> {
    #[must_use]
    pub fn new(client: Arc<ApiClient<T>>, id: u64) -> Self {
        Self {
            client,
            state: DetailState {
                id,
                advertisement: None,
                loading: false,
                processing: false,
                banner: None,
            },
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &DetailState {
        &self.state
    }

    /// Id of the previous advertisement, never below 1.
    #[must_use]
    pub fn previous_id(&self) -> u64 {
        self.state.id.saturating_sub(1).max(1)
    }

    #[must_use]
    pub const fn next_id(&self) -> u64 {
        self.state.id + 1
    }

    /// Loads the advertisement; on failure the banner is set and the view
    /// keeps whatever it showed before (nothing, on the first load).
    pub async fn load(&mut self) {
        let span = tracing::debug_span!("load_advertisement", id = self.state.id);
        async {
            self.state.loading = true;
            self.state.banner = None;

            match self.client.get_advertisement(self.state.id, &self.cancel).await {
                Ok(ad) => self.state.advertisement = Some(ad),
                Err(e) if e.is_cancelled() => tracing::debug!("detail load cancelled"),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to load advertisement");
                    self.state.banner = Banner::from_error(&e);
                }
            }
            self.state.loading = false;
        }
        .instrument(span)
        .await;
    }

    /// Approves the advertisement.
    ///
    /// # Errors
    ///
    /// Only [`MarketmodError::Cancelled`]; request failures are reported as a
    /// failure notification.
    pub async fn approve(&mut self) -> Result<Notification> {
        self.state.processing = true;
        let outcome = self.client.approve(self.state.id, &self.cancel).await;
        self.finish(
            outcome,
            Notification::new(Tone::Positive, "Успешно", "Объявление одобрено"),
            "Не удалось одобрить объявление",
        )
    }

    /// Rejects the advertisement with a reason.
    ///
    /// # Errors
    ///
    /// [`MarketmodError::Validation`] when no reason is selected (nothing is
    /// sent), or [`MarketmodError::Cancelled`].
    pub async fn reject(&mut self, form: &DecisionForm) -> Result<Notification> {
        let decision = form.validate()?;
        self.state.processing = true;
        let outcome = self.client.reject(self.state.id, &decision, &self.cancel).await;
        self.finish(
            outcome,
            Notification::new(Tone::Negative, "Успешно", "Объявление отклонено"),
            "Не удалось отклонить объявление",
        )
    }

    /// Sends the advertisement back to the seller for changes.
    ///
    /// # Errors
    ///
    /// [`MarketmodError::Validation`] when no reason is selected (nothing is
    /// sent), or [`MarketmodError::Cancelled`].
    pub async fn request_changes(&mut self, form: &DecisionForm) -> Result<Notification> {
        let decision = form.validate()?;
        self.state.processing = true;
        let outcome = self
            .client
            .request_changes(self.state.id, &decision, &self.cancel)
            .await;
        self.finish(
            outcome,
            Notification::new(Tone::Caution, "Успешно", "Запрос изменений отправлен"),
            "Не удалось отправить запрос изменений",
        )
    }

    fn finish(
        &mut self,
        outcome: Result<Advertisement>,
        success: Notification,
        fallback: &str,
    ) -> Result<Notification> {
        self.state.processing = false;
        match outcome {
            Ok(ad) => {
                tracing::info!(id = ad.id, status = ad.status.as_str(), "moderation decision applied");
                self.state.advertisement = Some(ad);
                Ok(success)
            }
            Err(MarketmodError::Cancelled) => Err(MarketmodError::Cancelled),
            Err(e) => {
                tracing::warn!(id = self.state.id, error = %e, "moderation decision failed");
                Ok(Notification::failure(&e, fallback))
            }
        }
    }

    /// Renderable view of the current state.
    #[must_use]
    pub fn compute_viewmodel(&self) -> DetailViewModel {
        let ad = self.state.advertisement.as_ref();
        DetailViewModel {
            id: self.state.id,
            title: ad.map_or_else(|| format!("Объявление #{}", self.state.id), |ad| ad.title.clone()),
            status: ad.map(|ad| ad.status),
            price: ad.map(|ad| format_price(ad.price)),
            category: ad.map(|ad| ad.category.clone()),
            priority: ad.map(|ad| ad.priority.label()),
            created: ad.map(|ad| ad.created_at.format("%d.%m.%Y %H:%M").to_string()),
            description: ad.map(|ad| ad.description.clone()).unwrap_or_default(),
            characteristics: ad
                .map(|ad| ad.characteristics.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .unwrap_or_default(),
            images: ad
                .map(|ad| ad.display_images().into_iter().map(String::from).collect())
                .unwrap_or_default(),
            seller: ad.map(|ad| {
                format!(
                    "{} · рейтинг {} · объявлений: {}",
                    ad.seller.name, ad.seller.rating, ad.seller.total_ads
                )
            }),
            history: ad
                .map(|ad| {
                    ad.moderation_history
                        .iter()
                        .map(|entry| HistoryLine {
                            when: entry.timestamp.format("%d.%m.%Y %H:%M").to_string(),
                            moderator: entry.moderator_name.clone(),
                            action: entry.action.label(),
                            reason: entry.reason.clone(),
                            comment: entry.comment.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            banner: self.state.banner.clone(),
            loading: self.state.loading,
            processing: self.state.processing,
            previous_id: self.previous_id(),
            next_id: self.next_id(),
        }
    }
}

impl<T> Drop for AdvertisementDetail<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
