//! Client-side validated forms for moderation decisions and new listings.
//!
//! Validation happens before any request is built; an invalid form never
//! reaches the network.

use super::modes::{Notification, Tone};
use crate::api::{ApiClient, Transport};
use crate::domain::{Decision, MarketmodError, NewAdvertisement, RejectionReason, Result};
use tokio_util::sync::CancellationToken;

/// Reason and optional comment for a rejection or a change request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionForm {
    pub reason: Option<RejectionReason>,
    pub comment: String,
}

impl DecisionForm {
    #[must_use]
    pub fn new(reason: Option<RejectionReason>, comment: impl Into<String>) -> Self {
        Self {
            reason,
            comment: comment.into(),
        }
    }

    /// Builds the request body.
    ///
    /// # Errors
    ///
    /// Returns [`MarketmodError::Validation`] with "Выберите причину" when no
    /// reason is selected.
    pub fn validate(&self) -> Result<Decision> {
        let reason = self
            .reason
            .ok_or_else(|| MarketmodError::Validation("Выберите причину".to_string()))?;
        let comment = self.comment.trim();
        Ok(Decision {
            reason,
            comment: (!comment.is_empty()).then(|| comment.to_string()),
        })
    }
}

/// Fields of a new advertisement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewAdvertisementForm {
    pub title: String,
    pub description: String,
    pub price: f64,
    /// Optional picture URL; blank means none.
    pub image_url: String,
}

impl NewAdvertisementForm {
    /// Builds the request body.
    ///
    /// # Errors
    ///
    /// Returns [`MarketmodError::Validation`] for a blank title ("Название
    /// обязательно") or a price that is not above zero ("Цена должна быть
    /// больше 0").
    pub fn validate(&self) -> Result<NewAdvertisement> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(MarketmodError::Validation("Название обязательно".to_string()));
        }
        if !(self.price.is_finite() && self.price > 0.0) {
            return Err(MarketmodError::Validation("Цена должна быть больше 0".to_string()));
        }
        let image_url = self.image_url.trim();
        Ok(NewAdvertisement {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            price: self.price,
            images: if image_url.is_empty() {
                vec![]
            } else {
                vec![image_url.to_string()]
            },
        })
    }

    /// Validates the form and sends `POST /ads`.
    ///
    /// The caller refreshes the listing after a positive notification.
    ///
    /// # Errors
    ///
    /// [`MarketmodError::Validation`] for an invalid form (nothing is sent),
    /// or [`MarketmodError::Cancelled`]. Request failures are reported as a
    /// failure notification.
    pub async fn submit<T: Transport>(
        &self,
        client: &ApiClient<T>,
        cancel: &CancellationToken,
    ) -> Result<Notification> {
        let body = self.validate()?;
        match client.create_advertisement(&body, cancel).await {
            Ok(ad) => {
                tracing::info!(id = ad.id, "advertisement created");
                Ok(Notification::new(Tone::Positive, "Успешно", format!("Объявление #{} создано", ad.id)))
            }
            Err(MarketmodError::Cancelled) => Err(MarketmodError::Cancelled),
            Err(e) => {
                tracing::warn!(error = %e, "failed to create advertisement");
                Ok(Notification::failure(&e, "Ошибка при создании объявления"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use crate::api::request::Method;
    use crate::domain::advertisement::fixtures::advertisement;
    use serde_json::json;

    fn client() -> ApiClient<MockTransport> {
        ApiClient::new(MockTransport::new(), "http://localhost:3001/api/v1")
    }

    #[test]
    fn decision_requires_reason() {
        let err = DecisionForm::new(None, "текст").validate().unwrap_err();
        assert_eq!(err.to_string(), "Выберите причину");
    }

    #[test]
    fn blank_comment_is_omitted() {
        let decision = DecisionForm::new(Some(RejectionReason::Other), "   ").validate().unwrap();
        assert_eq!(decision.comment, None);
        assert_eq!(decision.reason, RejectionReason::Other);
    }

    #[test]
    fn new_advertisement_validation() {
        let mut form = NewAdvertisementForm {
            title: "  ".to_string(),
            price: 10.0,
            ..Default::default()
        };
        assert_eq!(form.validate().unwrap_err().to_string(), "Название обязательно");

        form.title = "Лампа".to_string();
        form.price = 0.0;
        assert_eq!(form.validate().unwrap_err().to_string(), "Цена должна быть больше 0");

        form.price = 250.0;
        form.image_url = "https://img/1.jpg".to_string();
        let body = form.validate().unwrap();
        assert_eq!(body.images, vec!["https://img/1.jpg"]);
    }

    #[tokio::test]
    async fn invalid_new_advertisement_never_reaches_the_network() {
        let client = client();
        let form = NewAdvertisementForm::default();

        assert!(form.submit(&client, &CancellationToken::new()).await.is_err());
        assert!(client.transport().called_paths().is_empty());
    }

    #[tokio::test]
    async fn created_advertisement_is_announced() {
        let client = client();
        client.transport().add_response(Method::Post, "/ads", 201, json!(advertisement(31, "Лампа")));
        let form = NewAdvertisementForm {
            title: "Лампа".to_string(),
            price: 250.0,
            ..Default::default()
        };

        let note = form.submit(&client, &CancellationToken::new()).await.unwrap();
        assert_eq!(note.tone, Tone::Positive);
        assert_eq!(note.message, "Объявление #31 создано");
        let calls = client.transport().get_call_history();
        assert_eq!(calls[0].body, Some(json!({"title": "Лампа", "description": "", "price": 250.0})));
    }

    #[tokio::test]
    async fn server_error_on_create_becomes_a_failure_notification() {
        let client = client();
        client.transport().add_response(Method::Post, "/ads", 500, json!({"error": "boom"}));
        let form = NewAdvertisementForm {
            title: "Лампа".to_string(),
            price: 250.0,
            ..Default::default()
        };

        let note = form.submit(&client, &CancellationToken::new()).await.unwrap();
        assert_eq!(note.tone, Tone::Negative);
    }
}
