//! Advertisement domain model.
//!
//! This module defines the advertisement as served by the marketplace API,
//! together with its seller, moderation history and the enumerations used in
//! filters and moderation decisions. Field names follow the API's camelCase
//! JSON; display helpers return the Russian labels used across the console.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Image shown when an advertisement has no pictures.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/800x400?text=No+Image";

/// Moderation status of an advertisement.
///
/// The declaration order is the canonical order used when several statuses are
/// serialized into a query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvertisementStatus {
    Pending,
    Approved,
    Rejected,
    Draft,
}

impl AdvertisementStatus {
    /// All statuses in canonical order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Approved, Self::Rejected, Self::Draft];

    /// Wire name used in JSON bodies and query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Draft => "draft",
        }
    }

    /// Parses a wire name; unknown names yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// Label shown in badges.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "На модерации",
            Self::Approved => "Одобрено",
            Self::Rejected => "Отклонено",
            Self::Draft => "Черновик",
        }
    }
}

/// Review priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvertisementPriority {
    Normal,
    Urgent,
}

impl AdvertisementPriority {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "Обычный",
            Self::Urgent => "Срочный",
        }
    }
}

/// Decision recorded in an advertisement's moderation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModerationAction {
    Approved,
    Rejected,
    RequestChanges,
}

impl ModerationAction {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Approved => "Одобрено",
            Self::Rejected => "Отклонено",
            Self::RequestChanges => "Запрошены изменения",
        }
    }
}

/// Reason attached to a rejection or a change request.
///
/// Serialized as the Russian phrase the API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    #[serde(rename = "Запрещенный товар")]
    ProhibitedItem,
    #[serde(rename = "Неверная категория")]
    WrongCategory,
    #[serde(rename = "Некорректное описание")]
    IncorrectDescription,
    #[serde(rename = "Проблемы с фото")]
    PhotoProblems,
    #[serde(rename = "Подозрение на мошенничество")]
    SuspectedFraud,
    #[serde(rename = "Другое")]
    Other,
}

impl RejectionReason {
    /// All reasons in the order they are offered to the moderator.
    pub const ALL: [Self; 6] = [
        Self::ProhibitedItem,
        Self::WrongCategory,
        Self::IncorrectDescription,
        Self::PhotoProblems,
        Self::SuspectedFraud,
        Self::Other,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ProhibitedItem => "Запрещенный товар",
            Self::WrongCategory => "Неверная категория",
            Self::IncorrectDescription => "Некорректное описание",
            Self::PhotoProblems => "Проблемы с фото",
            Self::SuspectedFraud => "Подозрение на мошенничество",
            Self::Other => "Другое",
        }
    }

    /// Looks a reason up by its 1-based position in [`RejectionReason::ALL`].
    #[must_use]
    pub fn from_position(position: usize) -> Option<Self> {
        position.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

/// Seller who published the advertisement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub id: u64,
    pub name: String,
    /// Rating as served by the API (a decimal string such as `"4.8"`).
    pub rating: String,
    pub total_ads: u32,
    pub registered_at: DateTime<Utc>,
}

/// One entry of the moderation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationHistory {
    pub id: u64,
    pub moderator_id: u64,
    pub moderator_name: String,
    pub action: ModerationAction,
    pub reason: Option<String>,
    #[serde(default)]
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}

/// Advertisement as served by `GET /ads` and `GET /ads/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advertisement {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub category: String,
    pub category_id: u32,
    pub status: AdvertisementStatus,
    pub priority: AdvertisementPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub images: Vec<String>,
    pub seller: Seller,
    #[serde(default)]
    pub characteristics: BTreeMap<String, String>,
    #[serde(default)]
    pub moderation_history: Vec<ModerationHistory>,
}

impl Advertisement {
    /// Images to display, falling back to a single placeholder.
    #[must_use]
    pub fn display_images(&self) -> Vec<&str> {
        if self.images.is_empty() {
            vec![PLACEHOLDER_IMAGE]
        } else {
            self.images.iter().map(String::as_str).collect()
        }
    }

    #[must_use]
    pub fn is_urgent(&self) -> bool {
        self.priority == AdvertisementPriority::Urgent
    }
}

/// Formats a price the way the Russian locale does: thin groups of three
/// digits, a decimal comma and the rouble sign.
///
/// # Examples
///
/// ```
/// use marketmod::domain::advertisement::format_price;
///
/// assert_eq!(format_price(1_234_567.0), "1\u{a0}234\u{a0}567 ₽");
/// assert_eq!(format_price(99.5), "99,5 ₽");
/// ```
#[must_use]
pub fn format_price(price: f64) -> String {
    let negative = price < 0.0;
    let cents = (price.abs() * 100.0).round();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cents = cents as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{a0}');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if fraction == 0 {
        format!("{sign}{grouped} ₽")
    } else if fraction % 10 == 0 {
        format!("{sign}{grouped},{} ₽", fraction / 10)
    } else {
        format!("{sign}{grouped},{fraction:02} ₽")
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn advertisement(id: u64, title: &str) -> Advertisement {
        let at = DateTime::parse_from_rfc3339("2024-01-15T10:00:00Z")
            .map(|d| d.with_timezone(&Utc))
            .unwrap();
        Advertisement {
            id,
            title: title.to_string(),
            description: String::new(),
            price: 1500.0,
            category: "Электроника".to_string(),
            category_id: 1,
            status: AdvertisementStatus::Pending,
            priority: AdvertisementPriority::Normal,
            created_at: at,
            updated_at: at,
            images: vec![],
            seller: Seller {
                id: 7,
                name: "Иван".to_string(),
                rating: "4.8".to_string(),
                total_ads: 12,
                registered_at: at,
            },
            characteristics: BTreeMap::new(),
            moderation_history: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names_round_trip() {
        for status in AdvertisementStatus::ALL {
            assert_eq!(AdvertisementStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AdvertisementStatus::parse("archived"), None);
    }

    #[test]
    fn rejection_reason_serializes_to_russian_phrase() {
        let json = serde_json::to_string(&RejectionReason::PhotoProblems).unwrap();
        assert_eq!(json, "\"Проблемы с фото\"");
        assert_eq!(RejectionReason::from_position(1), Some(RejectionReason::ProhibitedItem));
        assert_eq!(RejectionReason::from_position(0), None);
        assert_eq!(RejectionReason::from_position(7), None);
    }

    #[test]
    fn advertisement_decodes_from_api_json() {
        let json = r#"{
            "id": 3, "title": "Велосипед", "description": "Почти новый",
            "price": 12000, "category": "Спорт", "categoryId": 4,
            "status": "approved", "priority": "urgent",
            "createdAt": "2024-01-10T08:00:00.000Z", "updatedAt": "2024-01-11T08:00:00.000Z",
            "images": ["a.jpg"],
            "seller": {"id": 1, "name": "Петр", "rating": "4.5", "totalAds": 3,
                       "registeredAt": "2023-05-01T00:00:00.000Z"},
            "characteristics": {"Цвет": "Красный"},
            "moderationHistory": [{"id": 1, "moderatorId": 2, "moderatorName": "Анна",
                "action": "requestChanges", "reason": null, "comment": "",
                "timestamp": "2024-01-11T08:00:00.000Z"}]
        }"#;

        let ad: Advertisement = serde_json::from_str(json).unwrap();
        assert_eq!(ad.status, AdvertisementStatus::Approved);
        assert!(ad.is_urgent());
        assert_eq!(ad.moderation_history[0].action, ModerationAction::RequestChanges);
        assert_eq!(ad.display_images(), vec!["a.jpg"]);
    }

    #[test]
    fn placeholder_used_without_images() {
        let ad = fixtures::advertisement(1, "x");
        assert_eq!(ad.display_images(), vec![PLACEHOLDER_IMAGE]);
    }

    #[test]
    fn price_formatting() {
        assert_eq!(format_price(0.0), "0 ₽");
        assert_eq!(format_price(1000.0), "1\u{a0}000 ₽");
        assert_eq!(format_price(999.0), "999 ₽");
        assert_eq!(format_price(10.25), "10,25 ₽");
    }
}
