//! Screen and feedback state types shared by the console views.
//!
//! This module defines the small enums and value types that decide what the
//! console shows: which screen is active, and how a failed operation is
//! reported to the moderator.
//!
//! # Feedback routing
//!
//! - **Banner**: persistent, shown above the content of the screen whose load
//!   failed (listing, detail, statistics). Previous content stays visible.
//! - **Notification**: transient, reported once after a moderation action.
//!
//! Cancellations never produce either.
//!
//! # Example
//!
//! ```rust
//! use marketmod::app::modes::{Banner, BannerKind};
//! use marketmod::MarketmodError;
//!
//! let banner = Banner::from_error(&MarketmodError::Connection("offline".into()));
//! assert_eq!(banner.map(|b| b.kind), Some(BannerKind::Connection));
//! assert!(Banner::from_error(&MarketmodError::Cancelled).is_none());
//! ```

use crate::domain::MarketmodError;

/// Screen currently shown by the terminal console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Filterable advertisement table.
    #[default]
    Listing,

    /// A single advertisement with moderation controls.
    Detail(u64),

    /// Reviewer statistics for a period.
    Stats,
}

/// Category of a persistent error banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    /// The API could not be reached; troubleshooting hints are shown.
    Connection,

    /// The API answered with an error status or an unreadable body.
    Request,

    /// Input was rejected before any request was made.
    Validation,
}

/// Persistent error banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub title: &'static str,
    pub message: String,
    /// Troubleshooting steps, only for [`BannerKind::Connection`].
    pub hints: Vec<&'static str>,
}

impl Banner {
    /// Builds the banner for an error, or `None` for a cancellation.
    #[must_use]
    pub fn from_error(err: &MarketmodError) -> Option<Self> {
        let kind = match err {
            MarketmodError::Cancelled => return None,
            MarketmodError::Connection(_) => BannerKind::Connection,
            MarketmodError::Validation(_) => BannerKind::Validation,
            _ => BannerKind::Request,
        };

        let (title, hints) = match kind {
            BannerKind::Connection => (
                "Ошибка подключения",
                vec![
                    "Убедитесь, что API сервер запущен",
                    "Проверьте адрес api_base_url в конфигурации",
                    "Повторите запрос командой refresh",
                ],
            ),
            BannerKind::Request => ("Ошибка", vec![]),
            BannerKind::Validation => ("Проверьте введенные данные", vec![]),
        };

        Some(Self {
            kind,
            title,
            message: err.to_string(),
            hints,
        })
    }
}

/// Visual tone of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Caution,
    Negative,
}

/// Transient message reported after a moderation action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub tone: Tone,
    pub title: String,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn new(tone: Tone, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tone,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Failure notification; the error's own message wins over `fallback`
    /// when it is a user-facing one.
    #[must_use]
    pub fn failure(err: &MarketmodError, fallback: &str) -> Self {
        let message = match err {
            MarketmodError::Connection(_)
            | MarketmodError::Request { .. }
            | MarketmodError::Validation(_) => err.to_string(),
            _ => fallback.to_string(),
        };
        Self::new(Tone::Negative, "Ошибка", message)
    }
}
