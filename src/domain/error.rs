//! Error types for the moderation console.
//!
//! This module defines the centralized error type [`MarketmodError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! The display strings of the user-facing variants (`Connection`, `Request`,
//! `Validation`) are exactly the messages shown in banners and notifications.

use thiserror::Error;

/// The main error type for moderation console operations.
///
/// Every failure is scoped to the single operation that triggered it; nothing
/// here is fatal to the process.
///
/// # Examples
///
/// ```
/// use marketmod::MarketmodError;
///
/// let err = MarketmodError::request(404, "Объявление не найдено");
/// assert_eq!(err.to_string(), "Объявление не найдено");
/// assert_eq!(err.status(), Some(404));
/// ```
#[derive(Debug, Error)]
pub enum MarketmodError {
    /// The API could not be reached at all (DNS, refused connection, timeout).
    ///
    /// Rendered as a persistent banner with troubleshooting hints. Existing
    /// results stay on screen.
    #[error("{0}")]
    Connection(String),

    /// The API answered with a non-2xx status.
    ///
    /// `message` is derived from the endpoint and the status code.
    #[error("{message}")]
    Request {
        /// HTTP status code returned by the server.
        status: u16,
        /// Human-readable message for the user.
        message: String,
    },

    /// Client-side form validation failed; the request never left the client.
    #[error("{0}")]
    Validation(String),

    /// The operation was cancelled (superseded request or view unmounted).
    ///
    /// Always swallowed, never shown to the user.
    #[error("request cancelled")]
    Cancelled,

    /// The server answered 2xx but the body did not match the expected schema.
    #[error("Некорректный ответ сервера: {0}")]
    Decode(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A background task could not be reached (stopped or panicked).
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Theme parsing or application failed.
    #[error("Theme error: {0}")]
    Theme(String),
}

impl MarketmodError {
    /// Shorthand for [`MarketmodError::Request`].
    #[must_use]
    pub fn request(status: u16, message: impl Into<String>) -> Self {
        Self::Request {
            status,
            message: message.into(),
        }
    }

    /// Returns `true` for cancellations, which callers must swallow silently.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns `true` when the API was unreachable.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// HTTP status carried by a [`MarketmodError::Request`], if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MarketmodError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// A specialized `Result` type for moderation console operations.
pub type Result<T> = std::result::Result<T, MarketmodError>;
