//! Domain layer for the moderation console.
//!
//! This module contains the API payload types and the error type, independent
//! of transport, rendering or runtime concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`advertisement`]: Advertisement, seller and moderation enums
//! - [`listing`]: Paginated listing payloads
//! - [`moderation`]: Moderation and creation request bodies
//! - [`stats`]: Moderator statistics payloads

pub mod advertisement;
pub mod error;
pub mod listing;
pub mod moderation;
pub mod stats;

pub use advertisement::{
    Advertisement, AdvertisementPriority, AdvertisementStatus, ModerationAction,
    ModerationHistory, RejectionReason, Seller,
};
pub use error::{MarketmodError, Result};
pub use listing::{AdvertisementsResponse, Pagination, ResultPage};
pub use moderation::{Decision, NewAdvertisement};
pub use stats::{ActivityData, CategoryCounts, DecisionsData, StatsPeriod, StatsSummary};
