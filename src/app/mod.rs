//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the console front end (main.rs) and the API and
//! domain layers. The listing is a pure state machine driven by an async
//! actor; the detail and statistics screens are smaller controllers that own
//! their own cancellation.
//!
//! # Architecture
//!
//! The listing follows a unidirectional data flow:
//!
//! ```text
//! Intent → Event → handle_event → State Mutation → Actions → Side Effects
//!                      ↑                                         ↓
//!                      └────────── Fetch / Timer Completions ────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transitions
//! - [`query`]: Filter, sort and pagination state with URL round-tripping
//! - [`state`]: Listing state container and view model computation
//! - [`controller`]: Tokio actor running the listing state machine
//! - [`detail`]: Single advertisement view and moderation decisions
//! - [`forms`]: Client-side validation of moderation and creation forms
//! - [`dashboard`]: Statistics loader with stale-result discard
//! - [`aggregate`]: Derived values over statistics payloads
//! - [`modes`]: Screens, banners and notifications
//! - [`command`]: Console command parsing
//!
//! # Example
//!
//! ```rust
//! use marketmod::app::{handle_event, Event, ListingState};
//! use std::time::Duration;
//!
//! let mut state = ListingState::new(10, Duration::from_millis(500));
//! let (render, actions) = handle_event(&mut state, &Event::Mount { query: "?page=2".into() })?;
//! assert!(render);
//! assert!(!actions.is_empty());
//! # Ok::<(), marketmod::MarketmodError>(())
//! ```

pub mod actions;
pub mod aggregate;
pub mod command;
pub mod controller;
pub mod dashboard;
pub mod detail;
pub mod forms;
pub mod handler;
pub mod modes;
pub mod query;
pub mod state;

pub use actions::Action;
pub use command::Command;
pub use controller::ListingController;
pub use dashboard::StatsDashboard;
pub use detail::AdvertisementDetail;
pub use forms::{DecisionForm, NewAdvertisementForm};
pub use handler::{handle_event, Event};
pub use modes::{Banner, BannerKind, Notification, Screen, Tone};
pub use query::{FilterPatch, FilterState, ListingQuery, PaginationState, SortBy, SortOrder};
pub use state::{ListingSnapshot, ListingState, LISTING_PATH};
