//! Console rendering layer with component-based architecture.
//!
//! Transforms view models into ANSI-styled text through composable
//! components. Provides theme support, character-width aware layout and
//! search match highlighting.
//!
//! # Architecture
//!
//! ```text
//! ListingSnapshot / AdvertisementDetail / StatsDashboard
//!        → compute_viewmodel → *ViewModel → components → ANSI text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable state
//! - [`renderer`]: Per-screen rendering entry points
//! - [`components`]: Composable component renderers
//! - [`helpers`]: Shared rendering utilities (highlighting, padding, bars)
//! - [`theme`]: Color scheme definitions and ANSI escape sequences

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::{render_detail, render_listing, render_stats};
pub use theme::Theme;
pub use viewmodel::{
    DetailViewModel, DisplayItem, EmptyState, FooterInfo, HeaderInfo, ListingViewModel, SearchBarInfo,
    StatsViewModel,
};
