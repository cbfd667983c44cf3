//! marketmod: a terminal moderation console for a classified-ads marketplace.
//!
//! marketmod talks to the marketplace REST API and provides:
//! - A filterable, sortable, paginated advertisement listing whose state is
//!   mirrored into a URL query string and restored from it
//! - Debounced search and cancellable fetches where only the newest response
//!   is ever applied
//! - An advertisement detail view with approve, reject and request-changes
//!   decisions
//! - Reviewer statistics with client-side derived charts

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Console front end (main.rs)                        │  ← stdin commands
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, actions, query/URL state         │
//! │  - Listing actor, detail and stats controllers      │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ API Layer     │   │ Infrastructure│
//! │ (ui/)         │   │ (api/)        │   │ (infra../)    │
//! │ - Rendering   │   │ - Transport   │   │ - Query codec │
//! │ - Theming     │   │ - Endpoints   │   │ - URL history │
//! │ - Components  │   │ - Mock        │   │ - Paths       │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/): advertisements, stats, errors     │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry tracing to rotating OTLP JSON      │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Listing state machine, controllers and view model computation
//! - [`api`]: REST client, transports and the scripted mock transport
//! - [`domain`]: Advertisement, listing and statistics types; errors
//! - [`infrastructure`]: Query-string codec, URL history, platform paths
//! - [`ui`]: Terminal rendering with theme support
//! - [`observability`]: OpenTelemetry tracing
//!
//! # Configuration
//!
//! Read from `$XDG_CONFIG_HOME/marketmod/config.toml` when present:
//!
//! ```toml
//! api_base_url = "http://localhost:3001/api/v1"
//! items_per_page = 20
//! search_debounce_ms = 500
//! request_timeout_secs = 10
//! theme = "catppuccin-latte"
//! trace_level = "debug"
//! ```
//!
//! `MARKETMOD_API_URL`, `MARKETMOD_TRACE_LEVEL`, `MARKETMOD_THEME` and
//! `MARKETMOD_ITEMS_PER_PAGE` override the file.
//!
//! # Example
//!
//! ```rust,no_run
//! use marketmod::api::{ApiClient, HttpTransport};
//! use marketmod::app::ListingController;
//! use marketmod::infrastructure::MemoryHistory;
//! use marketmod::{initialize, Config};
//! use std::sync::Arc;
//!
//! # async fn demo() -> marketmod::Result<()> {
//! let config = Config::default();
//! let (state, _theme) = initialize(&config);
//! let client = Arc::new(config.http_client()?);
//! let history = Arc::new(MemoryHistory::new("?page=2"));
//!
//! let listing = ListingController::spawn(client, history, state, "?page=2");
//! listing.search_input("велосипед")?;
//! let mut snapshots = listing.subscribe();
//! snapshots.changed().await.ok();
//! println!("{} rows", snapshots.borrow().items.len());
//! listing.unmount().await;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod ui;

pub use app::{handle_event, Action, Event, ListingController, ListingSnapshot, ListingState};
pub use domain::{MarketmodError, Result};
pub use ui::Theme;

use api::{ApiClient, HttpTransport};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api/v1";
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Console configuration.
///
/// Every source is fail-open per field: an invalid value falls back to its
/// default instead of rejecting the whole configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the REST API, including the version prefix.
    ///
    /// Default: `http://localhost:3001/api/v1`
    pub api_base_url: String,

    /// Page size used when the URL does not specify one. Default: 10
    pub items_per_page: u32,

    /// Quiet period before typed search text is committed. Default: 500
    pub search_debounce_ms: u64,

    /// Per-request timeout; an expired request is reported as a connection
    /// error. Default: 10
    pub request_timeout_secs: u64,

    /// Built-in theme name, `catppuccin-mocha` or `catppuccin-latte`.
    ///
    /// Ignored if `theme_file` is set.
    #[serde(rename = "theme")]
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. See [`ui::theme`] for the format.
    pub theme_file: Option<String>,

    /// Tracing level, e.g. `debug` or `marketmod=trace`. Default: `info`
    ///
    /// Setting it also mirrors events to stderr.
    pub trace_level: Option<String>,

    /// Directory for the OTLP trace file. Default: the data directory.
    pub trace_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            items_per_page: app::query::DEFAULT_ITEMS_PER_PAGE,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            theme_name: None,
            theme_file: None,
            trace_level: None,
            trace_dir: None,
        }
    }
}

impl Config {
    /// Parses configuration from a string map, such as `key=value` pairs
    /// collected from the command line.
    ///
    /// # Parsing Rules
    ///
    /// - `api_base_url`: non-empty string, trailing `/` removed
    /// - `items_per_page`: positive integer
    /// - `search_debounce_ms`, `request_timeout_secs`: non-negative integers
    /// - `theme`, `theme_file`, `trace_level`, `trace_dir`: strings
    ///
    /// Anything else falls back to the default.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use marketmod::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("items_per_page".to_string(), "20".to_string());
    /// map.insert("search_debounce_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.items_per_page, 20);
    /// assert_eq!(config.search_debounce_ms, 500);
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        Self::default().with_map(config)
    }

    /// Applies the values present in `config` on top of `self`, with the
    /// same rules as [`Config::from_map`].
    #[must_use]
    pub fn with_map(self, config: &BTreeMap<String, String>) -> Self {
        self.with_overrides(|key| config.get(key).cloned())
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`MarketmodError::Io`] if the file cannot be read, or
    /// [`MarketmodError::Config`] if it is not valid TOML or sets
    /// `items_per_page` to 0.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self =
            toml::from_str(&contents).map_err(|e| MarketmodError::Config(e.to_string()))?;

        if config.items_per_page == 0 {
            return Err(MarketmodError::Config("items_per_page must be positive".to_string()));
        }
        config.api_base_url = normalize_base_url(&config.api_base_url)
            .ok_or_else(|| MarketmodError::Config("api_base_url must not be empty".to_string()))?;
        Ok(config)
    }

    /// Applies `MARKETMOD_*` environment variables.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| {
            let var = format!("MARKETMOD_{}", env_suffix(key));
            std::env::var(var).ok()
        })
    }

    fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            api_base_url: lookup("api_base_url")
                .and_then(|url| normalize_base_url(&url))
                .unwrap_or(self.api_base_url),
            items_per_page: lookup("items_per_page")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|&n| n > 0)
                .unwrap_or(self.items_per_page),
            search_debounce_ms: parsed("search_debounce_ms").unwrap_or(self.search_debounce_ms),
            request_timeout_secs: parsed("request_timeout_secs").unwrap_or(self.request_timeout_secs),
            theme_name: lookup("theme").or(self.theme_name),
            theme_file: lookup("theme_file").or(self.theme_file),
            trace_level: lookup("trace_level").or(self.trace_level),
            trace_dir: lookup("trace_dir").or(self.trace_dir),
        }
    }

    #[must_use]
    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Builds an API client over HTTP for `api_base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketmodError::Config`] if the HTTP client cannot be built.
    pub fn http_client(&self) -> Result<ApiClient<HttpTransport>> {
        let transport = HttpTransport::new(&self.api_base_url, self.request_timeout())?;
        Ok(ApiClient::new(transport, self.api_base_url.clone()))
    }
}

fn normalize_base_url(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// `api_base_url` → `API_URL`, other keys upper-cased.
fn env_suffix(key: &str) -> String {
    match key {
        "api_base_url" => "API_URL".to_string(),
        _ => key.to_ascii_uppercase(),
    }
}

/// Builds the initial listing state and loads the theme.
///
/// Theme resolution is fail-open: `theme_file`, then `theme`, then the
/// default; a theme that fails to load is logged and replaced by the default.
///
/// # Example
///
/// ```rust
/// use marketmod::{initialize, Config};
///
/// let (state, theme) = initialize(&Config::default());
/// assert_eq!(state.query.pagination.items_per_page, 10);
/// assert_eq!(theme.name, "catppuccin-mocha");
/// ```
#[must_use]
pub fn initialize(config: &Config) -> (ListingState, Theme) {
    tracing::debug!(api_base_url = %config.api_base_url, "initializing marketmod");

    let theme = config.theme_file.as_ref().map_or_else(
        || {
            config.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
                Theme::from_name(theme_name).unwrap_or_else(|| {
                    tracing::warn!(theme_name = %theme_name, "unknown theme, using default");
                    Theme::default()
                })
            })
        },
        |theme_file| {
            Theme::from_file(infrastructure::expand_tilde(theme_file)).unwrap_or_else(|e| {
                tracing::warn!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            })
        },
    );

    let state = ListingState::new(config.items_per_page, config.search_debounce());
    (state, theme)
}
