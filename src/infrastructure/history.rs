//! Navigation-history seam for the listing URL.
//!
//! The listing only ever *replaces* the current entry, so typing into the
//! search box never floods back-history.

use std::sync::{Arc, Mutex};

/// Receives the canonical query string of the listing page.
pub trait UrlSink: Send + Sync {
    /// Replaces the current history entry's query (no leading `?`).
    fn replace(&self, query: &str);
}

/// In-memory history used by the terminal binary and by tests.
///
/// Remembers the current query and counts replacements.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    inner: Arc<Mutex<HistoryEntries>>,
}

#[derive(Debug, Default)]
struct HistoryEntries {
    current: String,
    replacements: Vec<String>,
}

impl MemoryHistory {
    #[must_use]
    pub fn new(initial: &str) -> Self {
        let history = Self::default();
        if let Ok(mut entries) = history.inner.lock() {
            entries.current = initial.trim_start_matches('?').to_string();
        }
        history
    }

    /// Current query without the leading `?`.
    #[must_use]
    pub fn current(&self) -> String {
        self.inner
            .lock()
            .map(|entries| entries.current.clone())
            .unwrap_or_default()
    }

    /// Every query passed to [`UrlSink::replace`], oldest first.
    #[must_use]
    pub fn replacements(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|entries| entries.replacements.clone())
            .unwrap_or_default()
    }

    /// Path plus query as it would appear in the address bar.
    #[must_use]
    pub fn location(&self, path: &str) -> String {
        let query = self.current();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{query}")
        }
    }
}

impl UrlSink for MemoryHistory {
    fn replace(&self, query: &str) {
        tracing::debug!(query = %query, "replacing history entry");
        if let Ok(mut entries) = self.inner.lock() {
            entries.current = query.to_string();
            entries.replacements.push(query.to_string());
        }
    }
}
