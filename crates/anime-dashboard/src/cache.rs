//! Short-lived cache for autosuggest results.
//!
//! Entries are keyed by the normalized query and expire after a fixed TTL.
//! Expired entries are evicted lazily on the next lookup for that key.

use shared::Suggestion;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Cached suggestion list with its insertion time
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub suggestions: Vec<Suggestion>,
    pub inserted_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.inserted_at) < ttl
    }
}

/// In-memory TTL cache for query -> suggestions
#[derive(Debug)]
pub struct SuggestionCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
}

impl SuggestionCache {
    /// Create a new cache whose entries live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Normalize a query into its cache key
    ///
    /// Trims, collapses inner whitespace and lowercases, so "  Naruto " and
    /// "naruto" share an entry.
    pub fn normalize(query: &str) -> String {
        query
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Get a fresh cached list, evicting the entry if it has expired
    pub fn get(&mut self, query: &str) -> Option<Vec<Suggestion>> {
        let key = Self::normalize(query);
        let now = Instant::now();

        match self.entries.get(&key) {
            Some(entry) if entry.is_fresh(now, self.ttl) => {
                debug!(key = %key, "Suggestion cache hit");
                Some(entry.suggestions.clone())
            }
            Some(_) => {
                debug!(key = %key, "Suggestion cache entry expired");
                self.entries.remove(&key);
                None
            }
            None => {
                debug!(key = %key, "Suggestion cache miss");
                None
            }
        }
    }

    /// Store a list, replacing any previous entry for the query
    pub fn insert(&mut self, query: &str, suggestions: Vec<Suggestion>) {
        let key = Self::normalize(query);
        self.entries.insert(
            key,
            CacheEntry {
                suggestions,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Return cached suggestions for `query`, or call `fetch` and cache its result
    ///
    /// `fetch` receives the normalized query. An empty query yields an empty
    /// list without calling `fetch`. Errors from `fetch` are returned as-is
    /// and nothing is cached.
    pub async fn get_or_fetch<F, Fut, E>(&mut self, query: &str, fetch: F) -> Result<Vec<Suggestion>, E>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<Vec<Suggestion>, E>>,
    {
        let key = Self::normalize(query);
        if key.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(cached) = self.get(&key) {
            return Ok(cached);
        }

        let suggestions = fetch(key.clone()).await?;
        debug!(key = %key, count = suggestions.len(), "Suggestion cache stored");
        self.insert(&key, suggestions.clone());

        Ok(suggestions)
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now, ttl));
        before - self.entries.len()
    }

    /// Clear all cache
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
