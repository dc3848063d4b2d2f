//! In-memory response cache keyed by exact user input.
//!
//! Keys are the raw input strings, no normalization: "Bonjour" and
//! "bonjour " are distinct entries. The cache lives as long as its router
//! and is never persisted. By default it is unbounded; a `max_entries`
//! bound enables LRU eviction for long-lived embeddings.

use std::collections::HashMap;

use tracing::debug;

/// A single cached response.
#[derive(Debug, Clone)]
struct CacheEntry {
    response: String,
    /// Logical clock value of the last access, for LRU ordering.
    last_access: u64,
    hit_count: u32,
}

/// Response cache with optional LRU eviction.
///
/// Access order is tracked with a monotonically increasing tick rather than
/// wall-clock time, so eviction order is deterministic under test.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: HashMap<String, CacheEntry>,
    /// 0 means unbounded.
    max_entries: usize,
    tick: u64,
}

impl ResponseCache {
    /// Create an unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache evicting least-recently-used entries beyond
    /// `max_entries`. Zero means unbounded.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            max_entries,
            ..Self::default()
        }
    }

    /// Look up a cached response for `key`. On hit, refreshes the entry's
    /// access time and increments its hit count.
    pub fn get(&mut self, key: &str) -> Option<String> {
        self.tick += 1;
        let tick = self.tick;
        let entry = self.entries.get_mut(key)?;
        entry.last_access = tick;
        entry.hit_count = entry.hit_count.saturating_add(1);
        Some(entry.response.clone())
    }

    /// Store a response under `key`, replacing any previous entry.
    ///
    /// When a capacity bound is set, LRU entries are evicted first so the
    /// insert never exceeds the bound.
    pub fn put(&mut self, key: String, response: String) {
        self.tick += 1;
        if self.max_entries > 0 && !self.entries.contains_key(&key) {
            while self.entries.len() >= self.max_entries {
                self.evict_lru();
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                response,
                last_access: self.tick,
                hit_count: 0,
            },
        );
    }

    /// Remove all entries. Idempotent.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Aggregate statistics snapshot.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            total_hits: self
                .entries
                .values()
                .map(|e| u64::from(e.hit_count))
                .sum(),
        }
    }

    fn evict_lru(&mut self) {
        if let Some(lru_key) = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_access)
            .map(|(k, _)| k.clone())
        {
            debug!(key = %lru_key, "Evicting LRU cache entry");
            self.entries.remove(&lru_key);
        }
    }
}

/// Aggregate cache statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries currently in the cache.
    pub total_entries: usize,
    /// Cumulative number of hits across all entries.
    pub total_hits: u64,
}
