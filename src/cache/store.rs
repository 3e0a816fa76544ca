//! TTL cache store for assembled aggregates
//!
//! Provides a `CacheStore` that keeps one entry per key together with the time
//! it was fetched, and treats entries older than the TTL as absent.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::data::{Aggregate, ResourceKey};

/// Default time-to-live for cached aggregates (5 minutes)
pub const DEFAULT_TTL_SECS: i64 = 300;

/// Cache key: a resource key plus the page size it was fetched with
///
/// Only `Page` keys carry a page size, so changing the page size opens a fresh
/// namespace for pages while generation and lookup entries stay reachable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub resource: ResourceKey,
    pub page_size: Option<u32>,
}

impl CacheKey {
    pub fn scoped(resource: ResourceKey, page_size: u32) -> Self {
        let page_size = match resource {
            ResourceKey::Page(_) => Some(page_size),
            _ => None,
        };
        Self {
            resource,
            page_size,
        }
    }
}

/// A cached aggregate
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub aggregate: Aggregate,
    /// When the fetch producing this aggregate was launched
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.fetched_at) < ttl
    }
}

/// Keyed memo of aggregates with lazy TTL expiry
///
/// One store lives for the whole navigation session; nothing is ever evicted,
/// stale entries are simply ignored on read and overwritten on the next write.
#[derive(Debug, Clone)]
pub struct CacheStore {
    entries: HashMap<CacheKey, CacheEntry>,
    ttl: Duration,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}

impl CacheStore {
    /// Creates an empty store with the given TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the entry for `key` if it is younger than the TTL at `now`
    pub fn get(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<&CacheEntry> {
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
    }

    /// Stores `aggregate` under `key`, replacing any previous entry
    pub fn put(&mut self, key: CacheKey, aggregate: Aggregate, now: DateTime<Utc>) {
        let entry = CacheEntry {
            key: key.clone(),
            aggregate,
            fetched_at: now,
        };
        self.entries.insert(key, entry);
    }

    /// Number of stored entries, stale ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
