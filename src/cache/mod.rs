//! In-memory cache of assembled aggregates
//!
//! Entries are keyed by resource key (scoped by page size for listing pages)
//! and expire lazily: a read older than the TTL behaves as a miss, and the next
//! successful fetch overwrites the stale entry.

mod store;

pub use store::{CacheEntry, CacheKey, CacheStore, DEFAULT_TTL_SECS};
