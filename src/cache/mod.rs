//! In-process TTL cache for weather responses
//!
//! Entries are never served after their TTL has elapsed. Expired entries are
//! evicted lazily when they are read, or all at once with
//! [`ResponseCache::purge_expired`]; nothing runs in the background.
//!
//! The map lives behind a [`parking_lot::RwLock`], so lookups from many
//! threads proceed in parallel while writers get exclusive access. There is
//! no single-flight guarantee: when two callers miss on the same key and
//! both `put`, the later write wins.

mod clock;
mod key;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::{COORDINATE_PRECISION, CacheKey};

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A stored value with its timestamps
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    /// `None` when the TTL is too large to represent
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn new(value: V, inserted_at: Instant, ttl: Duration) -> Self {
        Self {
            value,
            inserted_at,
            expires_at: inserted_at.checked_add(ttl),
        }
    }

    /// True while `now` is strictly before the expiry instant
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at)
    }
}

/// Thread-safe TTL cache keyed by [`CacheKey`]
pub struct ResponseCache<V> {
    entries: RwLock<HashMap<CacheKey, CacheEntry<V>>>,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V> fmt::Debug for ResponseCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCache")
            .field("entries", &self.entries.read().len())
            .field("default_ttl", &self.default_ttl)
            .field("clock", &self.clock)
            .finish()
    }
}

impl<V: Clone> ResponseCache<V> {
    /// Cache on the system clock
    #[must_use]
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
            clock,
        }
    }

    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Fresh value for `key`, evicting it if it has expired
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self), fields(key = %key))]
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        self.get_at(key, self.clock.now())
    }

    /// [`get`](Self::get) as of an explicit instant
    pub fn get_at(&self, key: &CacheKey, now: Instant) -> Option<V> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => {
                    tracing::debug!("Key not found");
                    return None;
                }
                Some(entry) if entry.is_fresh(now) => {
                    let age = now.saturating_duration_since(entry.inserted_at);
                    tracing::debug!(age_secs = age.as_secs(), "Key found and still fresh");
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        // A writer may have refreshed the entry between the two locks
        let mut entries = self.entries.write();
        match entries.get(key) {
            Some(entry) if entry.is_fresh(now) => Some(entry.value.clone()),
            Some(_) => {
                tracing::debug!("Key found but expired");
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `value` under `key`, replacing any previous entry
    #[tracing::instrument(
        name = "put_cache",
        level = "debug",
        skip(self, value),
        fields(key = %key)
    )]
    pub fn put(&self, key: CacheKey, value: V, ttl: Duration) {
        self.put_at(key, value, ttl, self.clock.now());
    }

    /// [`put`](Self::put) as of an explicit instant
    pub fn put_at(&self, key: CacheKey, value: V, ttl: Duration, now: Instant) {
        self.entries
            .write()
            .insert(key, CacheEntry::new(value, now, ttl));
    }

    /// Store `value` with the default TTL
    pub fn insert(&self, key: CacheKey, value: V) {
        self.put(key, value, self.default_ttl);
    }

    /// Number of stored entries, including expired ones not yet evicted
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Drop every expired entry and return how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, "Purged expired cache entries");
        }
        removed
    }
}
