//! # Story Cache
//! In-memory, time-bounded cache for aggregate results.
//!
//! Entries carry an idle (sliding) and an absolute expiry. Reads refresh the
//! idle clock; expired entries are evicted on read. All timing goes through
//! `tokio::time::Instant` so tests can pause and advance the clock.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

use crate::model::AggregateResult;

/// The single well-known key under which the newest stories are stored.
pub const STORIES_CACHE_KEY: &str = "hn:new-stories";

/// Expiry policy for one entry. `None` disables that bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheOptions {
    pub sliding: Option<Duration>,
    pub absolute: Option<Duration>,
}

impl CacheOptions {
    /// Sliding and absolute expiry set to the same duration (a flat TTL).
    pub fn ttl(ttl: Duration) -> Self {
        Self {
            sliding: Some(ttl),
            absolute: Some(ttl),
        }
    }
}

#[derive(Debug)]
struct Entry {
    value: AggregateResult,
    inserted_at: Instant,
    last_access: Instant,
    options: CacheOptions,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        let idle = self
            .options
            .sliding
            .is_some_and(|s| now.duration_since(self.last_access) >= s);
        let aged = self
            .options
            .absolute
            .is_some_and(|a| now.duration_since(self.inserted_at) >= a);
        idle || aged
    }
}

/// Thread-safe keyed store. The lock is never held across an `.await`.
#[derive(Debug, Default)]
pub struct StoryCache {
    inner: Mutex<HashMap<String, Entry>>,
}

impl StoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        match self.inner.lock() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        }
    }

    /// Return a live value for `key`, evicting it if it has expired.
    pub fn try_get(&self, key: &str) -> Option<AggregateResult> {
        let now = Instant::now();
        let mut map = self.lock();
        match map.get_mut(key) {
            None => return None,
            Some(entry) if !entry.is_expired(now) => {
                entry.last_access = now;
                return Some(entry.value.clone());
            }
            Some(_) => {}
        }
        map.remove(key);
        tracing::debug!(key, "cache entry expired");
        None
    }

    /// Insert or replace the value for `key`.
    pub fn set(&self, key: &str, value: AggregateResult, options: CacheOptions) {
        let now = Instant::now();
        self.lock().insert(
            key.to_string(),
            Entry {
                value,
                inserted_at: now,
                last_access: now,
                options,
            },
        );
    }

    /// Drop every entry, not only the stories key.
    pub fn clear(&self) {
        let mut map = self.lock();
        let removed = map.len();
        map.clear();
        tracing::debug!(removed, "cache cleared");
    }

    /// Number of entries currently held (expired ones included until read).
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
