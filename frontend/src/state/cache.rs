use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub key: String,
    pub payload: T,
    pub fetched_at: DateTime<Utc>,
}

/// Memoization keyed by logical query name with a fixed freshness window.
#[derive(Debug)]
pub struct TimedCache<T> {
    ttl: Duration,
    entries: HashMap<String, CacheEntry<T>>,
}

impl<T: Clone> TimedCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Payload for `key` when it was fetched less than `ttl` ago.
    pub fn get_fresh(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        self.entries
            .get(key)
            .filter(|entry| now - entry.fetched_at < self.ttl)
            .map(|entry| entry.payload.clone())
    }

    pub fn insert(&mut self, key: impl Into<String>, payload: T, now: DateTime<Utc>) {
        let key = key.into();
        self.entries.insert(
            key.clone(),
            CacheEntry {
                key,
                payload,
                fetched_at: now,
            },
        );
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
