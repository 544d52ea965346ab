//! Track key to locator recovery map
//!
//! Engines only report track keys. The coordinator remembers which locator
//! produced each key so callers can map telemetry back to a resource.
//! Bounded with LRU eviction so long sessions don't grow without limit.

use crate::locator::{Locator, TrackKey};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Bounded map from [`TrackKey`] to the [`Locator`] it was derived from
#[derive(Debug)]
pub struct UrlKeyMap {
    entries: LruCache<TrackKey, Locator>,
}

impl UrlKeyMap {
    /// Create a map holding at most `capacity` tracks (0 is treated as 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Record a locator, returning its key
    pub fn insert(&mut self, locator: &Locator) -> TrackKey {
        let key = locator.key();
        self.entries.put(key.clone(), locator.clone());
        key
    }

    /// Look up the locator for a key, marking it recently used
    pub fn get(&mut self, key: &TrackKey) -> Option<Locator> {
        self.entries.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
