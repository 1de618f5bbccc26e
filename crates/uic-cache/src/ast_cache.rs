//! AST cache: content-hash keyed, LRU-bounded, TTL-expiring (§5 "AST cache").
//!
//! Shared across front-end instances of the same dialect; a mutex guards
//! mutation and lookups are O(1), matching the registry's in-memory cache
//! store but narrowed to the single "keyed by content hash, fixed TTL"
//! shape this cache needs.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;

use crate::content_hash::ContentHash;

/// Default maximum number of entries (§5: "max entry count (100)").
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Default time-to-live for an entry (§5: "a TTL (60 s)").
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

struct Entry<T> {
    value: T,
    created_at: Instant,
}

/// A bounded, TTL-expiring cache of parsed ASTs (or any other per-source
/// artifact), keyed by [`ContentHash`].
pub struct AstCache<T> {
    entries: Mutex<LruCache<ContentHash, Entry<T>>>,
    ttl: Duration,
}

impl<T> AstCache<T> {
    /// Build a cache with the default capacity and TTL.
    pub fn new() -> Self {
        Self::with_capacity_and_ttl(DEFAULT_MAX_ENTRIES, DEFAULT_TTL)
    }

    /// Build a cache with a custom capacity and TTL.
    pub fn with_capacity_and_ttl(max_entries: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Fetch a cached value, evicting it first if its TTL has elapsed.
    /// Touches LRU order on a hit.
    pub fn get(&self, key: &ContentHash) -> Option<T>
    where
        T: Clone,
    {
        let mut entries = self.entries.lock();
        let expired = match entries.get(key) {
            Some(entry) => entry.created_at.elapsed() > self.ttl,
            None => return None,
        };
        if expired {
            entries.pop(key);
            tracing::debug!(key = %key, "ast cache entry expired");
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Insert or replace a cached value, evicting the least-recently-used
    /// entry synchronously if the cache is at capacity.
    pub fn insert(&self, key: ContentHash, value: T) {
        let mut entries = self.entries.lock();
        entries.put(
            key,
            Entry {
                value,
                created_at: Instant::now(),
            },
        );
    }

    /// Number of entries currently held, including any not yet lazily
    /// expired.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl<T> Default for AstCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_then_miss_after_clear() {
        let cache: AstCache<String> = AstCache::new();
        let key = ContentHash::of("source");
        cache.insert(key.clone(), "parsed".to_string());
        assert_eq!(cache.get(&key), Some("parsed".to_string()));
        cache.clear();
        assert_eq!(cache.get(&key), None);
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache: AstCache<String> =
            AstCache::with_capacity_and_ttl(DEFAULT_MAX_ENTRIES, Duration::from_millis(10));
        let key = ContentHash::of("source");
        cache.insert(key.clone(), "parsed".to_string());
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.get(&key), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn inserting_past_capacity_evicts_lru() {
        let cache: AstCache<u32> = AstCache::with_capacity_and_ttl(2, DEFAULT_TTL);
        let a = ContentHash::of("a");
        let b = ContentHash::of("b");
        let c = ContentHash::of("c");

        cache.insert(a.clone(), 1);
        cache.insert(b.clone(), 2);
        // Touch `a` so `b` becomes least-recently-used.
        assert_eq!(cache.get(&a), Some(1));
        cache.insert(c.clone(), 3);

        assert_eq!(cache.get(&b), None);
        assert_eq!(cache.get(&a), Some(1));
        assert_eq!(cache.get(&c), Some(3));
        assert_eq!(cache.len(), 2);
    }
}
