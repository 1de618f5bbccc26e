//! Per-front-end-instance caches for compiled component, JSX, and widget
//! subtrees (§5 "Component / JSX / widget-subtree caches").
//!
//! Unlike [`crate::ast_cache::AstCache`], these are owned outright by a
//! single front-end instance: no cross-task sharing, so no lock is needed.
//! Dropping the owning instance drops the cache and everything in it.

use std::hash::Hash;
use std::num::NonZeroUsize;

use lru::LruCache;

/// Default capacity for a per-instance subtree cache.
pub const DEFAULT_MAX_ENTRIES: usize = 256;

/// A bounded, LRU-evicting cache scoped to one front-end instance.
pub struct InstanceCache<K, V>
where
    K: Hash + Eq,
{
    entries: LruCache<K, V>,
}

impl<K, V> InstanceCache<K, V>
where
    K: Hash + Eq,
{
    /// Build a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Build a cache holding at most `max_entries` entries.
    pub fn with_capacity(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Fetch a cached value, touching LRU order on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert or replace a cached value, evicting the least-recently-used
    /// entry if the cache is at capacity.
    pub fn insert(&mut self, key: K, value: V) {
        self.entries.put(key, value);
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry, as happens on instance disposal.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K, V> Default for InstanceCache<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get_roundtrips() {
        let mut cache: InstanceCache<String, u32> = InstanceCache::new();
        cache.insert("node-1".to_string(), 42);
        assert_eq!(cache.get(&"node-1".to_string()), Some(&42));
    }

    #[test]
    fn eviction_respects_capacity() {
        let mut cache: InstanceCache<u32, u32> = InstanceCache::with_capacity(1);
        cache.insert(1, 10);
        cache.insert(2, 20);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&20));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let mut cache: InstanceCache<u32, u32> = InstanceCache::new();
        cache.insert(1, 10);
        cache.clear();
        assert!(cache.is_empty());
    }
}
