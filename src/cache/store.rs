//! Cache Store Module
//!
//! Main cache engine combining a key index with the arena-backed recency list.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use tracing::debug;

use crate::cache::lru::MAX_PREALLOCATED;
use crate::cache::{CacheStats, Entry, ListIter, NodeId, RecencyList};
use crate::config::CacheConfig;
use crate::error::{Error, Result};

// == LRU Cache ==
/// Fixed-capacity key/value cache with least-recently-used eviction.
///
/// `get` and `put` are O(1): the index maps each key straight to its node in
/// the recency list, so no operation ever scans the list.
///
/// The cache has no internal locking. Owners sharing it between threads wrap
/// the whole cache in a mutex.
#[derive(Debug)]
pub struct LruCache<K, V> {
    /// Key to recency-list node
    index: HashMap<K, NodeId>,
    /// Entries ordered from most to least recently used
    order: RecencyList<Entry<K, V>>,
    stats: CacheStats,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// Storage for large capacities is allocated as entries arrive.
    ///
    /// # Errors
    /// Returns [`Error::InvalidCacheCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCacheCapacity(capacity));
        }
        debug!(capacity, "LRU cache created");
        Ok(Self {
            index: HashMap::with_capacity(capacity.min(MAX_PREALLOCATED)),
            order: RecencyList::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
        })
    }

    // == From Config ==
    /// Creates a cache from validated settings.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.capacity)
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    ///
    /// A miss returns None and leaves the order untouched.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&id) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };
        self.stats.record_hit();
        self.order.move_to_front(id);
        self.order.get(id).map(|entry| &entry.value)
    }

    // == Put ==
    /// Stores `value` under `key` and marks it most recently used.
    ///
    /// Overwriting an existing key updates the value in place and never
    /// evicts. Inserting a new key into a full cache first evicts the least
    /// recently used entry.
    pub fn put(&mut self, key: K, value: V) {
        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.order.get_mut(id) {
                entry.replace(value);
            }
            self.order.move_to_front(id);
            return;
        }

        if self.index.len() >= self.capacity {
            self.evict_lru();
        }

        let id = self.order.push_front(Entry::new(key.clone(), value));
        self.index.insert(key, id);
    }

    // == Peek ==
    /// Returns the value for `key` without touching recency or stats.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.index.get(key)?;
        self.order.get(*id).map(|entry| &entry.value)
    }

    // == Contains ==
    /// Checks if `key` is cached without touching recency or stats.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    // == Peek LRU ==
    /// Returns the entry that the next overflow would evict.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.order.back().map(|entry| (&entry.key, &entry.value))
    }

    // == Remove ==
    /// Removes `key` and returns its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.index.remove(key)?;
        self.order.remove(id).map(|entry| entry.value)
    }

    // == Clear ==
    /// Drops every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.index.len(),
            ..self.stats
        }
    }

    // == Iter ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.order.iter(),
        }
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.order.len() == 0
    }

    // == Capacity ==
    /// Returns the maximum number of entries, fixed at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn evict_lru(&mut self) {
        if let Some(evicted) = self.order.pop_back() {
            self.index.remove(&evicted.key);
            self.stats.record_eviction();
            debug!(
                entries = self.index.len(),
                capacity = self.capacity,
                "evicted least recently used entry"
            );
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        self.order.assert_linked();
        assert_eq!(self.index.len(), self.order.len());
        assert!(self.index.len() <= self.capacity);
        for (key, id) in &self.index {
            let entry = self.order.get(*id).expect("indexed node is live");
            assert!(entry.key == *key, "index points at the wrong node");
        }
    }
}

// == Iterator ==
/// Iterator over `(key, value)` pairs, most recently used first.
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    inner: ListIter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| (&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
