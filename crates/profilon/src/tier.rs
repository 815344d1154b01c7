// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The storage seam for cache backends.

use std::hash::Hash;

use crate::CacheEntry;

/// Trait for cache storage backends.
///
/// Implement this to provide the map behind [`TtlCache`](crate::TtlCache).
/// Tiers are plain storage: expiry decisions and timestamp stamping happen in
/// the wrapping cache, so a tier only stores, returns, and removes entries.
///
/// Only `len` and `is_empty` have default implementations; not every tier
/// tracks its size.
pub trait CacheTier<K, V>: Send + Sync {
    /// Gets the entry stored for a key, if any.
    fn get(&self, key: &K) -> impl Future<Output = Option<CacheEntry<V>>> + Send;

    /// Stores an entry for a key, replacing any previous entry.
    fn insert(&self, key: K, entry: CacheEntry<V>) -> impl Future<Output = ()> + Send;

    /// Removes the entry stored for a key, if any.
    fn invalidate(&self, key: &K) -> impl Future<Output = ()> + Send;

    /// Removes all entries.
    fn clear(&self) -> impl Future<Output = ()> + Send;

    /// Returns the number of entries, if the tier tracks size.
    fn len(&self) -> Option<u64> {
        None
    }

    /// Returns `true` if the tier contains no entries, if it tracks size.
    fn is_empty(&self) -> Option<bool> {
        self.len().map(|len| len == 0)
    }
}

/// An in-memory cache tier backed by moka.
///
/// Provides concurrent access with optional capacity-based eviction
/// (`TinyLFU` policy) for footprint control. Expiry is not configured here:
/// the wrapping [`TtlCache`](crate::TtlCache) applies TTL against its
/// injected clock so tests can control time.
///
/// # Examples
///
/// ```
/// use profilon::{CacheEntry, CacheTier, MemoryTier};
/// # futures::executor::block_on(async {
///
/// let tier = MemoryTier::<String, i32>::new();
/// tier.insert("key".to_string(), CacheEntry::new(42)).await;
/// let entry = tier.get(&"key".to_string()).await;
/// assert_eq!(*entry.unwrap().value(), 42);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MemoryTier<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: moka::future::Cache<K, CacheEntry<V>>,
}

impl<K, V> MemoryTier<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a new unbounded in-memory tier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: moka::future::Cache::builder().build(),
        }
    }

    /// Creates a new in-memory tier that evicts beyond `max_capacity` entries.
    #[must_use]
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            inner: moka::future::Cache::builder().max_capacity(max_capacity).build(),
        }
    }
}

impl<K, V> Default for MemoryTier<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheTier<K, V> for MemoryTier<K, V>
where
    K: Clone + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Option<CacheEntry<V>> {
        self.inner.get(key).await
    }

    async fn insert(&self, key: K, entry: CacheEntry<V>) {
        self.inner.insert(key, entry).await;
    }

    async fn invalidate(&self, key: &K) {
        self.inner.invalidate(key).await;
    }

    async fn clear(&self) {
        self.inner.invalidate_all();
    }

    fn len(&self) -> Option<u64> {
        Some(self.inner.entry_count())
    }
}
