// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Wrapper that adds clock-based TTL expiry to a cache tier.

use std::hash::Hash;
use std::marker::PhantomData;
use std::time::Duration;

use crate::{CacheEntry, CacheTier, Clock};

/// Decorates a cache tier with lazy TTL expiry and insertion-time stamping.
///
/// Expiry is checked on read against the injected [`Clock`]: an entry older
/// than the configured TTL is reported as absent. The TTL is a per-cache
/// constant applied uniformly to every entry. Expired entries are not
/// proactively removed; the tier's capacity eviction handles footprint.
///
/// # Examples
///
/// ```
/// use profilon::{Clock, MemoryTier, TtlCache};
/// use std::time::Duration;
/// # futures::executor::block_on(async {
///
/// let cache = TtlCache::new(
///     "profiles",
///     MemoryTier::<String, i32>::new(),
///     Clock::new_frozen(),
///     Duration::from_secs(60),
/// );
///
/// cache.insert("key".to_string(), 42).await;
/// assert_eq!(cache.get(&"key".to_string()).await, Some(42));
/// # });
/// ```
#[derive(Debug)]
pub struct TtlCache<K, V, S> {
    name: &'static str,
    inner: S,
    clock: Clock,
    ttl: Duration,
    _phantom: PhantomData<(K, V)>,
}

impl<K, V, S> TtlCache<K, V, S>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
    S: CacheTier<K, V>,
{
    /// Creates a cache over the given tier.
    ///
    /// The name identifies the cache in log events.
    pub fn new(name: &'static str, inner: S, clock: Clock, ttl: Duration) -> Self {
        Self {
            name,
            inner,
            clock,
            ttl,
            _phantom: PhantomData,
        }
    }

    /// Returns the name of this cache.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns a reference to the cache's clock.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Returns a reference to the wrapped storage tier.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn is_expired(&self, entry: &CacheEntry<V>) -> bool {
        match entry.cached_at() {
            Some(cached_at) => match self.clock.system_time().duration_since(cached_at) {
                Ok(elapsed) => elapsed > self.ttl,
                // The clock went backwards; treat the entry as expired.
                Err(_) => true,
            },
            // An entry that was never stamped cannot prove its freshness.
            None => true,
        }
    }

    /// Retrieves a fresh value, returning `None` on a miss or expired entry.
    pub async fn get(&self, key: &K) -> Option<V> {
        match self.inner.get(key).await {
            Some(entry) if self.is_expired(&entry) => {
                tracing::trace!(cache = self.name, "expired");
                None
            }
            Some(entry) => {
                tracing::trace!(cache = self.name, "hit");
                Some(entry.into_value())
            }
            None => {
                tracing::trace!(cache = self.name, "miss");
                None
            }
        }
    }

    /// Inserts a value, stamping its insertion time from the cache's clock.
    pub async fn insert(&self, key: K, value: V) {
        let entry = CacheEntry::with_cached_at(value, self.clock.system_time());
        self.inner.insert(key, entry).await;
        tracing::trace!(cache = self.name, "inserted");
    }

    /// Removes the entry for a key, if any.
    pub async fn invalidate(&self, key: &K) {
        self.inner.invalidate(key).await;
        tracing::trace!(cache = self.name, "invalidated");
    }

    /// Removes all entries.
    pub async fn clear(&self) {
        self.inner.clear().await;
    }

    /// Returns the number of entries, if the tier tracks size.
    ///
    /// Expired entries that have not been evicted yet are counted.
    #[must_use]
    pub fn len(&self) -> Option<u64> {
        self.inner.len()
    }

    /// Returns `true` if the cache contains no entries, if the tier tracks size.
    #[must_use]
    pub fn is_empty(&self) -> Option<bool> {
        self.inner.is_empty()
    }
}
