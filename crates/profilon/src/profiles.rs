// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The cache-aside profile store.

use std::time::Duration;

use crate::flight::{Flight, Outcome};
use crate::locks::KeyLocks;
use crate::{Clock, DurableStore, Error, MemoryTier, Profile, ProfileMutation, StoreError, TtlCache};

/// Serves profile reads through a TTL cache and writes through the durable
/// store, keeping the two consistent.
///
/// Reads check the cache first; a fresh hit never touches the durable store.
/// Concurrent misses for one key collapse into a single durable fetch whose
/// result, success or failure, reaches every waiter. Writes go to the
/// durable store and invalidate the cached entry; a per-key lock serializes
/// each key's populations against its writes, so a read taken before a write
/// can never be installed after it.
///
/// The store takes its collaborators by constructor injection: the durable
/// store client and the clock arrive through [`builder`](Self::builder), and
/// both are chosen by the caller.
///
/// # Examples
///
/// ```
/// use profilon::{Clock, DurableStore, Profile, ProfileMutation, ProfileStore, StoreError};
/// use std::time::Duration;
///
/// struct Fixed;
///
/// impl DurableStore for Fixed {
///     async fn read(&self, key: &str) -> Result<Option<Profile>, StoreError> {
///         Ok((key == "u1").then(|| Profile::new("u1", "Ann", "ann@example.com")))
///     }
///
///     async fn write(&self, _key: &str, _mutation: ProfileMutation) -> Result<Option<Profile>, StoreError> {
///         Err(StoreError::Rejected("read-only".to_string()))
///     }
/// }
///
/// # futures::executor::block_on(async {
/// let profiles = ProfileStore::builder(Fixed, Clock::new_frozen())
///     .ttl(Duration::from_secs(60))
///     .build();
///
/// let ann = profiles.get("u1").await?.expect("u1 exists");
/// assert_eq!(ann.name, "Ann");
///
/// // Absence is an outcome, not an error, and is never cached.
/// assert!(profiles.get("nobody").await?.is_none());
/// # Ok::<(), profilon::Error>(())
/// # });
/// ```
pub struct ProfileStore<S> {
    store: S,
    cache: TtlCache<String, Profile, MemoryTier<String, Profile>>,
    flight: Flight<String, Result<Option<Profile>, StoreError>>,
    locks: KeyLocks<String>,
}

impl<S> std::fmt::Debug for ProfileStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileStore")
            .field("cache", &self.cache.name())
            .finish_non_exhaustive()
    }
}

impl<S> ProfileStore<S>
where
    S: DurableStore,
{
    /// Creates a builder wiring the store to its collaborators.
    #[must_use]
    pub fn builder(store: S, clock: Clock) -> ProfileStoreBuilder<S> {
        ProfileStoreBuilder {
            store,
            clock,
            name: "profiles",
            ttl: ProfileStoreBuilder::<S>::DEFAULT_TTL,
            capacity: None,
        }
    }

    /// Returns a reference to the durable-store client.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the cache layer.
    #[must_use]
    pub fn cache(&self) -> &TtlCache<String, Profile, MemoryTier<String, Profile>> {
        &self.cache
    }

    /// Reads the profile for a key through the cache.
    ///
    /// A fresh cached snapshot is returned without touching the durable
    /// store. On a miss or expired entry, exactly one concurrent caller
    /// fetches from the durable store and installs the result; everyone else
    /// suspends until that population resolves and shares its result.
    /// `Ok(None)` (no such profile) is never cached, so a subsequent
    /// creation is immediately visible.
    ///
    /// # Errors
    ///
    /// - [`Error::Store`] if this caller performed the durable fetch and it
    ///   failed.
    /// - [`Error::PopulationFailed`] if the fetch this caller was waiting on
    ///   failed; the content is exactly the error the populator saw. The
    ///   marker is cleared either way, so the next caller may retry.
    pub async fn get(&self, key: &str) -> Result<Option<Profile>, Error> {
        let key = key.to_owned();

        // Fast path; never suspends on anything but the cache map itself.
        if let Some(profile) = self.cache.get(&key).await {
            return Ok(Some(profile));
        }

        let (result, outcome) = self
            .flight
            .join(key.clone(), || self.populate(key.clone()))
            .await;

        match (result, outcome) {
            (Ok(profile), _) => Ok(profile),
            (Err(err), Outcome::Performed) => Err(Error::Store(err)),
            (Err(err), Outcome::Joined) => Err(Error::PopulationFailed(err)),
        }
    }

    /// Applies a mutation through the durable store and invalidates the
    /// cached entry.
    ///
    /// The durable write is the authoritative update. On success the cache
    /// entry is removed, never updated in place, so the next read
    /// repopulates from the store and read-your-writes holds. The key lock
    /// held across write-and-invalidate keeps any concurrent population from
    /// installing a pre-write snapshot after the invalidation.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the store has no profile for the key.
    /// - [`Error::Store`] if the durable write fails; the cache is left
    ///   untouched and no partial state is visible.
    pub async fn update(&self, key: &str, mutation: ProfileMutation) -> Result<Profile, Error> {
        let key = key.to_owned();
        let _guard = self.locks.lock(&key).await;

        let written = self.store.write(&key, mutation).await?;
        let Some(profile) = written else {
            return Err(Error::NotFound { key });
        };

        self.cache.invalidate(&key).await;
        tracing::debug!(%key, "profile updated, cache entry invalidated");
        Ok(profile)
    }

    /// Fetches a profile from the durable store and installs it in the cache.
    ///
    /// Runs as the single populator for its key. The key lock excludes a
    /// concurrent `update`, and the cache is re-checked under the lock in
    /// case a population or write completed while this caller waited for it.
    async fn populate(&self, key: String) -> Result<Option<Profile>, StoreError> {
        let _guard = self.locks.lock(&key).await;

        if let Some(profile) = self.cache.get(&key).await {
            return Ok(Some(profile));
        }

        tracing::debug!(%key, "populating profile from durable store");
        let fetched = self.store.read(&key).await?;
        if let Some(profile) = &fetched {
            self.cache.insert(key, profile.clone()).await;
        }
        Ok(fetched)
    }
}

/// Builder for [`ProfileStore`].
///
/// Created by [`ProfileStore::builder`].
#[derive(Debug)]
pub struct ProfileStoreBuilder<S> {
    store: S,
    clock: Clock,
    name: &'static str,
    ttl: Duration,
    capacity: Option<u64>,
}

impl<S> ProfileStoreBuilder<S>
where
    S: DurableStore,
{
    /// Cached snapshots are served for five minutes unless configured.
    const DEFAULT_TTL: Duration = Duration::from_secs(300);

    /// Sets the cache name used in log events.
    #[must_use]
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Sets how long a cached snapshot stays fresh.
    ///
    /// The TTL is a per-store constant applied uniformly to every entry and
    /// checked lazily on read.
    #[must_use]
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Bounds the cache's footprint to at most `max_capacity` entries.
    ///
    /// Unbounded by default; expired entries then linger until replaced.
    #[must_use]
    pub fn capacity(mut self, max_capacity: u64) -> Self {
        self.capacity = Some(max_capacity);
        self
    }

    /// Builds the profile store.
    #[must_use]
    pub fn build(self) -> ProfileStore<S> {
        let tier = match self.capacity {
            Some(max) => MemoryTier::with_capacity(max),
            None => MemoryTier::new(),
        };
        ProfileStore {
            store: self.store,
            cache: TtlCache::new(self.name, tier, self.clock, self.ttl),
            flight: Flight::new(),
            locks: KeyLocks::new(),
        }
    }
}
