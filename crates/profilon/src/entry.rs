// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! A cached value with its insertion timestamp.

use std::ops::Deref;
use std::time::SystemTime;

/// A cached snapshot of a value.
///
/// Entries record when they were inserted; the cache compares that timestamp
/// against its configured TTL on every read. The snapshot is a disposable
/// copy; the durable store owns the authoritative value.
///
/// # Examples
///
/// ```
/// use profilon::CacheEntry;
///
/// let entry = CacheEntry::new(42);
/// assert_eq!(*entry.value(), 42);
/// assert!(entry.cached_at().is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry<V> {
    value: V,
    cached_at: Option<SystemTime>,
}

impl<V> CacheEntry<V> {
    /// Creates an entry with no insertion timestamp.
    ///
    /// The cache stamps the timestamp when the entry is inserted.
    pub fn new(value: V) -> Self {
        Self {
            value,
            cached_at: None,
        }
    }

    /// Creates an entry with an explicit insertion timestamp.
    pub fn with_cached_at(value: V, cached_at: SystemTime) -> Self {
        Self {
            value,
            cached_at: Some(cached_at),
        }
    }

    /// When this entry was inserted, if it has been inserted.
    #[must_use]
    pub fn cached_at(&self) -> Option<SystemTime> {
        self.cached_at
    }

    /// Returns a reference to the cached value.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Consumes the entry and returns the inner value.
    #[must_use]
    pub fn into_value(self) -> V {
        self.value
    }
}

impl<V> Deref for CacheEntry<V> {
    type Target = V;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<V> From<V> for CacheEntry<V> {
    fn from(value: V) -> Self {
        Self::new(value)
    }
}
