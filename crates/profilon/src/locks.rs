// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Per-key async locks serializing populations against writes.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Weak};

use parking_lot::Mutex as SyncMutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// A map of per-key async mutexes.
///
/// Holding a key's lock makes a population's read-then-insert and an update's
/// write-then-invalidate mutually exclusive for that key, so a population
/// working from a pre-write read can never install its entry after the
/// write's invalidation. Operations on different keys share nothing.
///
/// Lock handles are weakly held: once the last guard for a key drops, the
/// mutex is freed and the map entry is reclaimed on a later pass. Idle keys
/// leave no residue.
pub(crate) struct KeyLocks<K> {
    map: SyncMutex<HashMap<K, Weak<AsyncMutex<()>>>>,
}

impl<K> std::fmt::Debug for KeyLocks<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyLocks").finish_non_exhaustive()
    }
}

impl<K> Default for KeyLocks<K> {
    fn default() -> Self {
        Self {
            map: SyncMutex::new(HashMap::new()),
        }
    }
}

impl<K> KeyLocks<K>
where
    K: Clone + Eq + Hash,
{
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for `key`, suspending while another task holds it.
    pub(crate) async fn lock(&self, key: &K) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut map = self.map.lock();
            match map.get(key).and_then(Weak::upgrade) {
                Some(existing) => existing,
                None => {
                    let created = Arc::new(AsyncMutex::new(()));
                    // Sweep entries whose locks have been dropped so the map
                    // stays proportional to the set of active keys.
                    map.retain(|_, handle| handle.strong_count() > 0);
                    map.insert(key.clone(), Arc::downgrade(&created));
                    created
                }
            }
        };
        mutex.lock_owned().await
    }
}
