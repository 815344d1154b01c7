// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-flight population markers: collapses concurrent work on one key into a
//! single execution whose result is shared with every waiter.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Weak};

use parking_lot::Mutex as SyncMutex;
use tokio::sync::Mutex as AsyncMutex;

/// How a caller obtained its result from [`Flight::join`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The caller executed the work itself.
    Performed,
    /// The caller received the result of work another caller executed.
    Joined,
}

type SharedMap<K, T> = Arc<SyncMutex<HashMap<K, FlightHandle<T>>>>;

/// The marker shared by every caller participating in one population.
struct Shared<T> {
    /// Holds the result once some participant has produced it. The populator
    /// executes while holding this lock, so waiters suspend on `lock()` until
    /// the population resolves.
    slot: AsyncMutex<Option<T>>,
}

/// Weak map entry: alive exactly as long as some participant still holds the
/// marker, so a fully-abandoned population never wedges the key.
struct FlightHandle<T> {
    shared: Weak<Shared<T>>,
}

/// Deduplicates concurrent executions per key.
///
/// The first caller to join a key becomes the populator and executes its
/// closure; callers joining while that execution is in flight suspend and
/// receive a clone of the result, errors included. If the populator's future
/// is dropped before it stores a result, the next waiter in line is promoted
/// and executes its own closure, so a cancelled population never starves the
/// waiters or leaves the key locked.
///
/// The marker exists only for the duration of the population: the
/// participant that stores the result removes the map entry.
pub(crate) struct Flight<K, T> {
    map: SharedMap<K, T>,
}

impl<K, T> std::fmt::Debug for Flight<K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flight").finish_non_exhaustive()
    }
}

impl<K, T> Default for Flight<K, T> {
    fn default() -> Self {
        Self {
            map: Arc::default(),
        }
    }
}

impl<K, T> Flight<K, T>
where
    K: Clone + Eq + Hash,
    T: Clone,
{
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Joins the flight for `key`, executing `func` only if no other
    /// participant produces the result first.
    ///
    /// Returns the result along with whether this caller performed the work
    /// or joined an execution already underway.
    pub(crate) fn join<F, Fut>(&self, key: K, func: F) -> impl Future<Output = (T, Outcome)>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let map = Arc::clone(&self.map);
        let shared = {
            let mut mapping = map.lock();
            match mapping.get(&key).and_then(|handle| handle.shared.upgrade()) {
                Some(shared) => shared,
                None => {
                    // No live population for this key (or only a dead handle
                    // left by abandoned callers); start a fresh one.
                    let shared = Arc::new(Shared {
                        slot: AsyncMutex::new(None),
                    });
                    mapping.insert(
                        key.clone(),
                        FlightHandle {
                            shared: Arc::downgrade(&shared),
                        },
                    );
                    shared
                }
            }
        };

        async move {
            let mut slot = shared.slot.lock().await;
            if let Some(value) = slot.as_ref() {
                return (value.clone(), Outcome::Joined);
            }

            // Either we are the first participant to be polled, or every
            // participant ahead of us was cancelled before storing a result.
            let value = func().await;
            *slot = Some(value.clone());
            drop(slot);

            map.lock().remove(&key);
            (value, Outcome::Performed)
        }
    }
}
