// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared test support: a call-counting in-memory durable store.

#![allow(dead_code, reason = "not every test binary uses every helper")]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use profilon::{Clock, DurableStore, Profile, ProfileMutation, StoreError};
use tokio::sync::Mutex;

/// An in-memory durable store that counts calls and injects failures.
pub struct CountingStore {
    profiles: Mutex<HashMap<String, Profile>>,
    clock: Clock,
    delay: Option<Duration>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl CountingStore {
    pub fn new(clock: Clock) -> Arc<Self> {
        Arc::new(Self {
            profiles: Mutex::new(HashMap::new()),
            clock,
            delay: None,
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        })
    }

    /// Like [`new`](Self::new), but every read holds for `delay` first so
    /// concurrent callers overlap deterministically.
    pub fn with_read_delay(clock: Clock, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            profiles: Mutex::new(HashMap::new()),
            clock,
            delay: Some(delay),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        })
    }

    /// Puts a profile in place directly, bypassing the write path and its
    /// counters. Stands in for an out-of-band creation.
    pub async fn put_profile(&self, profile: Profile) {
        self.profiles.lock().await.insert(profile.id.clone(), profile);
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Acquire)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Acquire)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Release);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Release);
    }
}

impl DurableStore for CountingStore {
    async fn read(&self, key: &str) -> Result<Option<Profile>, StoreError> {
        self.reads.fetch_add(1, Ordering::AcqRel);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_reads.load(Ordering::Acquire) {
            return Err(StoreError::Unavailable("injected outage".to_string()));
        }
        Ok(self.profiles.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, mutation: ProfileMutation) -> Result<Option<Profile>, StoreError> {
        if self.fail_writes.load(Ordering::Acquire) {
            return Err(StoreError::Unavailable("injected outage".to_string()));
        }
        self.writes.fetch_add(1, Ordering::AcqRel);
        let mut profiles = self.profiles.lock().await;
        match profiles.get_mut(key) {
            Some(profile) => {
                mutation.apply(profile);
                profile.updated_at = self.clock.system_time();
                Ok(Some(profile.clone()))
            }
            None => Ok(None),
        }
    }
}

/// The profile most scenarios start from.
pub fn ann() -> Profile {
    Profile::new("u1", "Ann", "ann@example.com")
}

/// A store pre-seeded with Ann under `"u1"`.
pub async fn seeded(clock: Clock) -> Arc<CountingStore> {
    let store = CountingStore::new(clock);
    store.put_profile(ann()).await;
    store
}
