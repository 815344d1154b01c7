// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Cache-aside profile store with stampede control and invalidation on write.
//!
//! This crate serves profile reads through an in-memory cache backed by an
//! external durable store, and serves writes by updating the durable store
//! and invalidating the cached entry:
//!
//! - [`ProfileStore::get`] returns fresh cache hits without touching the
//!   durable store; concurrent misses for one key collapse into a single
//!   fetch shared by every waiter, and negative results are never cached.
//! - [`ProfileStore::update`] writes through the durable store, which is the
//!   authority, then removes the cached entry so the next read repopulates.
//!   A per-key lock keeps populations from racing writes.
//!
//! Collaborators are injected: the [`DurableStore`] client and the [`Clock`]
//! arrive through the builder, and a [`ClockControl`] freezes time in tests
//! so TTL behavior is deterministic.
//!
//! # Examples
//!
//! ```
//! use profilon::{Clock, DurableStore, Profile, ProfileMutation, ProfileStore, StoreError};
//! use std::time::Duration;
//!
//! struct Fixed;
//!
//! impl DurableStore for Fixed {
//!     async fn read(&self, key: &str) -> Result<Option<Profile>, StoreError> {
//!         Ok((key == "u1").then(|| Profile::new("u1", "Ann", "ann@example.com")))
//!     }
//!
//!     async fn write(&self, _key: &str, _mutation: ProfileMutation) -> Result<Option<Profile>, StoreError> {
//!         Err(StoreError::Rejected("read-only".to_string()))
//!     }
//! }
//!
//! # futures::executor::block_on(async {
//! let profiles = ProfileStore::builder(Fixed, Clock::new())
//!     .ttl(Duration::from_secs(60))
//!     .build();
//!
//! let ann = profiles.get("u1").await?.expect("u1 exists");
//! assert_eq!(ann.name, "Ann");
//! # Ok::<(), profilon::Error>(())
//! # });
//! ```

mod cache;
mod clock;
mod entry;
mod error;
mod flight;
mod locks;
mod profile;
mod profiles;
mod store;
mod tier;

pub use cache::TtlCache;
pub use clock::{Clock, ClockControl};
pub use entry::CacheEntry;
pub use error::Error;
pub use profile::{Profile, ProfileMutation};
pub use profiles::{ProfileStore, ProfileStoreBuilder};
pub use store::{DurableStore, StoreError};
pub use tier::{CacheTier, MemoryTier};
