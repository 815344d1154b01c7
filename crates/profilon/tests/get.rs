// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for the read path: hits, misses, TTL, and negatives.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{CountingStore, ann, seeded};
use profilon::{Clock, ClockControl, Error, Profile, ProfileStore, StoreError};

fn profiles(
    store: Arc<CountingStore>,
    clock: Clock,
    ttl: Duration,
) -> ProfileStore<Arc<CountingStore>> {
    ProfileStore::builder(store, clock).ttl(ttl).build()
}

#[tokio::test]
async fn first_get_populates_then_hits() {
    let clock = Clock::new_frozen();
    let store = seeded(clock.clone()).await;
    let profiles = profiles(Arc::clone(&store), clock, Duration::from_secs(60));

    let first = profiles.get("u1").await.unwrap().unwrap();
    assert_eq!(first.name, "Ann");
    assert_eq!(store.read_count(), 1);

    let second = profiles.get("u1").await.unwrap().unwrap();
    assert_eq!(second.name, "Ann");
    assert_eq!(store.read_count(), 1, "a fresh hit must not touch the durable store");
}

#[tokio::test]
async fn absent_profile_is_none_not_error() {
    let clock = Clock::new_frozen();
    let store = CountingStore::new(clock.clone());
    let profiles = profiles(Arc::clone(&store), clock, Duration::from_secs(60));

    assert!(profiles.get("nobody").await.unwrap().is_none());
    assert_eq!(store.read_count(), 1);
}

#[tokio::test]
async fn negative_results_are_not_cached() {
    let clock = Clock::new_frozen();
    let store = CountingStore::new(clock.clone());
    let profiles = profiles(Arc::clone(&store), clock, Duration::from_secs(60));

    assert!(profiles.get("u2").await.unwrap().is_none());
    assert_eq!(store.read_count(), 1);

    // The profile is created out of band; the very next get must see it.
    store.put_profile(Profile::new("u2", "Beth", "beth@example.com")).await;
    let found = profiles.get("u2").await.unwrap().unwrap();
    assert_eq!(found.name, "Beth");
    assert_eq!(store.read_count(), 2);
}

#[tokio::test]
async fn entry_is_fresh_just_before_ttl() {
    let control = ClockControl::new();
    let store = seeded(control.to_clock()).await;
    let profiles = profiles(Arc::clone(&store), control.to_clock(), Duration::from_secs(60));

    profiles.get("u1").await.unwrap().unwrap();
    assert_eq!(store.read_count(), 1);

    control.advance(Duration::from_secs(59));
    profiles.get("u1").await.unwrap().unwrap();
    assert_eq!(store.read_count(), 1, "t0 + T - epsilon must still be a hit");
}

#[tokio::test]
async fn entry_expires_just_after_ttl() {
    let control = ClockControl::new();
    let store = seeded(control.to_clock()).await;
    let profiles = profiles(Arc::clone(&store), control.to_clock(), Duration::from_secs(60));

    profiles.get("u1").await.unwrap().unwrap();
    assert_eq!(store.read_count(), 1);

    control.advance(Duration::from_secs(61));
    profiles.get("u1").await.unwrap().unwrap();
    assert_eq!(store.read_count(), 2, "t0 + T + epsilon must refetch");
}

#[tokio::test]
async fn expired_entry_repopulates_with_current_value() {
    let control = ClockControl::new();
    let store = seeded(control.to_clock()).await;
    let profiles = profiles(Arc::clone(&store), control.to_clock(), Duration::from_secs(60));

    assert_eq!(profiles.get("u1").await.unwrap().unwrap().name, "Ann");

    // The durable value changes behind the cache's back.
    let mut changed = ann();
    changed.name = "Annabel".to_string();
    store.put_profile(changed).await;

    // Within the TTL the stale snapshot is served; staleness is bounded.
    control.advance(Duration::from_secs(30));
    assert_eq!(profiles.get("u1").await.unwrap().unwrap().name, "Ann");

    // Past the TTL the repopulation observes the current value.
    control.advance(Duration::from_secs(31));
    assert_eq!(profiles.get("u1").await.unwrap().unwrap().name, "Annabel");
}

#[tokio::test]
async fn store_failure_surfaces_and_is_retryable() {
    let clock = Clock::new_frozen();
    let store = seeded(clock.clone()).await;
    let profiles = profiles(Arc::clone(&store), clock, Duration::from_secs(60));

    store.fail_reads(true);
    let err = profiles.get("u1").await.unwrap_err();
    assert_eq!(
        err,
        Error::Store(StoreError::Unavailable("injected outage".to_string()))
    );

    // The failed population must not leave the key locked.
    store.fail_reads(false);
    let recovered = profiles.get("u1").await.unwrap().unwrap();
    assert_eq!(recovered.name, "Ann");
}

#[tokio::test]
async fn keys_are_cached_independently() {
    let clock = Clock::new_frozen();
    let store = seeded(clock.clone()).await;
    store.put_profile(Profile::new("u2", "Beth", "beth@example.com")).await;
    let profiles = profiles(Arc::clone(&store), clock, Duration::from_secs(60));

    assert_eq!(profiles.get("u1").await.unwrap().unwrap().name, "Ann");
    assert_eq!(profiles.get("u2").await.unwrap().unwrap().name, "Beth");
    assert_eq!(store.read_count(), 2);

    // Hits on either key leave the counter alone.
    profiles.get("u1").await.unwrap().unwrap();
    profiles.get("u2").await.unwrap().unwrap();
    assert_eq!(store.read_count(), 2);
}
