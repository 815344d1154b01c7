// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for the write path: invalidation and read-your-writes.

mod common;

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use common::{CountingStore, seeded};
use profilon::{Clock, ClockControl, Error, ProfileMutation, ProfileStore, StoreError};

fn profiles(store: Arc<CountingStore>, clock: Clock) -> ProfileStore<Arc<CountingStore>> {
    ProfileStore::builder(store, clock).ttl(Duration::from_secs(60)).build()
}

#[tokio::test]
async fn update_then_get_reflects_the_mutation() {
    let clock = Clock::new_frozen();
    let store = seeded(clock.clone()).await;
    let profiles = profiles(Arc::clone(&store), clock);

    assert_eq!(profiles.get("u1").await.unwrap().unwrap().name, "Ann");
    assert_eq!(store.read_count(), 1);

    let written = profiles
        .update("u1", ProfileMutation::new().with_name("Annie"))
        .await
        .unwrap();
    assert_eq!(written.name, "Annie");

    // The stale entry is gone; the next read repopulates exactly once and
    // observes the write.
    let fetched = profiles.get("u1").await.unwrap().unwrap();
    assert_eq!(fetched.name, "Annie");
    assert_eq!(store.read_count(), 2);
}

#[tokio::test]
async fn update_of_missing_profile_is_not_found() {
    let clock = Clock::new_frozen();
    let store = CountingStore::new(clock.clone());
    let profiles = profiles(Arc::clone(&store), clock);

    let err = profiles
        .update("ghost", ProfileMutation::new().with_name("Nobody"))
        .await
        .unwrap_err();
    assert_eq!(err, Error::NotFound { key: "ghost".to_string() });
}

#[tokio::test]
async fn failed_write_leaves_the_cache_untouched() {
    let clock = Clock::new_frozen();
    let store = seeded(clock.clone()).await;
    let profiles = profiles(Arc::clone(&store), clock);

    assert_eq!(profiles.get("u1").await.unwrap().unwrap().name, "Ann");
    assert_eq!(store.read_count(), 1);

    store.fail_writes(true);
    let err = profiles
        .update("u1", ProfileMutation::new().with_name("Annie"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        Error::Store(StoreError::Unavailable("injected outage".to_string()))
    );

    // No partial state: the cached snapshot still serves and no refetch
    // happened.
    assert_eq!(profiles.get("u1").await.unwrap().unwrap().name, "Ann");
    assert_eq!(store.read_count(), 1);
}

#[tokio::test]
async fn update_applies_only_set_fields() {
    let clock = Clock::new_frozen();
    let store = seeded(clock.clone()).await;
    let profiles = profiles(Arc::clone(&store), clock);

    let written = profiles
        .update(
            "u1",
            ProfileMutation::new().with_roles(vec!["author".to_string()]),
        )
        .await
        .unwrap();

    assert_eq!(written.name, "Ann");
    assert_eq!(written.email, "ann@example.com");
    assert_eq!(written.roles, vec!["author".to_string()]);
}

#[tokio::test]
async fn store_stamps_update_time() {
    let control = ClockControl::new_at(SystemTime::UNIX_EPOCH + Duration::from_secs(1_000));
    let store = seeded(control.to_clock()).await;
    let profiles = profiles(Arc::clone(&store), control.to_clock());

    control.advance(Duration::from_secs(500));
    let written = profiles
        .update("u1", ProfileMutation::new().with_name("Annie"))
        .await
        .unwrap();

    assert_eq!(
        written.updated_at,
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_500)
    );
}

#[tokio::test]
async fn successive_writes_are_never_served_stale() {
    let clock = Clock::new_frozen();
    let store = seeded(clock.clone()).await;
    let profiles = profiles(Arc::clone(&store), clock);

    for round in 0..10 {
        let name = format!("Ann-{round}");
        profiles
            .update("u1", ProfileMutation::new().with_name(name.clone()))
            .await
            .unwrap();

        // Read-your-writes: after a successful update, a get never observes
        // a value older than the one just written.
        let observed = profiles.get("u1").await.unwrap().unwrap();
        assert_eq!(observed.name, name);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn update_racing_a_population_cannot_strand_a_stale_entry() {
    let clock = Clock::new_frozen();
    // Slow reads widen the window in which a population could race the write.
    let store = CountingStore::with_read_delay(clock.clone(), Duration::from_millis(20));
    store.put_profile(common::ann()).await;
    let profiles = Arc::new(profiles(Arc::clone(&store), clock));

    // Kick off a population and let it reach the durable read.
    let reader = {
        let profiles = Arc::clone(&profiles);
        tokio::spawn(async move { profiles.get("u1").await })
    };
    tokio::time::sleep(Duration::from_millis(5)).await;

    // The write serializes against the in-flight population, so whatever the
    // populator installs can never mask this update.
    profiles
        .update("u1", ProfileMutation::new().with_name("Annie"))
        .await
        .unwrap();

    reader.await.unwrap().unwrap().unwrap();
    let observed = profiles.get("u1").await.unwrap().unwrap();
    assert_eq!(observed.name, "Annie");
}
