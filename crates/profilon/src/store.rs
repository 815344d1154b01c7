// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The durable-store collaborator contract.

use crate::{Profile, ProfileMutation};

/// A failure reported by the durable store.
///
/// The store never retries internally: transient failures surface so the
/// caller owns the retry policy (blind retries on a cache-aside path amplify
/// load during an outage). Errors are `Clone` because a single population
/// failure is shared verbatim with every waiter of that population.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or timed out; retrying may succeed.
    #[error("durable store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the operation; retrying will not help.
    #[error("durable store rejected the operation: {0}")]
    Rejected(String),
}

/// The authoritative backing store for profiles.
///
/// The core consumes this narrow contract and nothing more; connection
/// management, transactions, and wire formats are the implementation's
/// business. The store is assumed to provide at least read-after-write
/// consistency for a single key from a single writer's perspective.
///
/// # Examples
///
/// ```
/// use profilon::{DurableStore, Profile, ProfileMutation, StoreError};
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
/// ```
pub trait DurableStore: Send + Sync {
    /// Reads the profile stored for a key.
    ///
    /// Returns `Ok(None)` if no such profile exists; this is an outcome, not
    /// an error, and the cache never records it.
    fn read(&self, key: &str) -> impl Future<Output = Result<Option<Profile>, StoreError>> + Send;

    /// Applies a mutation to the profile stored for a key.
    ///
    /// Returns the resulting profile, or `Ok(None)` if no such profile
    /// exists. This is the authoritative write: once it returns a profile,
    /// subsequent reads of the key observe the mutation.
    fn write(&self, key: &str, mutation: ProfileMutation) -> impl Future<Output = Result<Option<Profile>, StoreError>> + Send;
}

impl<T> DurableStore for std::sync::Arc<T>
where
    T: DurableStore,
{
    async fn read(&self, key: &str) -> Result<Option<Profile>, StoreError> {
        (**self).read(key).await
    }

    async fn write(&self, key: &str, mutation: ProfileMutation) -> Result<Option<Profile>, StoreError> {
        (**self).write(key, mutation).await
    }
}
