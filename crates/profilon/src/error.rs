// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for profile-store operations.

use crate::StoreError;

/// An error from a profile-store operation.
///
/// All errors surface to the immediate caller; none are swallowed and none
/// are retried internally. The only internally-recovered condition is marker
/// cleanup after a failed or cancelled population, which is bookkeeping
/// rather than error recovery.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No profile exists for the key.
    ///
    /// Returned by [`update`](crate::ProfileStore::update) only; a read
    /// expresses absence as `Ok(None)` so that "no such profile" stays an
    /// outcome rather than a failure.
    #[error("no profile exists for key {key:?}")]
    NotFound {
        /// The key that had no profile.
        key: String,
    },

    /// The durable store failed while this caller was operating on it.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A population this caller was waiting on failed.
    ///
    /// Carries exactly the error the populating caller observed; only the
    /// taxon differs, recording that this caller did not perform the fetch
    /// itself.
    #[error("population by a concurrent caller failed: {0}")]
    PopulationFailed(StoreError),
}

impl Error {
    /// The underlying durable-store failure, if this error carries one.
    #[must_use]
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::Store(err) | Self::PopulationFailed(err) => Some(err),
            Self::NotFound { .. } => None,
        }
    }
}
