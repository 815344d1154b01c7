// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The collaborator contract for credential verification.

use crate::IdentityClaim;

/// Why a credential failed verification.
///
/// This detail exists for the audit side-channel only. The gate collapses
/// every variant to [`AuthError::CredentialInvalid`](crate::AuthError) before
/// returning to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// The credential is not structurally a token this verifier understands.
    #[error("credential is structurally malformed")]
    Malformed,

    /// The credential's signature did not verify.
    #[error("credential signature rejected")]
    BadSignature,

    /// The credential's validity window has passed.
    #[error("credential has expired")]
    Expired,

    /// The credential decoded but its claims were rejected.
    #[error("credential claims rejected: {0}")]
    InvalidClaims(String),
}

/// Verifies a bearer credential and decodes its claims.
///
/// From the gate's perspective this is a pure function; implementations may
/// involve cryptographic computation or network round-trips, with their own
/// failure modes expressed as [`VerifyError`].
///
/// # Examples
///
/// ```
/// use keygate::{CredentialVerifier, IdentityClaim, VerifyError};
/// use std::time::SystemTime;
///
/// struct AllowList(Vec<String>);
///
/// impl CredentialVerifier for AllowList {
///     async fn verify(&self, credential: &str) -> Result<IdentityClaim, VerifyError> {
///         if self.0.iter().any(|t| t == credential) {
///             Ok(IdentityClaim::new(credential, SystemTime::now(), Vec::new()))
///         } else {
///             Err(VerifyError::BadSignature)
///         }
///     }
/// }
/// ```
pub trait CredentialVerifier: Send + Sync {
    /// Verifies the credential, returning the decoded claims on success.
    fn verify(&self, credential: &str) -> impl Future<Output = Result<IdentityClaim, VerifyError>> + Send;
}
