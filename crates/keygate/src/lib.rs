// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Fail-closed bearer credential authentication gate with pluggable verification.
//!
//! This crate provides [`Authenticator`], a deterministic gate that turns an
//! inbound bearer credential into an [`IdentityClaim`] or a rejection:
//!
//! - A missing credential is [`AuthError::CredentialMissing`], reported before
//!   any verification work happens.
//! - Every verification failure collapses to [`AuthError::CredentialInvalid`];
//!   the caller never learns which check failed.
//!
//! Verification is delegated to an injected [`CredentialVerifier`], and
//! outcomes can be mirrored to an [`AuditSink`] side-channel that sees the
//! failure detail the public error hides.
//!
//! # Examples
//!
//! ```
//! use keygate::{AuthError, Authenticator, JwtVerifier};
//! # futures::executor::block_on(async {
//!
//! let gate = Authenticator::new(JwtVerifier::new(b"shared-secret"));
//!
//! // Absence is distinct from invalidity.
//! assert_eq!(gate.authenticate("").await.unwrap_err(), AuthError::CredentialMissing);
//! assert_eq!(gate.authenticate("not-a-token").await.unwrap_err(), AuthError::CredentialInvalid);
//! # });
//! ```

use std::sync::Arc;

mod audit;
mod claims;
mod error;
#[cfg(feature = "jwt")]
mod jwt;
mod verifier;

pub use audit::{AuditEvent, AuditSink, TracingAudit};
pub use claims::IdentityClaim;
pub use error::AuthError;
#[cfg(feature = "jwt")]
pub use jwt::JwtVerifier;
pub use verifier::{CredentialVerifier, VerifyError};

/// Authenticates bearer credentials through an injected verifier.
///
/// The gate holds no mutable shared state: [`authenticate`](Self::authenticate)
/// takes `&self`, is safe to call concurrently, and blocks on nothing beyond
/// the verifier collaborator.
///
/// # Examples
///
/// ```
/// use keygate::{Authenticator, JwtVerifier, TracingAudit};
/// use std::sync::Arc;
///
/// let gate = Authenticator::new(JwtVerifier::new(b"shared-secret"))
///     .with_audit(Arc::new(TracingAudit));
/// ```
pub struct Authenticator<V> {
    verifier: V,
    audit: Option<Arc<dyn AuditSink>>,
}

impl<V> std::fmt::Debug for Authenticator<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator").finish_non_exhaustive()
    }
}

impl<V> Authenticator<V>
where
    V: CredentialVerifier,
{
    /// Creates a gate around the given verifier, with no audit sink.
    pub fn new(verifier: V) -> Self {
        Self { verifier, audit: None }
    }

    /// Attaches an audit sink that observes every authentication outcome.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Validates the credential and decodes its identity claim.
    ///
    /// An empty or blank credential is rejected as missing without invoking
    /// the verifier. Anything else is handed to the verifier; any failure it
    /// reports surfaces as [`AuthError::CredentialInvalid`] with the detail
    /// visible only to the audit sink.
    ///
    /// # Errors
    ///
    /// - [`AuthError::CredentialMissing`] if `credential` is empty or blank.
    /// - [`AuthError::CredentialInvalid`] if verification fails for any reason.
    pub async fn authenticate(&self, credential: &str) -> Result<IdentityClaim, AuthError> {
        if credential.trim().is_empty() {
            self.record(&AuditEvent::Rejected {
                error: AuthError::CredentialMissing,
                reason: None,
            });
            return Err(AuthError::CredentialMissing);
        }

        match self.verifier.verify(credential).await {
            Ok(claim) => {
                self.record(&AuditEvent::Authenticated {
                    subject: claim.subject().to_string(),
                });
                Ok(claim)
            }
            Err(err) => {
                self.record(&AuditEvent::Rejected {
                    error: AuthError::CredentialInvalid,
                    reason: Some(err.to_string()),
                });
                Err(AuthError::CredentialInvalid)
            }
        }
    }

    fn record(&self, event: &AuditEvent) {
        if let Some(audit) = &self.audit {
            audit.record(event);
        }
    }
}
