// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Audit side-channel for authentication outcomes.

use crate::AuthError;

/// An authentication outcome reported to the audit side-channel.
///
/// Rejections carry the verifier's failure detail, which is available here
/// and nowhere else: the error returned to the caller never says which
/// check failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    /// A credential verified successfully.
    Authenticated {
        /// The subject the credential was issued to.
        subject: String,
    },
    /// A credential was rejected.
    Rejected {
        /// The error returned to the caller.
        error: AuthError,
        /// The verifier's failure detail, absent for missing credentials.
        reason: Option<String>,
    },
}

/// Receives authentication outcomes as they happen.
///
/// Sinks are injected into the [`Authenticator`](crate::Authenticator) and
/// invoked synchronously on both success and failure. Implementations must
/// be cheap or hand off to their own machinery; the gate does not buffer.
pub trait AuditSink: Send + Sync {
    /// Records a single authentication outcome.
    fn record(&self, event: &AuditEvent);
}

/// An [`AuditSink`] that emits `tracing` events.
///
/// Successes are logged at `info`, rejections at `warn`.
///
/// # Examples
///
/// ```
/// use keygate::{Authenticator, JwtVerifier, TracingAudit};
/// use std::sync::Arc;
///
/// let gate = Authenticator::new(JwtVerifier::new(b"secret")).with_audit(Arc::new(TracingAudit));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAudit;

impl AuditSink for TracingAudit {
    fn record(&self, event: &AuditEvent) {
        match event {
            AuditEvent::Authenticated { subject } => {
                tracing::info!(%subject, "credential accepted");
            }
            AuditEvent::Rejected { error, reason } => {
                tracing::warn!(%error, ?reason, "credential rejected");
            }
        }
    }
}
