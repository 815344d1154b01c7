// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The decoded, verified result of a credential.

use std::time::SystemTime;

/// An identity established by successful credential verification.
///
/// Claims are immutable once produced: they are created per request by a
/// [`CredentialVerifier`](crate::CredentialVerifier), consumed by the caller
/// for authorization decisions, and never stored by the gate.
///
/// # Examples
///
/// ```
/// use keygate::IdentityClaim;
/// use std::time::SystemTime;
///
/// let claim = IdentityClaim::new("u1", SystemTime::now(), vec!["author".into()]);
/// assert_eq!(claim.subject(), "u1");
/// assert!(claim.has_role("author"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaim {
    subject: String,
    issued_at: SystemTime,
    roles: Vec<String>,
}

impl IdentityClaim {
    /// Creates a claim for the given subject.
    ///
    /// Intended for [`CredentialVerifier`](crate::CredentialVerifier)
    /// implementations; application code receives claims from
    /// [`Authenticator::authenticate`](crate::Authenticator::authenticate).
    pub fn new(subject: impl Into<String>, issued_at: SystemTime, roles: Vec<String>) -> Self {
        Self {
            subject: subject.into(),
            issued_at,
            roles,
        }
    }

    /// The unique subject identifier this credential was issued to.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// When the credential was issued.
    #[must_use]
    pub fn issued_at(&self) -> SystemTime {
        self.issued_at
    }

    /// The role labels carried by the credential.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Returns `true` if the claim carries the given role label.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
