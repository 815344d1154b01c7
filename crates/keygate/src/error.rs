// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for authentication.

/// An authentication failure.
///
/// Both variants are terminal for the request: the gate never retries
/// internally. Callers map `CredentialMissing` to an "unauthenticated"
/// response and `CredentialInvalid` to "forbidden".
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No credential was supplied with the request.
    #[error("no credential supplied")]
    CredentialMissing,

    /// The supplied credential failed verification.
    ///
    /// This variant deliberately carries no detail. Whether the signature was
    /// wrong, the structure malformed, or a claim expired is visible only to
    /// the audit side-channel, never to the caller.
    #[error("credential rejected")]
    CredentialInvalid,
}
