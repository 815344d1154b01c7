// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! HS256 shared-secret JWT verification.

use std::time::{Duration, SystemTime};

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::{CredentialVerifier, IdentityClaim, VerifyError};

/// The claim payload carried by tokens this verifier accepts.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject identifier the token was issued to.
    sub: String,
    /// Issued-at, seconds since the Unix epoch.
    iat: u64,
    /// Expiry, seconds since the Unix epoch.
    exp: u64,
    /// Role labels; tokens without the claim get no roles.
    #[serde(default)]
    roles: Vec<String>,
}

/// A [`CredentialVerifier`] for HS256 shared-secret JWTs.
///
/// Tokens must carry `sub`, `iat` and `exp`; an optional `roles` claim maps
/// onto [`IdentityClaim::roles`]. A token missing any required claim fails
/// decoding and is reported as malformed.
///
/// # Examples
///
/// ```
/// use keygate::JwtVerifier;
///
/// let verifier = JwtVerifier::new(b"shared-secret");
/// ```
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Creates a verifier for tokens signed with the given shared secret.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The decoding key must never appear in logs.
        f.debug_struct("JwtVerifier").finish_non_exhaustive()
    }
}

impl CredentialVerifier for JwtVerifier {
    async fn verify(&self, credential: &str) -> Result<IdentityClaim, VerifyError> {
        let data = decode::<Claims>(credential, &self.key, &self.validation).map_err(|e| map_error(&e))?;
        let claims = data.claims;
        let issued_at = SystemTime::UNIX_EPOCH + Duration::from_secs(claims.iat);
        Ok(IdentityClaim::new(claims.sub, issued_at, claims.roles))
    }
}

fn map_error(err: &jsonwebtoken::errors::Error) -> VerifyError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::InvalidSignature => VerifyError::BadSignature,
        ErrorKind::ExpiredSignature => VerifyError::Expired,
        ErrorKind::MissingRequiredClaim(_) | ErrorKind::InvalidSubject => VerifyError::InvalidClaims(err.to_string()),
        _ => VerifyError::Malformed,
    }
}
