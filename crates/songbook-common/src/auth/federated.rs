//! Federated sign-in assertions
//!
//! A trusted identity broker signs a short-lived HS256 assertion describing
//! the user it authenticated. We only check the signature and expiry; the
//! broker is responsible for talking to the upstream provider.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Identity asserted by the broker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederatedIdentity {
    /// Stable subject id at the upstream provider
    pub subject: String,
    pub email: String,
    pub username: String,
    pub picture_url: Option<String>,
}

/// Checks a federated sign-in assertion
pub trait IdentityVerifier: Send + Sync {
    /// # Errors
    /// Returns `AppError::InvalidCredentials` for any unacceptable assertion
    fn verify(&self, assertion: &str) -> Result<FederatedIdentity, AppError>;
}

#[derive(Debug, Deserialize, Serialize)]
struct AssertionClaims {
    sub: String,
    email: String,
    name: String,
    #[serde(default)]
    picture: Option<String>,
    exp: i64,
}

/// Verifies assertions signed with a secret shared with the broker
#[derive(Clone)]
pub struct SharedSecretVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SharedSecretVerifier {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl IdentityVerifier for SharedSecretVerifier {
    fn verify(&self, assertion: &str) -> Result<FederatedIdentity, AppError> {
        let claims = decode::<AssertionClaims>(assertion, &self.decoding_key, &self.validation)
            .map_err(|_| AppError::InvalidCredentials)?
            .claims;

        if claims.email.trim().is_empty() {
            return Err(AppError::InvalidCredentials);
        }

        Ok(FederatedIdentity {
            subject: claims.sub,
            email: claims.email,
            username: claims.name,
            picture_url: claims.picture,
        })
    }
}

impl std::fmt::Debug for SharedSecretVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecretVerifier").finish_non_exhaustive()
    }
}

/// Used when no broker secret is configured; every assertion is rejected
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledVerifier;

impl IdentityVerifier for DisabledVerifier {
    fn verify(&self, _assertion: &str) -> Result<FederatedIdentity, AppError> {
        Err(AppError::InvalidCredentials)
    }
}

/// Sign an assertion the way the broker does. Used by tests and local tooling.
///
/// # Errors
/// Returns an internal error if encoding fails
pub fn sign_assertion(
    secret: &str,
    identity: &FederatedIdentity,
    expires_at: i64,
) -> Result<String, AppError> {
    let claims = AssertionClaims {
        sub: identity.subject.clone(),
        email: identity.email.clone(),
        name: identity.username.clone(),
        picture: identity.picture_url.clone(),
        exp: expires_at,
    };

    jsonwebtoken::encode(
        &jsonwebtoken::Header::new(Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign assertion: {e}")))
}
