//! Session tokens
//!
//! Stateless HS256 bearer tokens carrying the account id and an absolute
//! expiry. Validation never touches the store.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use songbook_core::AccountId;

use crate::error::AppError;

/// Default session validity: 7 days
pub const DEFAULT_SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Get the account ID
    ///
    /// # Errors
    /// Returns `InvalidToken` if the subject is not a valid account id
    pub fn account_id(&self) -> Result<AccountId, AppError> {
        self.sub.parse().map_err(|_| AppError::InvalidToken)
    }
}

/// A freshly signed session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// JWT service for issuing and validating session tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl JwtService {
    /// Create a new JWT service with the given secret and token lifetime
    #[must_use]
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    /// Token lifetime in seconds
    #[must_use]
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issue a token for an account, valid from now
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue(&self, account_id: AccountId) -> Result<IssuedToken, AppError> {
        self.issue_at(account_id, Utc::now())
    }

    /// Issue a token as if signed at `issued_at`
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_at(
        &self,
        account_id: AccountId,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let expires_at = issued_at + Duration::seconds(self.ttl_secs);
        let claims = Claims {
            sub: account_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode JWT")))?;

        Ok(IssuedToken {
            token,
            // Round to whole seconds to match what the token actually carries
            expires_at: Utc
                .timestamp_opt(claims.exp, 0)
                .single()
                .unwrap_or(expires_at),
        })
    }

    /// Decode and validate a token
    ///
    /// Malformed, tampered, wrong-secret and expired tokens all yield
    /// `InvalidToken`.
    ///
    /// # Errors
    /// Returns `AppError::InvalidToken` if the token is not acceptable
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::InvalidToken)
    }

    /// Validate a token and return the account it was issued to
    ///
    /// # Errors
    /// Returns `AppError::InvalidToken` if the token is not acceptable
    pub fn validate(&self, token: &str) -> Result<AccountId, AppError> {
        self.decode_token(token)?.account_id()
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}
