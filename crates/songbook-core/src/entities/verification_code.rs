//! Verification code entity - single-use proof of email ownership

use chrono::{DateTime, Duration, Utc};

use crate::value_objects::VerificationCodeId;

/// Default lifetime of a verification code
pub const VERIFICATION_CODE_TTL_SECS: i64 = 15 * 60;

/// Number of digits in a verification code
pub const VERIFICATION_CODE_LEN: usize = 6;

/// Verification code entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCode {
    pub id: VerificationCodeId,
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl VerificationCode {
    /// Issue a fresh random code for `email`, valid for `ttl` from `now`
    pub fn issue(email: String, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            id: VerificationCodeId::new(),
            email,
            code: generate_verification_code(),
            expires_at: now + ttl,
            used: false,
            created_at: now,
        }
    }

    /// A code is redeemable while unused and strictly before its expiry
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        !self.used && now < self.expires_at
    }

    /// Whether this row matches a redemption attempt
    pub fn matches(&self, email: &str, code: &str) -> bool {
        self.email == email && self.code == code
    }
}

/// Generate a random 6-digit numeric code (100000..=999999)
pub fn generate_verification_code() -> String {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    rng.gen_range(100_000..=999_999u32).to_string()
}

/// Check that user input has the shape of a verification code
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == VERIFICATION_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}
