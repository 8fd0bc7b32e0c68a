//! Password hashing and the password strength policy
//!
//! Hashes are Argon2id PHC strings with a random per-password salt.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an internal error if hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a stored hash
///
/// A mismatch is `Ok(false)`; only an unparseable hash is an error.
///
/// # Errors
/// Returns an internal error if the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Minimum strength required for new passwords
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_upper: bool,
    pub require_lower: bool,
    pub require_digit: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_upper: true,
            require_lower: true,
            require_digit: true,
        }
    }
}

impl PasswordPolicy {
    /// Check a candidate password, reporting the first rule it breaks
    ///
    /// # Errors
    /// Returns `AppError::Validation` describing the unmet rule
    pub fn check(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        if self.require_upper && !password.chars().any(char::is_uppercase) {
            return Err(AppError::validation(
                "Password must contain at least one uppercase letter",
            ));
        }
        if self.require_lower && !password.chars().any(char::is_lowercase) {
            return Err(AppError::validation(
                "Password must contain at least one lowercase letter",
            ));
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::validation(
                "Password must contain at least one digit",
            ));
        }
        Ok(())
    }
}

/// Validate password strength against the default policy
///
/// # Errors
/// Returns a validation error if the password doesn't meet requirements
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    PasswordPolicy::default().check(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejection(password: &str) -> String {
        match validate_password_strength(password) {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_hash_is_salted_argon2() {
        let first = hash_password("Secret123").unwrap();
        let second = hash_password("Secret123").unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_roundtrip() {
        let hash = hash_password("Secret123").unwrap();
        assert!(verify_password("Secret123", &hash).unwrap());
        assert!(!verify_password("Secret124", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        let result = verify_password("Secret123", "not-a-phc-string");
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_policy_accepts_strong_passwords() {
        assert!(validate_password_strength("Secret123").is_ok());
        assert!(validate_password_strength("Abcdefg1").is_ok());
    }

    #[test]
    fn test_policy_rejections() {
        assert!(rejection("Sh0rt").contains("8 characters"));
        assert!(rejection("secret123").contains("uppercase"));
        assert!(rejection("SECRET123").contains("lowercase"));
        assert!(rejection("SecretWord").contains("digit"));
    }

    #[test]
    fn test_relaxed_policy() {
        let policy = PasswordPolicy {
            min_length: 4,
            require_upper: false,
            require_lower: true,
            require_digit: false,
        };
        assert!(policy.check("abcd").is_ok());
        assert!(policy.check("abc").is_err());
    }
}
