//! Authentication utilities

mod federated;
mod jwt;
mod password;

pub use federated::{
    sign_assertion, DisabledVerifier, FederatedIdentity, IdentityVerifier, SharedSecretVerifier,
};
pub use jwt::{Claims, IssuedToken, JwtService, DEFAULT_SESSION_TTL_SECS};
pub use password::{hash_password, validate_password_strength, verify_password, PasswordPolicy};
