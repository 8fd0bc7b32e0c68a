//! # songbook-common
//!
//! Shared utilities including configuration, error handling, authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    hash_password, sign_assertion, validate_password_strength, verify_password, Claims,
    DisabledVerifier, FederatedIdentity, IdentityVerifier, IssuedToken, JwtService,
    PasswordPolicy, SharedSecretVerifier, DEFAULT_SESSION_TTL_SECS,
};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment,
    FederatedConfig, JwtConfig, LifecycleConfig, RateLimitConfig, ServerConfig,
    VerificationConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
