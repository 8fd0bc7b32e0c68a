//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment,
    FederatedConfig, JwtConfig, LifecycleConfig, RateLimitConfig, ServerConfig,
    VerificationConfig,
};
