//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub verification: VerificationConfig,
    pub lifecycle: LifecycleConfig,
    pub federated: FederatedConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Directory holding the SQL migrations; the source tree's copy when unset
    #[serde(default)]
    pub migrations_dir: Option<String>,
}

/// Session token configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: i64,
}

/// Email verification code configuration
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfig {
    #[serde(default = "default_code_ttl")]
    pub code_ttl_secs: i64,
}

/// Account deletion and purge configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LifecycleConfig {
    #[serde(default = "default_grace_period_days")]
    pub grace_period_days: i64,
    #[serde(default = "default_purge_interval")]
    pub purge_interval_secs: u64,
    #[serde(default = "default_purge_batch_size")]
    pub purge_batch_size: i64,
}

/// Federated sign-in configuration; disabled when no secret is set
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FederatedConfig {
    pub assertion_secret: Option<String>,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Upper bound for `SESSION_TOKEN_TTL_SECS` (90 days)
pub const MAX_SESSION_TTL_SECS: i64 = 90 * 86_400;

/// Upper bound for `VERIFICATION_CODE_TTL_SECS` (one day)
pub const MAX_CODE_TTL_SECS: i64 = 86_400;

/// Upper bound for `DELETION_GRACE_PERIOD_DAYS`
pub const MAX_GRACE_PERIOD_DAYS: i64 = 365;

// Default value functions
fn default_app_name() -> String {
    "songbook".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_session_ttl() -> i64 {
    604_800 // 7 days
}

fn default_code_ttl() -> i64 {
    900 // 15 minutes
}

fn default_grace_period_days() -> i64 {
    14
}

fn default_purge_interval() -> u64 {
    86_400 // daily
}

fn default_purge_batch_size() -> i64 {
    500
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

/// Reads variables through a lookup function so tests don't touch the process env
struct VarSource<F> {
    lookup: F,
}

impl<F> VarSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name).ok_or(ConfigError::MissingVar(name))
    }

    fn parsed<T: FromStr>(&self, name: &'static str) -> Result<Option<T>, ConfigError> {
        self.get(name)
            .map(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(name, raw))
            })
            .transpose()
    }

    fn parsed_or<T: FromStr>(
        &self,
        name: &'static str,
        default: fn() -> T,
    ) -> Result<T, ConfigError> {
        Ok(self.parsed(name)?.unwrap_or_else(default))
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// # Errors
    /// Returns an error if required variables are missing or malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = VarSource { lookup };

        let env = match vars.get("APP_ENV") {
            Some(raw) => {
                Environment::parse(&raw).ok_or(ConfigError::InvalidValue("APP_ENV", raw))?
            }
            None => Environment::default(),
        };

        let config = Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            api: ServerConfig {
                host: vars.get("API_HOST").unwrap_or_else(default_host),
                port: vars
                    .parsed("API_PORT")?
                    .ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars
                    .parsed_or("DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: vars
                    .parsed_or("DATABASE_MIN_CONNECTIONS", default_min_connections)?,
                migrations_dir: vars.get("DATABASE_MIGRATIONS_DIR"),
            },
            jwt: JwtConfig {
                secret: vars.required("JWT_SECRET")?,
                session_ttl_secs: vars.parsed_or("SESSION_TOKEN_TTL_SECS", default_session_ttl)?,
            },
            verification: VerificationConfig {
                code_ttl_secs: vars.parsed_or("VERIFICATION_CODE_TTL_SECS", default_code_ttl)?,
            },
            lifecycle: LifecycleConfig {
                grace_period_days: vars
                    .parsed_or("DELETION_GRACE_PERIOD_DAYS", default_grace_period_days)?,
                purge_interval_secs: vars
                    .parsed_or("PURGE_INTERVAL_SECS", default_purge_interval)?,
                purge_batch_size: vars.parsed_or("PURGE_BATCH_SIZE", default_purge_batch_size)?,
            },
            federated: FederatedConfig {
                assertion_secret: vars.get("FEDERATED_ASSERTION_SECRET"),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parsed_or("RATE_LIMIT_REQUESTS_PER_SECOND", default_requests_per_second)?,
                burst: vars.parsed_or("RATE_LIMIT_BURST", default_burst)?,
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .get("CORS_ALLOWED_ORIGINS")
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_range(
            "SESSION_TOKEN_TTL_SECS",
            self.jwt.session_ttl_secs,
            1,
            MAX_SESSION_TTL_SECS,
        )?;
        check_range(
            "VERIFICATION_CODE_TTL_SECS",
            self.verification.code_ttl_secs,
            1,
            MAX_CODE_TTL_SECS,
        )?;
        check_range(
            "DELETION_GRACE_PERIOD_DAYS",
            self.lifecycle.grace_period_days,
            0,
            MAX_GRACE_PERIOD_DAYS,
        )?;
        if self.lifecycle.purge_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "PURGE_INTERVAL_SECS",
                "must be greater than zero".to_string(),
            ));
        }
        if self.lifecycle.purge_batch_size <= 0 {
            return Err(ConfigError::InvalidValue(
                "PURGE_BATCH_SIZE",
                "must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_range(name: &'static str, value: i64, min: i64, max: i64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(
            name,
            format!("{value} is outside {min}..={max}"),
        ))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
