//! PostgreSQL connection pool management

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Database configuration for connection pool
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Maximum time to wait for a connection
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    /// Where `run_migrations` looks for the SQL files
    pub migrations_dir: PathBuf,
}

impl DatabaseConfig {
    /// Pool settings for a URL with the given bounds
    pub fn new(url: impl Into<String>, max_connections: u32, min_connections: u32) -> Self {
        Self {
            url: url.into(),
            max_connections,
            min_connections,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(1800),
            migrations_dir: default_migrations_dir(),
        }
    }

    #[must_use]
    pub fn with_migrations_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.migrations_dir = dir.into();
        self
    }
}

impl From<&songbook_common::DatabaseConfig> for DatabaseConfig {
    fn from(config: &songbook_common::DatabaseConfig) -> Self {
        let pool = Self::new(&config.url, config.max_connections, config.min_connections);
        match &config.migrations_dir {
            Some(dir) => pool.with_migrations_dir(dir),
            None => pool,
        }
    }
}

/// Create a new PostgreSQL connection pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(&config.url)
        .await
}

/// Migrations directory of the source tree this binary was built from.
/// Deployed binaries should set `DATABASE_MIGRATIONS_DIR` instead.
pub fn default_migrations_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

/// Apply pending migrations from `dir`
pub async fn run_migrations(pool: &PgPool, dir: &Path) -> Result<(), MigrateError> {
    let migrator = Migrator::new(dir).await?;
    migrator.run(pool).await
}
