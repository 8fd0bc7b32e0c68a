//! # songbook-db
//!
//! Persistence layer implementing the songbook-core repository traits.
//!
//! - PostgreSQL via SQLx: connection pool, SQL migrations, `FromRow` models,
//!   model -> entity mappers and `Pg*Repository` implementations
//! - [`MemoryStore`]: an in-process implementation with the same semantics
//!
//! ## Usage
//!
//! ```rust,ignore
//! use songbook_db::{create_pool, default_migrations_dir, run_migrations, DatabaseConfig};
//! use songbook_db::PgAccountRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::new("postgres://localhost/songbook", 10, 1)).await?;
//!     run_migrations(&pool, &default_migrations_dir()).await?;
//!     let accounts = PgAccountRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, default_migrations_dir, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgAccountRepository, PgSongRepository, PgVerificationCodeRepository};
