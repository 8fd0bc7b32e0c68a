//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in songbook-core.

mod account;
mod error;
mod song;
mod verification_code;

pub use account::PgAccountRepository;
pub use song::PgSongRepository;
pub use verification_code::PgVerificationCodeRepository;
