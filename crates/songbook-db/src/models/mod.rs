//! Database models - SQLx-compatible structs for PostgreSQL tables

mod account;
mod song;
mod verification_code;

pub use account::{AccountModel, ACCOUNT_COLUMNS};
pub use song::SongModel;
pub use verification_code::VerificationCodeModel;
