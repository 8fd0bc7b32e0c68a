//! # songbook-core
//!
//! Domain layer containing entities, value objects, repository traits, and the
//! clock and notifier ports.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    default_grace_period, generate_verification_code, is_well_formed_code, purge_deadline_for,
    Account, AuthProvider, DeletionState, Song, VerificationCode, DELETION_GRACE_PERIOD_DAYS,
    VERIFICATION_CODE_LEN, VERIFICATION_CODE_TTL_SECS,
};
pub use error::DomainError;
pub use traits::{
    AccountRepository, Clock, CodeNotifier, ManualClock, NotifyError, ProfileUpdate, PurgeOutcome,
    RepoResult, SongRepository, SystemClock, VerificationCodeRepository,
};
pub use value_objects::{AccountId, IdParseError, SongId, VerificationCodeId};
