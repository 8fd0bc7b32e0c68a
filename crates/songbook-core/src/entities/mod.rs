//! Domain entities - core business objects

mod account;
mod song;
mod verification_code;

pub use account::{
    default_grace_period, purge_deadline_for, Account, AuthProvider, DeletionState,
    DELETION_GRACE_PERIOD_DAYS,
};
pub use song::Song;
pub use verification_code::{
    generate_verification_code, is_well_formed_code, VerificationCode, VERIFICATION_CODE_LEN,
    VERIFICATION_CODE_TTL_SECS,
};
