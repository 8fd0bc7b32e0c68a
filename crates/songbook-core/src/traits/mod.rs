mod clock;
mod notifier;
mod repositories;

pub use clock::{Clock, ManualClock, SystemClock};
pub use notifier::{CodeNotifier, NotifyError};
pub use repositories::{
    AccountRepository, ProfileUpdate, PurgeOutcome, RepoResult, SongRepository,
    VerificationCodeRepository,
};
