//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Every state transition on an account is a
//! single conditional write so concurrent requests and the purge sweep
//! cannot interleave into an inconsistent state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Account, Song, VerificationCode};
use crate::error::DomainError;
use crate::value_objects::{AccountId, SongId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Outcome of attempting to purge a single candidate account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeOutcome {
    /// Account and all owned songs were removed in one transaction
    Purged { songs_deleted: u64 },
    /// Row no longer matched the purge predicate (cancelled or already gone)
    NotClaimed,
}

/// Profile fields an account may change about itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub picture_url: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.picture_url.is_none()
    }
}

// ============================================================================
// Account Repository
// ============================================================================

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by ID
    async fn find_by_id(&self, id: AccountId) -> RepoResult<Option<Account>>;

    /// Find account by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Create a new account; `EmailAlreadyExists` on a duplicate email
    async fn create(&self, account: &Account, password_hash: Option<&str>) -> RepoResult<()>;

    /// Get the stored password hash (`None` for federated accounts)
    async fn get_password_hash(&self, id: AccountId) -> RepoResult<Option<String>>;

    /// Replace the password hash
    async fn update_password(
        &self,
        id: AccountId,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<()>;

    /// Accounts in signup order
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<Account>>;

    /// Apply the given profile fields, leaving `None` fields untouched.
    /// Returns the updated account, or `None` if it does not exist.
    async fn update_profile(
        &self,
        id: AccountId,
        update: &ProfileUpdate,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Account>>;

    /// Set or clear the blocked flag. Returns `false` if the account does not exist.
    async fn set_blocked(&self, id: AccountId, blocked: bool, now: DateTime<Utc>)
        -> RepoResult<bool>;

    /// Mark the account pending deletion, only if no deletion is outstanding.
    /// Returns `true` if a row was updated.
    async fn request_deletion(
        &self,
        id: AccountId,
        requested_at: DateTime<Utc>,
        purge_deadline: DateTime<Utc>,
    ) -> RepoResult<bool>;

    /// Clear both deletion markers, only if a deletion is outstanding.
    /// Returns `true` if a row was updated.
    async fn cancel_deletion(&self, id: AccountId, now: DateTime<Utc>) -> RepoResult<bool>;

    /// Snapshot of accounts whose purge deadline is at or before `now`
    async fn find_purge_candidates(&self, now: DateTime<Utc>, limit: i64)
        -> RepoResult<Vec<AccountId>>;

    /// Atomically re-claim the account (still due at `now`), delete its songs
    /// and delete the account row
    async fn purge_if_due(&self, id: AccountId, now: DateTime<Utc>) -> RepoResult<PurgeOutcome>;

    /// Cheap round trip used by readiness checks
    async fn ping(&self) -> RepoResult<()>;
}

// ============================================================================
// Verification Code Repository
// ============================================================================

#[async_trait]
pub trait VerificationCodeRepository: Send + Sync {
    /// Store a freshly issued code. Older codes for the same email stay valid.
    async fn create(&self, code: &VerificationCode) -> RepoResult<()>;

    /// Atomically find an unused, unexpired row for `(email, code)` and mark it
    /// used. Returns `false` when nothing matched.
    async fn redeem(&self, email: &str, code: &str, now: DateTime<Utc>) -> RepoResult<bool>;
}

// ============================================================================
// Song Repository
// ============================================================================

#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Find song by ID
    async fn find_by_id(&self, id: SongId) -> RepoResult<Option<Song>>;

    /// List songs, newest first
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<Song>>;

    /// List songs owned by an account, newest first
    async fn find_by_owner(&self, account_id: AccountId) -> RepoResult<Vec<Song>>;

    /// Create a new song
    async fn create(&self, song: &Song) -> RepoResult<()>;

    /// Delete every song owned by an account, returning the number removed
    async fn delete_all_owned_by(&self, account_id: AccountId) -> RepoResult<u64>;
}
