//! In-memory store
//!
//! Implements every repository trait over plain collections guarded by a
//! single mutex. Each trait method holds the lock for its whole body, so the
//! conditional updates and the purge cascade are atomic exactly like their
//! SQL counterparts. Backs the service and HTTP tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::instrument;

use songbook_core::entities::{Account, Song, VerificationCode};
use songbook_core::error::DomainError;
use songbook_core::traits::{
    AccountRepository, ProfileUpdate, PurgeOutcome, RepoResult, SongRepository,
    VerificationCodeRepository,
};
use songbook_core::value_objects::{AccountId, SongId};

#[derive(Debug)]
struct AccountRow {
    account: Account,
    password_hash: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<AccountId, AccountRow>,
    codes: Vec<VerificationCode>,
    songs: Vec<Song>,
}

impl State {
    fn delete_songs_owned_by(&mut self, owner: AccountId) -> u64 {
        let before = self.songs.len();
        self.songs.retain(|song| song.created_by != owner);
        (before - self.songs.len()) as u64
    }
}

/// Shared in-memory store; clones share the same data
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant or revoke admin rights. There is no API for this; operators
    /// promote accounts directly in the store.
    pub fn set_admin(&self, id: AccountId, is_admin: bool) -> bool {
        let mut state = self.state.lock();
        match state.accounts.get_mut(&id) {
            Some(row) => {
                row.account.is_admin = is_admin;
                true
            }
            None => false,
        }
    }

    /// All codes ever issued for an email, oldest first
    pub fn codes_for(&self, email: &str) -> Vec<VerificationCode> {
        self.state
            .lock()
            .codes
            .iter()
            .filter(|c| c.email == email)
            .cloned()
            .collect()
    }

    pub fn account_count(&self) -> usize {
        self.state.lock().accounts.len()
    }

    pub fn song_count(&self) -> usize {
        self.state.lock().songs.len()
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn find_by_id(&self, id: AccountId) -> RepoResult<Option<Account>> {
        Ok(self.state.lock().accounts.get(&id).map(|row| row.account.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        Ok(self
            .state
            .lock()
            .accounts
            .values()
            .find(|row| row.account.email == email)
            .map(|row| row.account.clone()))
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self
            .state
            .lock()
            .accounts
            .values()
            .any(|row| row.account.email == email))
    }

    #[instrument(skip(self, account, password_hash), fields(account_id = %account.id))]
    async fn create(&self, account: &Account, password_hash: Option<&str>) -> RepoResult<()> {
        let mut state = self.state.lock();

        if state.accounts.values().any(|row| row.account.email == account.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        if state.accounts.contains_key(&account.id) {
            return Err(DomainError::DatabaseError(format!(
                "duplicate account id {}",
                account.id
            )));
        }

        state.accounts.insert(
            account.id,
            AccountRow {
                account: account.clone(),
                password_hash: password_hash.map(str::to_owned),
            },
        );
        Ok(())
    }

    async fn get_password_hash(&self, id: AccountId) -> RepoResult<Option<String>> {
        Ok(self
            .state
            .lock()
            .accounts
            .get(&id)
            .and_then(|row| row.password_hash.clone()))
    }

    async fn update_password(
        &self,
        id: AccountId,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<()> {
        let mut state = self.state.lock();
        let row = state
            .accounts
            .get_mut(&id)
            .ok_or(DomainError::AccountNotFound(id))?;

        row.password_hash = Some(password_hash.to_owned());
        row.account.updated_at = now;
        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<Account>> {
        let state = self.state.lock();
        let mut accounts: Vec<Account> =
            state.accounts.values().map(|row| row.account.clone()).collect();
        accounts.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));

        let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(accounts.into_iter().skip(offset).take(limit).collect())
    }

    async fn update_profile(
        &self,
        id: AccountId,
        update: &ProfileUpdate,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Account>> {
        let mut state = self.state.lock();
        let Some(row) = state.accounts.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(username) = &update.username {
            row.account.username.clone_from(username);
        }
        if let Some(picture_url) = &update.picture_url {
            row.account.picture_url = Some(picture_url.clone());
        }
        row.account.updated_at = now;
        Ok(Some(row.account.clone()))
    }

    async fn set_blocked(
        &self,
        id: AccountId,
        blocked: bool,
        now: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let mut state = self.state.lock();
        let Some(row) = state.accounts.get_mut(&id) else {
            return Ok(false);
        };

        row.account.is_blocked = blocked;
        row.account.updated_at = now;
        Ok(true)
    }

    async fn request_deletion(
        &self,
        id: AccountId,
        requested_at: DateTime<Utc>,
        purge_deadline: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let mut state = self.state.lock();
        match state.accounts.get_mut(&id) {
            Some(row) if row.account.delete_requested_at.is_none() => {
                row.account.delete_requested_at = Some(requested_at);
                row.account.purge_deadline = Some(purge_deadline);
                row.account.updated_at = requested_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn cancel_deletion(&self, id: AccountId, now: DateTime<Utc>) -> RepoResult<bool> {
        let mut state = self.state.lock();
        match state.accounts.get_mut(&id) {
            Some(row) if row.account.purge_deadline.is_some() => {
                row.account.delete_requested_at = None;
                row.account.purge_deadline = None;
                row.account.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_purge_candidates(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> RepoResult<Vec<AccountId>> {
        let state = self.state.lock();
        let mut due: Vec<(DateTime<Utc>, AccountId)> = state
            .accounts
            .values()
            .filter_map(|row| {
                row.account
                    .purge_deadline
                    .filter(|deadline| *deadline <= now)
                    .map(|deadline| (deadline, row.account.id))
            })
            .collect();

        due.sort();
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(due.into_iter().take(limit).map(|(_, id)| id).collect())
    }

    #[instrument(skip(self))]
    async fn purge_if_due(&self, id: AccountId, now: DateTime<Utc>) -> RepoResult<PurgeOutcome> {
        let mut state = self.state.lock();

        let due = state
            .accounts
            .get(&id)
            .is_some_and(|row| row.account.is_purge_due(now));
        if !due {
            return Ok(PurgeOutcome::NotClaimed);
        }

        let songs_deleted = state.delete_songs_owned_by(id);
        state.accounts.remove(&id);

        Ok(PurgeOutcome::Purged { songs_deleted })
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}

#[async_trait]
impl VerificationCodeRepository for MemoryStore {
    async fn create(&self, code: &VerificationCode) -> RepoResult<()> {
        self.state.lock().codes.push(code.clone());
        Ok(())
    }

    async fn redeem(&self, email: &str, code: &str, now: DateTime<Utc>) -> RepoResult<bool> {
        let mut state = self.state.lock();

        // Newest matching row first, same as the SQL implementation
        let found = state
            .codes
            .iter_mut()
            .rev()
            .find(|row| row.matches(email, code) && row.is_redeemable(now));

        match found {
            Some(row) => {
                row.used = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl SongRepository for MemoryStore {
    async fn find_by_id(&self, id: SongId) -> RepoResult<Option<Song>> {
        Ok(self.state.lock().songs.iter().find(|s| s.id == id).cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<Song>> {
        let state = self.state.lock();
        let mut songs: Vec<Song> = state.songs.clone();
        songs.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(songs.into_iter().skip(offset).take(limit).collect())
    }

    async fn find_by_owner(&self, account_id: AccountId) -> RepoResult<Vec<Song>> {
        let state = self.state.lock();
        let mut songs: Vec<Song> = state
            .songs
            .iter()
            .filter(|s| s.is_owned_by(account_id))
            .cloned()
            .collect();
        songs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(songs)
    }

    async fn create(&self, song: &Song) -> RepoResult<()> {
        let mut state = self.state.lock();
        if !state.accounts.contains_key(&song.created_by) {
            // Mirrors the foreign key on songs.created_by
            return Err(DomainError::AccountNotFound(song.created_by));
        }
        state.songs.push(song.clone());
        Ok(())
    }

    async fn delete_all_owned_by(&self, account_id: AccountId) -> RepoResult<u64> {
        Ok(self.state.lock().delete_songs_owned_by(account_id))
    }
}
