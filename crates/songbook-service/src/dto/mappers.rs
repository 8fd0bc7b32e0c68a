//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use chrono::{DateTime, Utc};
use songbook_core::entities::{Account, Song};

use super::responses::{
    AccountResponse, AdminAccountResponse, DeletionStatusResponse, SongResponse,
};

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email.clone(),
            username: account.username.clone(),
            provider: account.provider.to_string(),
            picture_url: account.picture_url.clone(),
            is_admin: account.is_admin,
            is_blocked: account.is_blocked,
            created_at: account.created_at,
        }
    }
}

impl From<&Account> for AdminAccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            account: AccountResponse::from(account),
            pending_deletion: account.is_pending_deletion(),
        }
    }
}

impl From<&Song> for SongResponse {
    fn from(song: &Song) -> Self {
        Self {
            id: song.id.to_string(),
            title: song.title.clone(),
            artist: song.artist.clone(),
            lyrics: song.lyrics.clone(),
            chords: song.chords.clone(),
            created_by: song.created_by.to_string(),
            created_at: song.created_at,
        }
    }
}

impl DeletionStatusResponse {
    /// Deletion status of `account` as seen at `now`
    pub fn for_account(account: &Account, now: DateTime<Utc>) -> Self {
        Self {
            is_deleted: account.is_pending_deletion(),
            deleted_at: account.purge_deadline,
            delete_requested_at: account.delete_requested_at,
            remaining_seconds: account.grace_remaining(now).map(|d| d.num_seconds()),
        }
    }
}
