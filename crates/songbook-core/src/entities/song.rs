//! Song entity - catalog content owned by an account

use chrono::{DateTime, Utc};

use crate::value_objects::{AccountId, SongId};

/// Song entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    pub lyrics: String,
    pub chords: Option<String>,
    pub created_by: AccountId,
    pub created_at: DateTime<Utc>,
}

impl Song {
    /// Create a new Song owned by `created_by`
    pub fn new(
        title: String,
        artist: String,
        lyrics: String,
        chords: Option<String>,
        created_by: AccountId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SongId::new(),
            title,
            artist,
            lyrics,
            chords,
            created_by,
            created_at: now,
        }
    }

    #[inline]
    pub fn is_owned_by(&self, account_id: AccountId) -> bool {
        self.created_by == account_id
    }
}
