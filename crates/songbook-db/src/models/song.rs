//! Song database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the songs table
#[derive(Debug, Clone, FromRow)]
pub struct SongModel {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub lyrics: String,
    pub chords: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}
