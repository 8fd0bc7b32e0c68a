//! Account database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the accounts table
#[derive(Debug, Clone, FromRow)]
pub struct AccountModel {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub provider: String,
    pub picture_url: Option<String>,
    pub is_blocked: bool,
    pub is_admin: bool,
    pub delete_requested_at: Option<DateTime<Utc>>,
    pub purge_deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column list matching `AccountModel`
pub const ACCOUNT_COLUMNS: &str = "id, email, username, provider, picture_url, is_blocked, \
     is_admin, delete_requested_at, purge_deadline, created_at, updated_at";
