//! Test fixtures and data generators
//!
//! Request bodies and the response shapes the tests read back.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

pub const TEST_PASSWORD: &str = "TestPass123";

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Registration request
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self::for_email(&format!("test{suffix}@example.com"), &format!("testuser{suffix}"))
    }

    pub fn for_email(email: &str, username: &str) -> Self {
        Self {
            username: username.to_string(),
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PendingProfile {
    pub username: String,
    pub password: String,
}

/// Verification request completing a registration
#[derive(Debug, Serialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub code: String,
    pub profile: PendingProfile,
}

impl VerifyEmailRequest {
    pub fn from_register(reg: &RegisterRequest, code: &str) -> Self {
        Self {
            email: reg.email.clone(),
            code: code.to_string(),
            profile: PendingProfile {
                username: reg.username.clone(),
                password: reg.password.clone(),
            },
        }
    }
}

/// Login request
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegistrationResponse {
    pub email: String,
    pub code_expires_at: String,
    pub delivery_failed: bool,
}

/// Auth response
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: String,
    pub account: AccountResponse,
    pub pending_deletion: bool,
}

/// Account response
#[derive(Debug, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub provider: String,
    pub picture_url: Option<String>,
    pub is_admin: bool,
    pub is_blocked: bool,
}

#[derive(Debug, Deserialize)]
pub struct DeletionStatusResponse {
    pub is_deleted: bool,
    pub deleted_at: Option<String>,
    pub delete_requested_at: Option<String>,
    pub remaining_seconds: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct DeletionScheduledResponse {
    pub delete_requested_at: String,
    pub purge_deadline: String,
}

/// `GET /users/@me` body: the account fields plus deletion status
#[derive(Debug, Deserialize)]
pub struct CurrentAccountResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub picture_url: Option<String>,
    pub deletion: DeletionStatusResponse,
}

/// Create song request
#[derive(Debug, Serialize)]
pub struct CreateSongRequest {
    pub title: String,
    pub artist: String,
    pub lyrics: String,
    pub chords: Option<String>,
}

impl CreateSongRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            title: format!("Song {suffix}"),
            artist: "Test Artist".to_string(),
            lyrics: "First verse".to_string(),
            chords: Some("G D Em C".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SongResponse {
    pub id: String,
    pub title: String,
    pub created_by: String,
}

#[derive(Debug, Deserialize)]
pub struct SongPage {
    pub data: Vec<SongResponse>,
    pub limit: i64,
    pub offset: i64,
}

/// Row of `GET /admin/users`
#[derive(Debug, Deserialize)]
pub struct AdminAccountRow {
    pub id: String,
    pub email: String,
    pub is_admin: bool,
    pub is_blocked: bool,
    pub pending_deletion: bool,
}

#[derive(Debug, Deserialize)]
pub struct AccountPage {
    pub data: Vec<AdminAccountRow>,
    pub limit: i64,
    pub offset: i64,
}
