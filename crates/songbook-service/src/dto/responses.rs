//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Common Response Types
// ============================================================================

/// Offset-paginated list
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    pub limit: i64,
    pub offset: i64,
}

// ============================================================================
// Account Responses
// ============================================================================

/// Account as shown to its owner and to admins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
    pub is_admin: bool,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
}

/// Row of the admin account listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAccountResponse {
    #[serde(flatten)]
    pub account: AccountResponse,
    pub pending_deletion: bool,
}

/// Deletion status of an account
///
/// `is_deleted` reports a pending deletion and `deleted_at` the scheduled
/// purge time; the account still exists while either is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionStatusResponse {
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub delete_requested_at: Option<DateTime<Utc>>,
    /// Whole seconds left in the grace period, zero once it has elapsed
    pub remaining_seconds: Option<i64>,
}

/// Result of a successful deletion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionScheduledResponse {
    pub delete_requested_at: DateTime<Utc>,
    pub purge_deadline: DateTime<Utc>,
}

/// Current account with its deletion status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAccountResponse {
    #[serde(flatten)]
    pub account: AccountResponse,
    pub deletion: DeletionStatusResponse,
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Session issued after login or verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub account: AccountResponse,
    /// Set when the account still has a deletion outstanding
    pub pending_deletion: bool,
}

impl AuthResponse {
    pub fn new(
        token: String,
        expires_at: DateTime<Utc>,
        account: AccountResponse,
        pending_deletion: bool,
    ) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_at,
            account,
            pending_deletion,
        }
    }
}

/// Registration accepted; a code was issued for the address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationResponse {
    pub email: String,
    pub code_expires_at: DateTime<Utc>,
    /// The notifier failed; the client may ask for a new code
    pub delivery_failed: bool,
}

// ============================================================================
// Song Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongResponse {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub lyrics: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chords: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health of each backing service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
