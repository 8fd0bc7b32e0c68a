//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// Start of local registration: checks the email and sends a code
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,

    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: String,
}

/// Profile supplied again when the verification code is redeemed
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PendingProfile {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,
}

/// Redeem a verification code and create the account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(equal = 6, message = "Code must be 6 digits"))]
    pub code: String,

    #[validate(nested)]
    pub profile: PendingProfile,
}

/// Password login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Federated login with an assertion from the identity broker
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FederatedLoginRequest {
    #[validate(length(min = 1, message = "Assertion is required"))]
    pub assertion: String,
}

/// Change the password of the current account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    pub current_password: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub new_password: String,
}

// ============================================================================
// Profile Requests
// ============================================================================

/// Partial profile update; omitted fields stay as they are
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: Option<String>,

    #[validate(
        url(message = "Picture must be a valid URL"),
        length(max = 2048, message = "Picture URL must be at most 2048 characters")
    )]
    pub picture_url: Option<String>,
}

// ============================================================================
// Admin Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetBlockedRequest {
    pub blocked: bool,
}

// ============================================================================
// Song Requests
// ============================================================================

/// Create song request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSongRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 200, message = "Artist must be 1-200 characters"))]
    pub artist: String,

    #[validate(length(min = 1, max = 50000, message = "Lyrics must be 1-50000 characters"))]
    pub lyrics: String,

    #[validate(length(max = 50000, message = "Chords must be at most 50000 characters"))]
    pub chords: Option<String>,
}

/// Offset pagination for listings
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1, max = 100, message = "Limit must be 1-100"))]
    pub limit: Option<i64>,

    #[validate(range(min = 0, message = "Offset must not be negative"))]
    pub offset: Option<i64>,
}

impl PageQuery {
    pub const DEFAULT_LIMIT: i64 = 50;

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }
}
