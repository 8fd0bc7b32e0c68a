//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{AccountId, SongId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Song not found: {0}")]
    SongNotFound(SongId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Account is blocked")]
    AccountBlocked,

    #[error("Administrator privileges required")]
    AdminRequired,

    #[error("Account is scheduled for deletion")]
    AccountPendingDeletion,

    #[error("Administrators cannot block their own account")]
    CannotBlockSelf,

    #[error("Administrator accounts cannot be blocked")]
    CannotBlockAdmin,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Account deletion already requested")]
    DeletionAlreadyRequested,

    #[error("Account deletion was not requested")]
    DeletionNotRequested,

    #[error("Invalid or expired verification code")]
    InvalidVerificationCode,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::AccountNotFound(_) => "UNKNOWN_ACCOUNT",
            Self::SongNotFound(_) => "UNKNOWN_SONG",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::WeakPassword(_) => "WEAK_PASSWORD",

            // Authorization
            Self::AccountBlocked => "ACCOUNT_BLOCKED",
            Self::AdminRequired => "ADMIN_REQUIRED",
            Self::AccountPendingDeletion => "ACCOUNT_PENDING_DELETION",
            Self::CannotBlockSelf => "CANNOT_BLOCK_SELF",
            Self::CannotBlockAdmin => "CANNOT_BLOCK_ADMIN",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::DeletionAlreadyRequested => "DELETION_ALREADY_REQUESTED",
            Self::DeletionNotRequested => "DELETION_NOT_REQUESTED",
            Self::InvalidVerificationCode => "INVALID_VERIFICATION_CODE",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AccountNotFound(_) | Self::SongNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::InvalidUsername(_)
                | Self::WeakPassword(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::AccountBlocked
                | Self::AdminRequired
                | Self::AccountPendingDeletion
                | Self::CannotBlockSelf
                | Self::CannotBlockAdmin
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists
                | Self::DeletionAlreadyRequested
                | Self::DeletionNotRequested
                | Self::InvalidVerificationCode
        )
    }
}
