//! Data transfer objects for API requests and responses
//!
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    ChangePasswordRequest, CreateSongRequest, FederatedLoginRequest, LoginRequest, PageQuery,
    PendingProfile, RegisterRequest, SetBlockedRequest, UpdateProfileRequest, VerifyEmailRequest,
};

pub use responses::{
    AccountResponse, AdminAccountResponse, AuthResponse, CurrentAccountResponse,
    DeletionScheduledResponse, DeletionStatusResponse, HealthChecks, HealthResponse,
    PageResponse, ReadinessResponse, RegistrationResponse, SongResponse,
};
