//! Authentication handlers
//!
//! Registration by emailed code, password and federated login, password change.

use axum::{extract::State, Json};
use songbook_service::dto::{
    AuthResponse, ChangePasswordRequest, FederatedLoginRequest, LoginRequest, RegisterRequest,
    RegistrationResponse, VerifyEmailRequest,
};
use songbook_service::AuthService;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{Accepted, ApiResult, Created, NoContent};
use crate::state::AppState;

/// Start registration; a verification code goes out by email
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Accepted<Json<RegistrationResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Accepted(Json(response)))
}

/// Redeem the code and create the account
///
/// POST /auth/verify-email
pub async fn verify_email(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<VerifyEmailRequest>,
) -> ApiResult<Created<Json<AuthResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.verify_email(request).await?;
    Ok(Created(Json(response)))
}

/// Login with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// Login with an identity broker assertion
///
/// POST /auth/federated
pub async fn federated_login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<FederatedLoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.federated_login(request).await?;
    Ok(Json(response))
}

/// PUT /auth/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<NoContent> {
    let service = AuthService::new(state.service_context());
    service.change_password(auth.account_id, request).await?;
    Ok(NoContent)
}
