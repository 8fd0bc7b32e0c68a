//! Current-account handlers, including the deletion lifecycle
//!
//! These stay reachable while a deletion is pending so the account can
//! check on it and cancel.

use axum::{extract::State, Json};
use songbook_service::dto::{
    CurrentAccountResponse, DeletionScheduledResponse, DeletionStatusResponse,
    UpdateProfileRequest,
};
use songbook_service::{LifecycleService, UserService};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{Accepted, ApiResult, NoContent};
use crate::state::AppState;

/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CurrentAccountResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.get_current(auth.account_id).await?;
    Ok(Json(response))
}

/// PATCH /users/@me
pub async fn update_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<CurrentAccountResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.update_profile(auth.account_id, request).await?;
    Ok(Json(response))
}

/// GET /users/@me/deletion
pub async fn get_deletion_status(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DeletionStatusResponse>> {
    let service = LifecycleService::new(state.service_context());
    let response = service.deletion_status(auth.account_id).await?;
    Ok(Json(response))
}

/// Schedule the account for deletion after the grace period
///
/// POST /users/@me/deletion
pub async fn request_deletion(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Accepted<Json<DeletionScheduledResponse>>> {
    let service = LifecycleService::new(state.service_context());
    let response = service.request_deletion(auth.account_id).await?;
    Ok(Accepted(Json(response)))
}

/// DELETE /users/@me/deletion
pub async fn cancel_deletion(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<NoContent> {
    let service = LifecycleService::new(state.service_context());
    service.cancel_deletion(auth.account_id).await?;
    Ok(NoContent)
}
