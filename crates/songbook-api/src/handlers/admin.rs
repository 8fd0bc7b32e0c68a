//! Admin handlers

use axum::{extract::State, Json};
use songbook_service::dto::{AdminAccountResponse, PageQuery, PageResponse, SetBlockedRequest};
use songbook_service::AdminService;

use crate::extractors::{AccountIdPath, AuthUser, ValidatedJson, ValidatedQuery};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// GET /admin/users?limit=&offset=
pub async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> ApiResult<Json<PageResponse<AdminAccountResponse>>> {
    let service = AdminService::new(state.service_context());
    let accounts = service.list_accounts(&auth, &query).await?;
    Ok(Json(PageResponse {
        data: accounts,
        limit: query.limit(),
        offset: query.offset(),
    }))
}

/// Block or unblock an account
///
/// PUT /admin/users/{account_id}/block
pub async fn set_blocked(
    State(state): State<AppState>,
    auth: AuthUser,
    AccountIdPath(target): AccountIdPath,
    ValidatedJson(request): ValidatedJson<SetBlockedRequest>,
) -> ApiResult<NoContent> {
    let service = AdminService::new(state.service_context());
    service.set_blocked(&auth, target, request.blocked).await?;
    Ok(NoContent)
}
