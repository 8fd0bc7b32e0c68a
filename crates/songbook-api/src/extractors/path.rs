//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::Deserialize;
use songbook_core::AccountId;

use crate::response::ApiError;

/// `:account_id` path segment parsed as an [`AccountId`]
#[derive(Debug, Clone, Copy)]
pub struct AccountIdPath(pub AccountId);

#[derive(Debug, Deserialize)]
struct RawAccountId {
    account_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AccountIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<RawAccountId>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        raw.account_id
            .parse()
            .map(AccountIdPath)
            .map_err(|_| ApiError::invalid_path("Invalid account_id format"))
    }
}
