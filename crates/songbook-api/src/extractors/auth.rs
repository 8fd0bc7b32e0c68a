//! Authentication extractor
//!
//! Runs the bearer token through the account status gate. Handlers that take
//! an [`AuthUser`] only ever see accounts that exist and are not blocked.

use std::ops::Deref;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use songbook_service::AuthContext;

use crate::response::ApiError;
use crate::state::AppState;

/// Account admitted by the gate for this request
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthContext);

impl Deref for AuthUser {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        let context = app_state
            .gate()
            .authenticate(bearer.token())
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Request refused at account gate");
                ApiError::from(e)
            })?;

        Ok(AuthUser(context))
    }
}
