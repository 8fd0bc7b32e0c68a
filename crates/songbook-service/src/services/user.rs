//! Current-account queries and profile edits

use songbook_core::error::DomainError;
use songbook_core::traits::ProfileUpdate;
use songbook_core::value_objects::AccountId;
use tracing::{info, instrument};

use crate::dto::{
    AccountResponse, CurrentAccountResponse, DeletionStatusResponse, UpdateProfileRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Profile of the caller, including deletion status
    #[instrument(skip(self))]
    pub async fn get_current(
        &self,
        account_id: AccountId,
    ) -> ServiceResult<CurrentAccountResponse> {
        let account = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or(DomainError::AccountNotFound(account_id))?;

        Ok(CurrentAccountResponse {
            account: AccountResponse::from(&account),
            deletion: DeletionStatusResponse::for_account(&account, self.ctx.now()),
        })
    }

    /// Change username and/or picture. Allowed while a deletion is pending.
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        account_id: AccountId,
        request: UpdateProfileRequest,
    ) -> ServiceResult<CurrentAccountResponse> {
        let update = ProfileUpdate {
            username: request.username,
            picture_url: request.picture_url,
        };
        if update.is_empty() {
            return Err(ServiceError::validation("Nothing to update"));
        }

        let account = self
            .ctx
            .account_repo()
            .update_profile(account_id, &update, self.ctx.now())
            .await?
            .ok_or(DomainError::AccountNotFound(account_id))?;

        info!(account_id = %account_id, "Profile updated");
        Ok(CurrentAccountResponse {
            account: AccountResponse::from(&account),
            deletion: DeletionStatusResponse::for_account(&account, self.ctx.now()),
        })
    }
}
