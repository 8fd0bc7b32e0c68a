//! Administrative account operations
//!
//! Blocking never targets the acting admin or any other admin account.

use songbook_core::error::DomainError;
use songbook_core::value_objects::AccountId;
use tracing::{info, instrument};

use crate::dto::{AdminAccountResponse, PageQuery};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::gate::AuthContext;

pub struct AdminService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AdminService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Accounts with their blocked, admin and deletion flags, in signup order
    #[instrument(skip(self, actor), fields(actor = %actor.account_id))]
    pub async fn list_accounts(
        &self,
        actor: &AuthContext,
        query: &PageQuery,
    ) -> ServiceResult<Vec<AdminAccountResponse>> {
        actor.require_admin()?;

        let accounts = self
            .ctx
            .account_repo()
            .list(query.limit(), query.offset())
            .await?;
        Ok(accounts.iter().map(AdminAccountResponse::from).collect())
    }

    /// Block or unblock an account. Takes effect at the account's next request.
    #[instrument(skip(self, actor), fields(actor = %actor.account_id))]
    pub async fn set_blocked(
        &self,
        actor: &AuthContext,
        target: AccountId,
        blocked: bool,
    ) -> ServiceResult<()> {
        actor.require_admin()?;

        if target == actor.account_id {
            return Err(DomainError::CannotBlockSelf.into());
        }

        let account = self
            .ctx
            .account_repo()
            .find_by_id(target)
            .await?
            .ok_or(DomainError::AccountNotFound(target))?;
        if account.is_admin {
            return Err(DomainError::CannotBlockAdmin.into());
        }

        let updated = self
            .ctx
            .account_repo()
            .set_blocked(target, blocked, self.ctx.now())
            .await?;

        // Purged between the lookup and the update
        if !updated {
            return Err(DomainError::AccountNotFound(target).into());
        }

        info!(target = %target, blocked, "Account block flag changed");
        Ok(())
    }
}
