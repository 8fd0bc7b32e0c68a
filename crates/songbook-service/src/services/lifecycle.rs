//! Account deletion lifecycle
//!
//! ```text
//! ACTIVE --request--> PENDING_DELETION --cancel--> ACTIVE
//! PENDING_DELETION --purge sweep, deadline passed--> PURGED
//! ```
//!
//! Transitions are single conditional updates in the store; when one does not
//! apply, the account is re-read only to pick the right error.

use songbook_core::entities::purge_deadline_for;
use songbook_core::error::DomainError;
use songbook_core::value_objects::AccountId;
use tracing::{info, instrument, warn};

use crate::dto::{DeletionScheduledResponse, DeletionStatusResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Lifecycle manager for account deletion
pub struct LifecycleService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LifecycleService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Schedule the account for deletion after the grace period
    #[instrument(skip(self))]
    pub async fn request_deletion(
        &self,
        account_id: AccountId,
    ) -> ServiceResult<DeletionScheduledResponse> {
        let requested_at = self.ctx.now();
        let purge_deadline = purge_deadline_for(requested_at, self.ctx.settings().grace_period)
            .ok_or_else(|| {
                DomainError::InternalError("grace period overflows the purge deadline".into())
            })?;

        let updated = self
            .ctx
            .account_repo()
            .request_deletion(account_id, requested_at, purge_deadline)
            .await?;

        if !updated {
            self.ensure_exists(account_id).await?;
            warn!(account_id = %account_id, "Deletion already requested");
            return Err(DomainError::DeletionAlreadyRequested.into());
        }

        info!(
            account_id = %account_id,
            purge_deadline = %purge_deadline,
            "Account deletion requested"
        );

        Ok(DeletionScheduledResponse {
            delete_requested_at: requested_at,
            purge_deadline,
        })
    }

    /// Withdraw a pending deletion.
    ///
    /// Allowed until a sweep has removed the row, even past the deadline.
    #[instrument(skip(self))]
    pub async fn cancel_deletion(&self, account_id: AccountId) -> ServiceResult<()> {
        let updated = self
            .ctx
            .account_repo()
            .cancel_deletion(account_id, self.ctx.now())
            .await?;

        if !updated {
            self.ensure_exists(account_id).await?;
            return Err(DomainError::DeletionNotRequested.into());
        }

        info!(account_id = %account_id, "Account deletion cancelled");
        Ok(())
    }

    /// Current deletion status
    #[instrument(skip(self))]
    pub async fn deletion_status(
        &self,
        account_id: AccountId,
    ) -> ServiceResult<DeletionStatusResponse> {
        let account = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or(DomainError::AccountNotFound(account_id))?;

        Ok(DeletionStatusResponse::for_account(&account, self.ctx.now()))
    }

    async fn ensure_exists(&self, account_id: AccountId) -> ServiceResult<()> {
        match self.ctx.account_repo().find_by_id(account_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::AccountNotFound(account_id).into()),
        }
    }
}
