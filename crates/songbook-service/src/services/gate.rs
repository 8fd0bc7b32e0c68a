//! Account status gate
//!
//! Every authenticated request passes through here: the session token is
//! validated, the account is loaded fresh and its standing is checked.

use songbook_common::AppError;
use songbook_core::entities::Account;
use songbook_core::error::DomainError;
use songbook_core::value_objects::AccountId;
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// The account behind an accepted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub account_id: AccountId,
    pub pending_deletion: bool,
    pub is_admin: bool,
}

impl AuthContext {
    fn for_account(account: &Account) -> Self {
        Self {
            account_id: account.id,
            pending_deletion: account.is_pending_deletion(),
            is_admin: account.is_admin,
        }
    }

    /// Refuse accounts that are scheduled for deletion
    pub fn require_active(&self) -> ServiceResult<()> {
        if self.pending_deletion {
            return Err(DomainError::AccountPendingDeletion.into());
        }
        Ok(())
    }

    /// Refuse accounts without the admin flag
    pub fn require_admin(&self) -> ServiceResult<()> {
        if !self.is_admin {
            return Err(DomainError::AdminRequired.into());
        }
        Ok(())
    }
}

/// Account status gate
pub struct AccountGate<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountGate<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Authenticate a bearer token.
    ///
    /// Tokens for accounts that no longer exist are rejected like any other
    /// invalid token. Blocked accounts are refused. Accounts pending deletion
    /// pass, flagged, so they can still cancel.
    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: &str) -> ServiceResult<AuthContext> {
        let claims = self.ctx.jwt_service().decode_token(token)?;

        // Expiry against the injected clock as well as the wall clock
        if claims.exp <= self.ctx.now().timestamp() {
            debug!("Session token past its expiry");
            return Err(AppError::InvalidToken.into());
        }

        let account_id = claims.account_id()?;
        let account = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| {
                debug!(account_id = %account_id, "Token names an unknown account");
                AppError::InvalidToken
            })?;

        if account.is_blocked {
            warn!(account_id = %account_id, "Blocked account refused at gate");
            return Err(DomainError::AccountBlocked.into());
        }

        Ok(AuthContext::for_account(&account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(pending_deletion: bool, is_admin: bool) -> AuthContext {
        AuthContext {
            account_id: AccountId::new(),
            pending_deletion,
            is_admin,
        }
    }

    #[test]
    fn test_require_active() {
        assert!(context(false, false).require_active().is_ok());
        let err = context(true, false).require_active().unwrap_err();
        assert_eq!(err.error_code(), "ACCOUNT_PENDING_DELETION");
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn test_require_admin() {
        assert!(context(false, true).require_admin().is_ok());
        let err = context(false, false).require_admin().unwrap_err();
        assert_eq!(err.error_code(), "ADMIN_REQUIRED");
    }
}
