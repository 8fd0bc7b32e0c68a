//! Authentication service
//!
//! Registration through one-time email codes, password and federated login,
//! and password changes. Every successful path ends in a fresh session token.

use songbook_common::auth::{hash_password, validate_password_strength, verify_password};
use songbook_core::entities::{is_well_formed_code, Account, VerificationCode};
use songbook_core::error::DomainError;
use songbook_core::value_objects::AccountId;
use tracing::{info, instrument, warn};

use crate::dto::{
    AccountResponse, AuthResponse, ChangePasswordRequest, FederatedLoginRequest, LoginRequest,
    RegisterRequest, RegistrationResponse, VerifyEmailRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Lowercase and trim an address so lookups are case-insensitive
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Outcome of issuing a verification code
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub code: VerificationCode,
    pub delivered: bool,
}

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Begin local registration: validate, then send a verification code
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<RegistrationResponse> {
        validate_password_strength(&request.password)?;

        let email = normalize_email(&request.email);
        if self.ctx.account_repo().email_exists(&email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let issued = self.issue_verification_code(&email).await?;

        Ok(RegistrationResponse {
            email,
            code_expires_at: issued.code.expires_at,
            delivery_failed: !issued.delivered,
        })
    }

    /// Store a new code for `email` and hand it to the notifier.
    ///
    /// Older outstanding codes stay valid. A delivery failure is reported in
    /// the result, never as an error.
    #[instrument(skip(self))]
    pub async fn issue_verification_code(&self, email: &str) -> ServiceResult<IssuedCode> {
        let code = VerificationCode::issue(
            email.to_string(),
            self.ctx.now(),
            self.ctx.settings().code_ttl,
        );
        self.ctx.code_repo().create(&code).await?;

        let delivered = match self
            .ctx
            .notifier()
            .send_verification_code(&code.email, &code.code)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(email = %code.email, error = %e, "Verification code delivery failed");
                false
            }
        };

        Ok(IssuedCode { code, delivered })
    }

    /// Atomically consume a code. `false` for wrong, used or expired codes.
    #[instrument(skip(self, code))]
    pub async fn redeem_verification_code(&self, email: &str, code: &str) -> ServiceResult<bool> {
        if !is_well_formed_code(code) {
            return Ok(false);
        }
        Ok(self
            .ctx
            .code_repo()
            .redeem(&normalize_email(email), code, self.ctx.now())
            .await?)
    }

    /// Redeem a code and create the local account it verifies
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn verify_email(&self, request: VerifyEmailRequest) -> ServiceResult<AuthResponse> {
        let profile = request.profile;
        validate_password_strength(&profile.password)?;

        let email = normalize_email(&request.email);
        if self.ctx.account_repo().email_exists(&email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        if !self.redeem_verification_code(&email, &request.code).await? {
            warn!(email = %email, "Verification code rejected");
            return Err(DomainError::InvalidVerificationCode.into());
        }

        let password_hash = hash_password(&profile.password)?;
        let account = Account::new_local(email, profile.username, self.ctx.now());
        self.ctx
            .account_repo()
            .create(&account, Some(&password_hash))
            .await?;

        info!(account_id = %account.id, "Account created from verified email");

        self.issue_session(&account)
    }

    /// Login with email and password
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let email = normalize_email(&request.email);

        let account = self
            .ctx
            .account_repo()
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown email");
                ServiceError::invalid_credentials()
            })?;

        // Federated accounts have no hash and cannot use password login
        let password_hash = self
            .ctx
            .account_repo()
            .get_password_hash(account.id)
            .await?
            .ok_or_else(|| {
                warn!(account_id = %account.id, "Login failed: account has no password");
                ServiceError::invalid_credentials()
            })?;

        if !verify_password(&request.password, &password_hash)? {
            warn!(account_id = %account.id, "Login failed: invalid password");
            return Err(ServiceError::invalid_credentials());
        }

        if account.is_blocked {
            warn!(account_id = %account.id, "Login refused: account blocked");
            return Err(DomainError::AccountBlocked.into());
        }

        info!(account_id = %account.id, "Account logged in");
        self.issue_session(&account)
    }

    /// Login with an assertion from the identity broker, creating the
    /// account on first use
    #[instrument(skip(self, request))]
    pub async fn federated_login(
        &self,
        request: FederatedLoginRequest,
    ) -> ServiceResult<AuthResponse> {
        let identity = self.ctx.identity_verifier().verify(&request.assertion)?;
        let email = normalize_email(&identity.email);

        let account = match self.ctx.account_repo().find_by_email(&email).await? {
            Some(existing) => existing,
            None => {
                let account = Account::new_federated(
                    email,
                    identity.username,
                    identity.picture_url,
                    self.ctx.now(),
                );
                match self.ctx.account_repo().create(&account, None).await {
                    Ok(()) => {
                        info!(
                            account_id = %account.id,
                            subject = %identity.subject,
                            "Federated account created"
                        );
                        account
                    }
                    // Lost a race with a concurrent first login for the same email
                    Err(DomainError::EmailAlreadyExists) => self
                        .ctx
                        .account_repo()
                        .find_by_email(&account.email)
                        .await?
                        .ok_or_else(|| ServiceError::internal("account vanished during login"))?,
                    Err(e) => return Err(e.into()),
                }
            }
        };

        if account.is_blocked {
            warn!(account_id = %account.id, "Federated login refused: account blocked");
            return Err(DomainError::AccountBlocked.into());
        }

        info!(account_id = %account.id, "Account logged in via federated identity");
        self.issue_session(&account)
    }

    /// Change the password after checking the current one
    #[instrument(skip(self, request))]
    pub async fn change_password(
        &self,
        account_id: AccountId,
        request: ChangePasswordRequest,
    ) -> ServiceResult<()> {
        let current_hash = self
            .ctx
            .account_repo()
            .get_password_hash(account_id)
            .await?
            .ok_or_else(|| {
                ServiceError::validation("Account signs in through a federated provider")
            })?;

        if !verify_password(&request.current_password, &current_hash)? {
            return Err(ServiceError::invalid_credentials());
        }

        validate_password_strength(&request.new_password)?;
        let new_hash = hash_password(&request.new_password)?;

        self.ctx
            .account_repo()
            .update_password(account_id, &new_hash, self.ctx.now())
            .await?;

        info!(account_id = %account_id, "Password changed");
        Ok(())
    }

    fn issue_session(&self, account: &Account) -> ServiceResult<AuthResponse> {
        let issued = self.ctx.jwt_service().issue_at(account.id, self.ctx.now())?;

        Ok(AuthResponse::new(
            issued.token,
            issued.expires_at,
            AccountResponse::from(account),
            account.is_pending_deletion(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }
}
