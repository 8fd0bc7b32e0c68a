//! Service context - dependency container for services
//!
//! Holds the repositories, token service, notifier, identity verifier and
//! clock. Cloning is cheap: every dependency sits behind an `Arc`.

use std::sync::Arc;

use chrono::Duration;
use songbook_common::auth::{DisabledVerifier, IdentityVerifier, JwtService};
use songbook_common::AppConfig;
use songbook_core::traits::{
    AccountRepository, Clock, CodeNotifier, SongRepository, SystemClock,
    VerificationCodeRepository,
};
use songbook_core::{default_grace_period, VERIFICATION_CODE_TTL_SECS};
use songbook_db::MemoryStore;

use super::error::{ServiceError, ServiceResult};
use super::notify::TracingNotifier;

/// Tunables for verification and the deletion lifecycle
#[derive(Debug, Clone, Copy)]
pub struct LifecycleSettings {
    /// How long an issued verification code stays redeemable
    pub code_ttl: Duration,
    /// Time between a deletion request and the purge deadline
    pub grace_period: Duration,
    /// Maximum candidates handled by one sweep
    pub purge_batch_size: i64,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            code_ttl: Duration::seconds(VERIFICATION_CODE_TTL_SECS),
            grace_period: default_grace_period(),
            purge_batch_size: 500,
        }
    }
}

impl LifecycleSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            code_ttl: Duration::seconds(config.verification.code_ttl_secs),
            grace_period: Duration::days(config.lifecycle.grace_period_days),
            purge_batch_size: config.lifecycle.purge_batch_size,
        }
    }
}

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    account_repo: Arc<dyn AccountRepository>,
    code_repo: Arc<dyn VerificationCodeRepository>,
    song_repo: Arc<dyn SongRepository>,

    // Collaborators
    jwt_service: Arc<JwtService>,
    identity_verifier: Arc<dyn IdentityVerifier>,
    notifier: Arc<dyn CodeNotifier>,
    clock: Arc<dyn Clock>,

    settings: LifecycleSettings,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn account_repo(&self) -> &dyn AccountRepository {
        self.account_repo.as_ref()
    }

    pub fn code_repo(&self) -> &dyn VerificationCodeRepository {
        self.code_repo.as_ref()
    }

    pub fn song_repo(&self) -> &dyn SongRepository {
        self.song_repo.as_ref()
    }

    // === Collaborators ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn identity_verifier(&self) -> &dyn IdentityVerifier {
        self.identity_verifier.as_ref()
    }

    pub fn notifier(&self) -> &dyn CodeNotifier {
        self.notifier.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Current time according to the injected clock
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    pub fn settings(&self) -> &LifecycleSettings {
        &self.settings
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("jwt_service", &self.jwt_service)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext with custom configuration
///
/// Repositories and the JWT service are required. The clock defaults to the
/// system clock, the notifier to [`TracingNotifier`] and federated sign-in to
/// disabled.
#[derive(Default)]
pub struct ServiceContextBuilder {
    account_repo: Option<Arc<dyn AccountRepository>>,
    code_repo: Option<Arc<dyn VerificationCodeRepository>>,
    song_repo: Option<Arc<dyn SongRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    identity_verifier: Option<Arc<dyn IdentityVerifier>>,
    notifier: Option<Arc<dyn CodeNotifier>>,
    clock: Option<Arc<dyn Clock>>,
    settings: LifecycleSettings,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_repo(mut self, repo: Arc<dyn AccountRepository>) -> Self {
        self.account_repo = Some(repo);
        self
    }

    pub fn code_repo(mut self, repo: Arc<dyn VerificationCodeRepository>) -> Self {
        self.code_repo = Some(repo);
        self
    }

    pub fn song_repo(mut self, repo: Arc<dyn SongRepository>) -> Self {
        self.song_repo = Some(repo);
        self
    }

    /// Use one in-memory store for every repository
    pub fn memory_store(self, store: &MemoryStore) -> Self {
        self.account_repo(Arc::new(store.clone()))
            .code_repo(Arc::new(store.clone()))
            .song_repo(Arc::new(store.clone()))
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn identity_verifier(mut self, verifier: Arc<dyn IdentityVerifier>) -> Self {
        self.identity_verifier = Some(verifier);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn CodeNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn settings(mut self, settings: LifecycleSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if a required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            account_repo: self
                .account_repo
                .ok_or_else(|| ServiceError::validation("account_repo is required"))?,
            code_repo: self
                .code_repo
                .ok_or_else(|| ServiceError::validation("code_repo is required"))?,
            song_repo: self
                .song_repo
                .ok_or_else(|| ServiceError::validation("song_repo is required"))?,
            jwt_service: self
                .jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            identity_verifier: self
                .identity_verifier
                .unwrap_or_else(|| Arc::new(DisabledVerifier)),
            notifier: self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            settings: self.settings,
        })
    }
}
