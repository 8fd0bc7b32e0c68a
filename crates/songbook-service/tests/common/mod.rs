//! Shared fixtures for service tests: an in-memory store, a pinned clock and
//! a notifier that records what it was asked to send.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use songbook_common::auth::{JwtService, SharedSecretVerifier};
use songbook_core::traits::{AccountRepository, CodeNotifier, ManualClock, NotifyError};
use songbook_db::MemoryStore;
use songbook_service::dto::{
    AuthResponse, LoginRequest, PendingProfile, RegisterRequest, VerifyEmailRequest,
};
use songbook_service::{AccountGate, AuthContext, AuthService, ServiceContext};

pub const JWT_SECRET: &str = "test-session-secret";
pub const BROKER_SECRET: &str = "test-broker-secret";
pub const PASSWORD: &str = "Password123";

/// Notifier that remembers every code it delivered
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
    fail: Mutex<bool>,
}

impl RecordingNotifier {
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock() = fail;
    }
}

#[async_trait]
impl CodeNotifier for RecordingNotifier {
    async fn send_verification_code(&self, email: &str, code: &str) -> Result<(), NotifyError> {
        if *self.fail.lock() {
            return Err(NotifyError("mail relay unavailable".to_string()));
        }
        self.sent.lock().push((email.to_string(), code.to_string()));
        Ok(())
    }
}

pub struct Harness {
    pub ctx: ServiceContext,
    pub store: MemoryStore,
    pub clock: Arc<ManualClock>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        Self::with_account_repo(store.clone(), Arc::new(store))
    }

    /// Harness whose account repository is `accounts` instead of the store
    pub fn with_account_repo(store: MemoryStore, accounts: Arc<dyn AccountRepository>) -> Self {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let notifier = Arc::new(RecordingNotifier::default());

        let ctx = ServiceContext::builder()
            .memory_store(&store)
            .account_repo(accounts)
            .jwt_service(Arc::new(JwtService::new(JWT_SECRET, 7 * 24 * 60 * 60)))
            .identity_verifier(Arc::new(SharedSecretVerifier::new(BROKER_SECRET)))
            .notifier(notifier.clone())
            .clock(clock.clone())
            .build()
            .unwrap();

        Self {
            ctx,
            store,
            clock,
            notifier,
        }
    }

    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.ctx)
    }

    pub fn gate(&self) -> AccountGate<'_> {
        AccountGate::new(&self.ctx)
    }

    /// Register, verify and return the session for `email`
    pub async fn signup(&self, email: &str, username: &str) -> AuthResponse {
        self.auth()
            .register(RegisterRequest {
                email: email.to_string(),
                password: PASSWORD.to_string(),
                username: username.to_string(),
            })
            .await
            .unwrap();

        let code = self.notifier.last_code_for(email).unwrap();
        self.auth()
            .verify_email(verify_request(email, &code, username))
            .await
            .unwrap()
    }

    pub async fn login(&self, email: &str) -> AuthResponse {
        self.auth()
            .login(LoginRequest {
                email: email.to_string(),
                password: PASSWORD.to_string(),
            })
            .await
            .unwrap()
    }

    pub async fn authenticate(&self, token: &str) -> AuthContext {
        self.gate().authenticate(token).await.unwrap()
    }
}

pub fn verify_request(email: &str, code: &str, username: &str) -> VerifyEmailRequest {
    VerifyEmailRequest {
        email: email.to_string(),
        code: code.to_string(),
        profile: PendingProfile {
            username: username.to_string(),
            password: PASSWORD.to_string(),
        },
    }
}

/// A well-formed code guaranteed to differ from `code`
pub fn wrong_code(code: &str) -> String {
    if code == "111111" {
        "222222".to_string()
    } else {
        "111111".to_string()
    }
}
