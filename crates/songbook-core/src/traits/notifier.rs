//! Outbound delivery of verification codes

use async_trait::async_trait;
use thiserror::Error;

/// Delivery failure reported by a notifier
#[derive(Debug, Error)]
#[error("Delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Delivers a verification code to an email address
#[async_trait]
pub trait CodeNotifier: Send + Sync {
    async fn send_verification_code(&self, email: &str, code: &str) -> Result<(), NotifyError>;
}
