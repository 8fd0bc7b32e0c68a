//! Verification code delivery

use async_trait::async_trait;
use songbook_core::traits::{CodeNotifier, NotifyError};
use tracing::info;

/// Logs the delivery instead of sending mail
///
/// Stands in for an SMTP or HTTP mail provider; the code itself is only
/// logged at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl CodeNotifier for TracingNotifier {
    async fn send_verification_code(&self, email: &str, code: &str) -> Result<(), NotifyError> {
        info!(email = %email, "Verification code dispatched");
        tracing::debug!(email = %email, code = %code, "Verification code contents");
        Ok(())
    }
}
