//! Application state
//!
//! Wraps the service context and configuration shared by every handler and
//! exposes the pieces the HTTP layer needs outside a service call: the account
//! gate for the auth extractor, a store check for readiness and the purge
//! sweep configured from `PURGE_INTERVAL_SECS`.

use std::sync::Arc;
use std::time::Duration;

use songbook_common::AppConfig;
use songbook_service::{AccountGate, PurgeScheduler, ServiceContext};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Token check run before any authenticated handler
    pub fn gate(&self) -> AccountGate<'_> {
        AccountGate::new(&self.service_context)
    }

    /// Whether the account store answers a round trip
    pub async fn store_ready(&self) -> bool {
        match self.service_context.account_repo().ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Readiness check: store unreachable");
                false
            }
        }
    }

    /// Purge sweep over these services, not yet started
    pub fn purge_scheduler(&self) -> PurgeScheduler {
        let interval = Duration::from_secs(self.config.lifecycle.purge_interval_secs);
        PurgeScheduler::new(ServiceContext::clone(&self.service_context)).with_interval(interval)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("env", &self.config.app.env)
            .field("grace_period_days", &self.config.lifecycle.grace_period_days)
            .field("purge_interval_secs", &self.config.lifecycle.purge_interval_secs)
            .finish()
    }
}
