//! Test helpers for integration tests
//!
//! Provides the test server, HTTP request shortcuts and status assertions.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use songbook_api::server::identity_verifier;
use songbook_api::{create_app, AppState};
use songbook_common::{AppConfig, JwtService};
use songbook_core::traits::{CodeNotifier, ManualClock, NotifyError};
use songbook_db::MemoryStore;
use songbook_service::{LifecycleSettings, PurgeScheduler, PurgeReport, ServiceContext};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const JWT_SECRET: &str = "integration-session-secret";
pub const BROKER_SECRET: &str = "integration-broker-secret";

/// Notifier standing in for the mail relay
#[derive(Debug, Default)]
pub struct CapturingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl CapturingNotifier {
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl CodeNotifier for CapturingNotifier {
    async fn send_verification_code(&self, email: &str, code: &str) -> Result<(), NotifyError> {
        self.sent.lock().push((email.to_string(), code.to_string()));
        Ok(())
    }
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: MemoryStore,
    pub notifier: Arc<CapturingNotifier>,
    pub clock: Arc<ManualClock>,
    ctx: ServiceContext,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let store = MemoryStore::new();
        let notifier = Arc::new(CapturingNotifier::default());
        let clock = Arc::new(ManualClock::default());

        let ctx = ServiceContext::builder()
            .memory_store(&store)
            .jwt_service(Arc::new(JwtService::new(
                &config.jwt.secret,
                config.jwt.session_ttl_secs,
            )))
            .identity_verifier(identity_verifier(&config))
            .notifier(notifier.clone())
            .clock(clock.clone())
            .settings(LifecycleSettings::from_config(&config))
            .build()?;

        let app = create_app(AppState::new(ctx.clone(), config));

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            store,
            notifier,
            clock,
            ctx,
            _handle: handle,
        })
    }

    /// Run one purge sweep at the server's current time
    pub async fn sweep(&self) -> Result<PurgeReport> {
        let scheduler = PurgeScheduler::new(self.ctx.clone());
        Ok(scheduler.run_once(self.ctx.now()).await?)
    }

    /// Get base URL for the API
    pub fn api_url(&self, path: &str) -> String {
        format!("http://{}/api/v1{}", self.addr, path)
    }

    /// Make a GET request outside the API prefix
    pub async fn get_root(&self, path: &str) -> Result<Response> {
        let url = format!("http://{}{}", self.addr, path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.api_url(path)).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.api_url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.api_url(path)).json(body).send().await?)
    }

    /// Make a POST request with auth token and no body
    pub async fn post_auth_empty(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.api_url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Make a POST request with auth token
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .post(self.api_url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a PUT request with auth token
    pub async fn put_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .put(self.api_url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a PATCH request with auth token
    pub async fn patch_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .patch(self.api_url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a DELETE request with auth token
    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .delete(self.api_url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }
}

/// Configuration for tests; no environment variables are read
pub fn test_config() -> Result<AppConfig> {
    let config = AppConfig::from_lookup(|name| {
        let value = match name {
            "API_PORT" => "0",
            "DATABASE_URL" => "postgres://unused/songbook",
            "JWT_SECRET" => JWT_SECRET,
            "FEDERATED_ASSERTION_SECRET" => BROKER_SECRET,
            "RATE_LIMIT_REQUESTS_PER_SECOND" => "1000",
            "RATE_LIMIT_BURST" => "1000",
            _ => return None,
        };
        Some(value.to_string())
    })
    .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

    Ok(config)
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error response and return its `error.code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| anyhow::anyhow!("Error body without code: {body}"))
}
