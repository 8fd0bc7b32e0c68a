//! Server setup and initialization
//!
//! Provides the application builder, the production wiring over PostgreSQL
//! and the server runner with graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use songbook_common::auth::{DisabledVerifier, IdentityVerifier, SharedSecretVerifier};
use songbook_common::{AppConfig, AppError, JwtService};
use songbook_db::{
    create_pool, run_migrations, DatabaseConfig, PgAccountRepository, PgSongRepository,
    PgVerificationCodeRepository,
};
use songbook_service::{LifecycleSettings, PurgeSchedulerHandle, ServiceContext};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );
    let health = apply_middleware(health_routes());

    api.merge(health).with_state(state)
}

/// Identity verifier for federated login, disabled without a broker secret
pub fn identity_verifier(config: &AppConfig) -> Arc<dyn IdentityVerifier> {
    match &config.federated.assertion_secret {
        Some(secret) => Arc::new(SharedSecretVerifier::new(secret)),
        None => {
            info!("FEDERATED_ASSERTION_SECRET not set; federated login disabled");
            Arc::new(DisabledVerifier)
        }
    }
}

/// Connect to PostgreSQL, apply migrations and wire the services
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    run_migrations(&pool, &db_config.migrations_dir)
        .await
        .map_err(|e| {
            AppError::Database(format!(
                "Migration failed ({}): {e}",
                db_config.migrations_dir.display()
            ))
        })?;
    info!(dir = %db_config.migrations_dir.display(), "Database migrations applied");

    let jwt_service = Arc::new(JwtService::new(&config.jwt.secret, config.jwt.session_ttl_secs));

    let service_context = ServiceContext::builder()
        .account_repo(Arc::new(PgAccountRepository::new(pool.clone())))
        .code_repo(Arc::new(PgVerificationCodeRepository::new(pool.clone())))
        .song_repo(Arc::new(PgSongRepository::new(pool)))
        .jwt_service(jwt_service)
        .identity_verifier(identity_verifier(&config))
        .settings(LifecycleSettings::from_config(&config))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Start the purge sweep for this state's services
pub fn spawn_purge_scheduler(state: &AppState) -> PurgeSchedulerHandle {
    state.purge_scheduler().start()
}

/// Run the HTTP server until `shutdown` resolves
pub async fn run_server<F>(app: Router, addr: SocketAddr, shutdown: F) -> Result<(), AppError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let state = create_app_state(config).await?;
    let scheduler = spawn_purge_scheduler(&state);
    let app = create_app(state);

    let result = run_server(app, addr, shutdown_signal()).await;

    scheduler.shutdown().await;
    result
}
