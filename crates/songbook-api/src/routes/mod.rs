//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{admin, auth, health, songs, users};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(admin_routes())
        .merge(song_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/verify-email", post(auth::verify_email))
        .route("/auth/login", post(auth::login))
        .route("/auth/federated", post(auth::federated_login))
        .route("/auth/password", put(auth::change_password))
}

/// Current account and deletion lifecycle
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/@me",
            get(users::get_current_user).patch(users::update_current_user),
        )
        .route(
            "/users/@me/deletion",
            get(users::get_deletion_status)
                .post(users::request_deletion)
                .delete(users::cancel_deletion),
        )
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(admin::list_accounts))
        .route("/admin/users/:account_id/block", put(admin::set_blocked))
}

fn song_routes() -> Router<AppState> {
    Router::new()
        .route("/songs", get(songs::list_songs).post(songs::create_song))
        .route("/songs/my", get(songs::list_my_songs))
}
