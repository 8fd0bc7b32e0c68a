//! API Integration Tests
//!
//! Each test starts the full axum application on a local port over the
//! in-memory store, so no external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use chrono::{Duration, Utc};
use integration_tests::{
    assert_error, assert_json, assert_status, fixtures::*, TestServer, BROKER_SECRET,
};
use reqwest::StatusCode;
use serde_json::json;
use songbook_common::auth::{sign_assertion, FederatedIdentity};
use songbook_core::AccountId;

/// Register, read the emailed code and verify
async fn signup(server: &TestServer, reg: &RegisterRequest) -> AuthResponse {
    let response = server.post("/auth/register", reg).await.unwrap();
    assert_status(response, StatusCode::ACCEPTED).await.unwrap();

    let code = server.notifier.last_code_for(&reg.email).unwrap();
    let response = server
        .post("/auth/verify-email", &VerifyEmailRequest::from_register(reg, &code))
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get_root("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get_root("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], json!("healthy"));
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/songs").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Registration Tests
// ============================================================================

#[tokio::test]
async fn test_register_and_verify() {
    let server = TestServer::start().await.unwrap();
    let reg = RegisterRequest::unique();

    let response = server.post("/auth/register", &reg).await.unwrap();
    let pending: RegistrationResponse = assert_json(response, StatusCode::ACCEPTED).await.unwrap();
    assert_eq!(pending.email, reg.email);
    assert!(!pending.delivery_failed);
    assert_eq!(server.store.account_count(), 0);

    let code = server.notifier.last_code_for(&reg.email).unwrap();
    let response = server
        .post("/auth/verify-email", &VerifyEmailRequest::from_register(&reg, &code))
        .await
        .unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(auth.token_type, "Bearer");
    assert_eq!(auth.account.username, reg.username);
    assert_eq!(auth.account.provider, "local");
    assert!(!auth.pending_deletion);

    // The code was single-use
    let response = server
        .post("/auth/verify-email", &VerifyEmailRequest::from_register(&reg, &code))
        .await
        .unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let server = TestServer::start().await.unwrap();
    let reg = RegisterRequest::unique();
    signup(&server, &reg).await;

    let response = server.post("/auth/register", &reg).await.unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "EMAIL_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_register_validation_errors() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post(
            "/auth/register",
            &json!({"email": "not-an-email", "password": "TestPass123", "username": "x1"}),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");

    let response = server
        .post("/auth/register", &json!({"email": "a@example.com"}))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login() {
    let server = TestServer::start().await.unwrap();
    let reg = RegisterRequest::unique();
    let created = signup(&server, &reg).await;

    let response = server
        .post("/auth/login", &LoginRequest::from_register(&reg))
        .await
        .unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(auth.account.id, created.account.id);

    let response = server
        .post(
            "/auth/login",
            &LoginRequest {
                email: reg.email.clone(),
                password: "WrongPass123".to_string(),
            },
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_federated_login_creates_account() {
    let server = TestServer::start().await.unwrap();
    let identity = FederatedIdentity {
        subject: "broker|77".to_string(),
        email: "fed@example.com".to_string(),
        username: "Fed".to_string(),
        picture_url: None,
    };
    let assertion = sign_assertion(
        BROKER_SECRET,
        &identity,
        (Utc::now() + Duration::minutes(5)).timestamp(),
    )
    .unwrap();

    let response = server
        .post("/auth/federated", &json!({ "assertion": assertion }))
        .await
        .unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(auth.account.provider, "federated");
    assert_eq!(auth.account.email, "fed@example.com");

    let response = server
        .post("/auth/federated", &json!({ "assertion": "garbage" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_change_password() {
    let server = TestServer::start().await.unwrap();
    let reg = RegisterRequest::unique();
    let auth = signup(&server, &reg).await;

    let response = server
        .put_auth(
            "/auth/password",
            &auth.token,
            &json!({"current_password": TEST_PASSWORD, "new_password": "BrandNew456"}),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .post(
            "/auth/login",
            &LoginRequest {
                email: reg.email.clone(),
                password: "BrandNew456".to_string(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Gate Tests
// ============================================================================

#[tokio::test]
async fn test_missing_and_invalid_tokens() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/users/@me").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_AUTH");

    let response = server.get_auth("/users/@me", "not.a.token").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_TOKEN");
}

#[tokio::test]
async fn test_blocked_account_refused_with_valid_token() {
    let server = TestServer::start().await.unwrap();
    let admin = signup(&server, &RegisterRequest::unique()).await;
    let target = signup(&server, &RegisterRequest::unique()).await;

    let admin_id: AccountId = admin.account.id.parse().unwrap();
    assert!(server.store.set_admin(admin_id, true));

    // Non-admins cannot block
    let response = server
        .put_auth(
            &format!("/admin/users/{}/block", admin.account.id),
            &target.token,
            &json!({"blocked": true}),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "ADMIN_REQUIRED");

    let response = server
        .put_auth(
            &format!("/admin/users/{}/block", target.account.id),
            &admin.token,
            &json!({"blocked": true}),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get_auth("/users/@me", &target.token).await.unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "ACCOUNT_BLOCKED");
}

#[tokio::test]
async fn test_block_unknown_account() {
    let server = TestServer::start().await.unwrap();
    let admin = signup(&server, &RegisterRequest::unique()).await;
    server
        .store
        .set_admin(admin.account.id.parse().unwrap(), true);

    let response = server
        .put_auth(
            &format!("/admin/users/{}/block", AccountId::new()),
            &admin.token,
            &json!({"blocked": true}),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .put_auth("/admin/users/not-a-uuid/block", &admin.token, &json!({"blocked": true}))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_admin_cannot_block_itself() {
    let server = TestServer::start().await.unwrap();
    let admin = signup(&server, &RegisterRequest::unique()).await;
    server
        .store
        .set_admin(admin.account.id.parse().unwrap(), true);

    let response = server
        .put_auth(
            &format!("/admin/users/{}/block", admin.account.id),
            &admin.token,
            &json!({"blocked": true}),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "CANNOT_BLOCK_SELF");

    let response = server.get_auth("/users/@me", &admin.token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_admin_lists_accounts() {
    let server = TestServer::start().await.unwrap();
    let admin = signup(&server, &RegisterRequest::unique()).await;
    let member = signup(&server, &RegisterRequest::unique()).await;
    server
        .store
        .set_admin(admin.account.id.parse().unwrap(), true);

    let response = server.get_auth("/admin/users", &member.token).await.unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "ADMIN_REQUIRED");

    let response = server.post_auth_empty("/users/@me/deletion", &member.token).await.unwrap();
    assert!(response.status().is_success());

    let response = server
        .get_auth("/admin/users?limit=10", &admin.token)
        .await
        .unwrap();
    let page: AccountPage = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.limit, 10);
    assert_eq!(page.offset, 0);
    assert_eq!(page.data.len(), 2);

    let admin_row = page.data.iter().find(|a| a.id == admin.account.id).unwrap();
    assert!(admin_row.is_admin);
    assert!(!admin_row.pending_deletion);

    let member_row = page.data.iter().find(|a| a.id == member.account.id).unwrap();
    assert_eq!(member_row.email, member.account.email);
    assert!(!member_row.is_admin);
    assert!(!member_row.is_blocked);
    assert!(member_row.pending_deletion);
}

#[tokio::test]
async fn test_update_current_user_profile() {
    let server = TestServer::start().await.unwrap();
    let auth = signup(&server, &RegisterRequest::unique()).await;

    let response = server
        .patch_auth(
            "/users/@me",
            &auth.token,
            &json!({"picture_url": "https://cdn.example.com/me.png"}),
        )
        .await
        .unwrap();
    let current: CurrentAccountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(current.username, auth.account.username);
    assert_eq!(current.picture_url.as_deref(), Some("https://cdn.example.com/me.png"));

    let response = server
        .patch_auth("/users/@me", &auth.token, &json!({"username": "renamed"}))
        .await
        .unwrap();
    let current: CurrentAccountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(current.username, "renamed");
    assert_eq!(current.picture_url.as_deref(), Some("https://cdn.example.com/me.png"));

    let response = server
        .patch_auth("/users/@me", &auth.token, &json!({"picture_url": "not a url"}))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .patch_auth("/users/@me", &auth.token, &json!({}))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Song Tests
// ============================================================================

#[tokio::test]
async fn test_songs_create_and_list() {
    let server = TestServer::start().await.unwrap();
    let auth = signup(&server, &RegisterRequest::unique()).await;
    let other = signup(&server, &RegisterRequest::unique()).await;

    for token in [&auth.token, &auth.token, &other.token] {
        let response = server
            .post_auth("/songs", token, &CreateSongRequest::unique())
            .await
            .unwrap();
        let song: SongResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
        assert!(!song.title.is_empty());
    }

    let response = server.get_auth("/songs/my", &auth.token).await.unwrap();
    let mine: Vec<SongResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|s| s.created_by == auth.account.id));

    let response = server.get_auth("/songs?limit=2", &auth.token).await.unwrap();
    let page: SongPage = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.limit, 2);
    assert_eq!(page.offset, 0);

    let response = server.get_auth("/songs?limit=500", &auth.token).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Deletion Lifecycle Tests
// ============================================================================

#[tokio::test]
async fn test_deletion_request_conflicts_and_blocks_new_songs() {
    let server = TestServer::start().await.unwrap();
    let auth = signup(&server, &RegisterRequest::unique()).await;

    let response = server.post_auth_empty("/users/@me/deletion", &auth.token).await.unwrap();
    let scheduled: DeletionScheduledResponse =
        assert_json(response, StatusCode::ACCEPTED).await.unwrap();
    assert!(!scheduled.purge_deadline.is_empty());

    let response = server.post_auth_empty("/users/@me/deletion", &auth.token).await.unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "DELETION_ALREADY_REQUESTED");

    let response = server
        .post_auth("/songs", &auth.token, &CreateSongRequest::unique())
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "ACCOUNT_PENDING_DELETION");

    // Still allowed to read its own profile
    let response = server.get_auth("/users/@me", &auth.token).await.unwrap();
    let me: CurrentAccountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(me.deletion.is_deleted);
    assert_eq!(me.deletion.remaining_seconds, Some(14 * 24 * 60 * 60));
}

#[tokio::test]
async fn test_cancel_without_request() {
    let server = TestServer::start().await.unwrap();
    let auth = signup(&server, &RegisterRequest::unique()).await;

    let response = server.delete_auth("/users/@me/deletion", &auth.token).await.unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "DELETION_NOT_REQUESTED");
}

#[tokio::test]
async fn test_sweep_purges_account_and_songs() {
    let server = TestServer::start().await.unwrap();
    let doomed = signup(&server, &RegisterRequest::unique()).await;
    let keeper = signup(&server, &RegisterRequest::unique()).await;

    for token in [&doomed.token, &doomed.token, &keeper.token] {
        let response = server
            .post_auth("/songs", token, &CreateSongRequest::unique())
            .await
            .unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    let response = server.post_auth_empty("/users/@me/deletion", &doomed.token).await.unwrap();
    assert_status(response, StatusCode::ACCEPTED).await.unwrap();

    server.clock.advance(Duration::days(14) - Duration::seconds(1));
    let report = server.sweep().await.unwrap();
    assert_eq!(report.purged, 0);

    server.clock.advance(Duration::seconds(2));
    let report = server.sweep().await.unwrap();
    assert_eq!(report.purged, 1);
    assert_eq!(report.songs_deleted, 2);
    assert_eq!(server.store.song_count(), 1);
    assert_eq!(server.store.account_count(), 1);
}

#[tokio::test]
async fn test_alice_end_to_end() {
    let server = TestServer::start().await.unwrap();
    let reg = RegisterRequest::for_email("alice@example.com", "alice");

    // register → receive code
    let response = server.post("/auth/register", &reg).await.unwrap();
    assert_status(response, StatusCode::ACCEPTED).await.unwrap();
    let code = server.notifier.last_code_for(&reg.email).unwrap();

    // wrong code fails
    let wrong = if code == "111111" { "222222" } else { "111111" };
    let response = server
        .post("/auth/verify-email", &VerifyEmailRequest::from_register(&reg, wrong))
        .await
        .unwrap();
    let err = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(err, "INVALID_VERIFICATION_CODE");

    // right code succeeds; no deletion scheduled
    let response = server
        .post("/auth/verify-email", &VerifyEmailRequest::from_register(&reg, &code))
        .await
        .unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    let response = server.get_auth("/users/@me", &auth.token).await.unwrap();
    let me: CurrentAccountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.email, "alice@example.com");
    assert!(me.deletion.deleted_at.is_none());

    // request deletion: deadline 14 days out
    let response = server.post_auth_empty("/users/@me/deletion", &auth.token).await.unwrap();
    let scheduled: serde_json::Value = assert_json(response, StatusCode::ACCEPTED).await.unwrap();
    let requested: chrono::DateTime<Utc> =
        serde_json::from_value(scheduled["delete_requested_at"].clone()).unwrap();
    let deadline: chrono::DateTime<Utc> =
        serde_json::from_value(scheduled["purge_deadline"].clone()).unwrap();
    assert_eq!(deadline - requested, Duration::days(14));

    // login still works and reports pending deletion
    let response = server
        .post("/auth/login", &LoginRequest::from_register(&reg))
        .await
        .unwrap();
    let relogin: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(relogin.pending_deletion);

    // cancel
    let response = server.delete_auth("/users/@me/deletion", &relogin.token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    // status: not deleted
    let response = server.get_auth("/users/@me/deletion", &relogin.token).await.unwrap();
    let status: DeletionStatusResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!status.is_deleted);
    assert!(status.delete_requested_at.is_none());
}
