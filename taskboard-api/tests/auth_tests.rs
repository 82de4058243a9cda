/// Integration tests for signup, login, logout and session checks

mod common;

use axum::http::StatusCode;
use common::{TestContext, TEST_PASSWORD};
use serde_json::json;
use taskboard_shared::models::user::User;

#[tokio::test]
async fn test_signup_creates_user_and_session() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post(
            "/api/signup",
            None,
            json!({"username": "alice", "email": "alice@example.com", "password": "pw12345"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["username"], "alice");
    assert_eq!(response.body["email"], "alice@example.com");
    assert!(response.body["id"].is_i64());
    assert!(response.body["created_at"].is_string());
    assert!(response.body.get("password_hash").is_none());
    assert!(response.body.get("projects").is_none());

    let set_cookie = response.headers["set-cookie"].to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));

    let cookie = response.session_cookie().unwrap();
    let session = ctx.get("/api/check-session", Some(&cookie)).await;
    assert_eq!(session.status, StatusCode::OK);
    assert_eq!(session.body["username"], "alice");

    // Stored hash is an argon2 hash, not the password
    let user = User::find_by_username(&ctx.db, "alice").await.unwrap().unwrap();
    assert!(user.password_hash.starts_with("$argon2id$"));
    assert_ne!(user.password_hash, "pw12345");
}

#[tokio::test]
async fn test_signup_requires_all_fields() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post("/api/signup", None, json!({"username": "alice", "password": "pw"}))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Username, email, and password are required");
}

#[tokio::test]
async fn test_signup_short_username_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post(
            "/api/signup",
            None,
            json!({"username": "ab", "email": "ab@example.com", "password": TEST_PASSWORD}),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Username must be at least 3 characters long");
    assert_eq!(response.body["details"][0]["field"], "username");

    // Nothing persisted
    assert_eq!(User::count(&ctx.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_signup_email_without_at_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post(
            "/api/signup",
            None,
            json!({"username": "alice", "email": "alice.example.com", "password": TEST_PASSWORD}),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Invalid email address");
    assert_eq!(User::count(&ctx.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_signup_duplicate_username_and_email() {
    let ctx = TestContext::new().await;
    ctx.signup("alice").await;

    let response = ctx
        .post(
            "/api/signup",
            None,
            json!({"username": "alice", "email": "other@example.com", "password": TEST_PASSWORD}),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Username already exists");

    let response = ctx
        .post(
            "/api/signup",
            None,
            json!({"username": "alice2", "email": "alice@example.com", "password": TEST_PASSWORD}),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Email already exists");

    assert_eq!(User::count(&ctx.db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_login_success_starts_session() {
    let ctx = TestContext::new().await;
    ctx.signup("alice").await;

    let response = ctx
        .post(
            "/api/login",
            None,
            json!({"username": "alice", "password": TEST_PASSWORD}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "alice");

    let cookie = response.session_cookie().unwrap();
    let projects = ctx.get("/api/projects", Some(&cookie)).await;
    assert_eq!(projects.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = TestContext::new().await;
    ctx.signup("alice").await;

    let wrong_password = ctx
        .post("/api/login", None, json!({"username": "alice", "password": "nope"}))
        .await;
    let unknown_user = ctx
        .post("/api/login", None, json!({"username": "mallory", "password": "nope"}))
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_user.body);
    assert_eq!(wrong_password.message(), "Invalid username or password");
    assert!(wrong_password.session_cookie().is_none());
}

#[tokio::test]
async fn test_login_requires_fields() {
    let ctx = TestContext::new().await;

    let response = ctx.post("/api/login", None, json!({"username": "alice"})).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Username and password are required");
}

#[tokio::test]
async fn test_login_rotates_session() {
    let ctx = TestContext::new().await;
    let alice = ctx.signup("alice").await;

    let response = ctx
        .post(
            "/api/login",
            Some(&alice.cookie),
            json!({"username": "alice", "password": TEST_PASSWORD}),
        )
        .await;
    let new_cookie = response.session_cookie().unwrap();
    assert_ne!(new_cookie, alice.cookie);

    // The old token no longer authenticates
    let old = ctx.get("/api/check-session", Some(&alice.cookie)).await;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.sessions.len().await, 1);
}

#[tokio::test]
async fn test_logout_clears_session() {
    let ctx = TestContext::new().await;
    let alice = ctx.signup("alice").await;

    let response = ctx
        .request(axum::http::Method::POST, "/api/logout", Some(&alice.cookie), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Logged out successfully");
    assert!(response.headers["set-cookie"]
        .to_str()
        .unwrap()
        .contains("Max-Age=0"));

    let session = ctx.get("/api/check-session", Some(&alice.cookie)).await;
    assert_eq!(session.status, StatusCode::UNAUTHORIZED);
    assert!(ctx.sessions.is_empty().await);
}

#[tokio::test]
async fn test_logout_without_session_succeeds() {
    let ctx = TestContext::new().await;

    let response = ctx
        .request(axum::http::Method::POST, "/api/logout", None, None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_check_session_anonymous() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/api/check-session", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "Not authenticated");
}

#[tokio::test]
async fn test_check_session_after_user_deleted() {
    let ctx = TestContext::new().await;
    let alice = ctx.signup("alice").await;

    User::delete(&ctx.db, alice.id).await.unwrap();

    let response = ctx.get("/api/check-session", Some(&alice.cookie)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "Not authenticated");
}

#[tokio::test]
async fn test_tampered_cookie_is_anonymous() {
    let ctx = TestContext::new().await;
    let alice = ctx.signup("alice").await;

    let (name, value) = alice.cookie.split_once('=').unwrap();
    let (token, _signature) = value.split_once('.').unwrap();
    let forged = format!("{}={}.{}", name, token, "0".repeat(64));

    let response = ctx.get("/api/check-session", Some(&forged)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = ctx.get("/api/projects", Some(&forged)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_resources_require_session() {
    let ctx = TestContext::new().await;

    for uri in ["/api/projects", "/api/projects/1", "/api/tasks/1", "/api/dashboard"] {
        let response = ctx.get(uri, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(response.message(), "Authentication required");
    }

    let response = ctx.post("/api/projects", None, json!({"name": "Nope"})).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .request(
            axum::http::Method::POST,
            "/api/login",
            None,
            Some(json!(["not", "an", "object"])),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "bad_request");
}

#[tokio::test]
async fn test_health_is_public() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["database"], "connected");
    assert_eq!(response.headers["x-content-type-options"], "nosniff");
}
