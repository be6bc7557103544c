//! Integration tests for refresh, check-token, logout, and status.

mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use helpers::{API_SECRET, TestApp, claims};

use tessera_auth::{DurationPolicy, TokenEncoder};
use tessera_core::traits::session_store::SessionStore;
use tessera_core::types::session::SessionRecord;

/// Mint a token outside the service and give it a live session record.
async fn planted_token(app: &TestApp, secret: &str, minted_ago: Duration) -> String {
    let minted_at = Utc::now() - minted_ago;
    let token = TokenEncoder::new(secret, DurationPolicy::new(3600))
        .mint_at("a1b2c3", false, None, minted_at)
        .expect("mint")
        .token;
    app.sessions
        .put(&SessionRecord::new(token.clone(), minted_at))
        .await
        .expect("put");
    token
}

#[tokio::test]
async fn test_refresh_issues_new_token() {
    let app = TestApp::new();
    app.add_user("a1b2c3", "alice@example.org", true);
    let token = app.login("alice@example.org").await;

    let response = app
        .request("GET", "/login", &[("x-tidepool-session-token", token.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["userid"], "a1b2c3");
    assert_eq!(response.body["isserver"], false);
    assert!(response.token().is_some());

    // The original token stays valid until revoked.
    let response = app
        .request("GET", "/login", &[("x-tidepool-session-token", token.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_keeps_duration() {
    let app = TestApp::new();
    app.add_user("a1b2c3", "alice@example.org", true);
    let auth = helpers::basic("alice@example.org", helpers::PASSWORD);
    let login = app
        .request(
            "POST",
            "/login",
            &[("authorization", auth.as_str()), ("tokenduration", "10800")],
        )
        .await;
    let token = login.token().unwrap();

    let response = app
        .request("GET", "/login", &[("x-tidepool-session-token", token.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(claims(&response.token().unwrap())["dur"], 10_800);
}

#[tokio::test]
async fn test_refresh_without_token() {
    let app = TestApp::new();

    let response = app.request("GET", "/login", &[]).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), "No x-tidepool-session-token was found");

    let response = app
        .request("GET", "/login", &[("x-tidepool-session-token", "garbage")])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes() {
    let app = TestApp::new();
    app.add_user("a1b2c3", "alice@example.org", true);
    let token = app.login("alice@example.org").await;

    let response = app
        .request("POST", "/logout", &[("x-tidepool-session-token", token.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(app.sessions.is_empty());

    let response = app
        .request("GET", "/login", &[("x-tidepool-session-token", token.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_never_fails() {
    let app = TestApp::new();

    let response = app.request("POST", "/logout", &[]).await;
    assert_eq!(response.status, StatusCode::OK);

    app.sessions.set_unavailable(true);
    let response = app
        .request("POST", "/logout", &[("x-tidepool-session-token", "whatever")])
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_check_token() {
    let app = TestApp::new();
    app.add_user("a1b2c3", "alice@example.org", true);
    let user_token = app.login("alice@example.org").await;
    let server_token = app.server_token().await;

    let response = app
        .request(
            "GET",
            &format!("/token/{user_token}"),
            &[("x-tidepool-session-token", server_token.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["userid"], "a1b2c3");
    assert_eq!(response.body["isserver"], false);
}

#[tokio::test]
async fn test_check_token_requires_server_caller() {
    let app = TestApp::new();
    app.add_user("a1b2c3", "alice@example.org", true);
    let user_token = app.login("alice@example.org").await;

    let response = app
        .request(
            "GET",
            &format!("/token/{user_token}"),
            &[("x-tidepool-session-token", user_token.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), "No x-tidepool-session-token was found");

    let response = app
        .request("GET", &format!("/token/{user_token}"), &[])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), "No x-tidepool-session-token was found");
}

#[tokio::test]
async fn test_check_token_revoked_target() {
    let app = TestApp::new();
    app.add_user("a1b2c3", "alice@example.org", true);
    let user_token = app.login("alice@example.org").await;
    let server_token = app.server_token().await;

    app.request("POST", "/logout", &[("x-tidepool-session-token", user_token.as_str())])
        .await;

    let response = app
        .request(
            "GET",
            &format!("/token/{user_token}"),
            &[("x-tidepool-session-token", server_token.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), "No x-tidepool-session-token was found");
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let app = TestApp::new();
    let token = planted_token(&app, API_SECRET, Duration::hours(2)).await;

    let response = app
        .request("GET", "/login", &[("x-tidepool-session-token", token.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_foreign_secret_rejected() {
    let app = TestApp::new();
    let token = planted_token(&app, "some-other-secret", Duration::zero()).await;

    let response = app
        .request("GET", "/login", &[("x-tidepool-session-token", token.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_previous_secret_still_verifies() {
    let app = TestApp::with_auth(|auth| auth.previous_secret = Some("rotated-out".to_string()));
    let token = planted_token(&app, "rotated-out", Duration::zero()).await;

    let response = app
        .request("GET", "/login", &[("x-tidepool-session-token", token.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // The refreshed token is signed with the current secret.
    let refreshed = response.token().unwrap();
    let response = app
        .request("GET", "/login", &[("x-tidepool-session-token", refreshed.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_store_outage() {
    let app = TestApp::new();
    app.add_user("a1b2c3", "alice@example.org", true);
    let token = app.login("alice@example.org").await;

    app.sessions.set_unavailable(true);
    let response = app
        .request("GET", "/login", &[("x-tidepool-session-token", token.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.reason(), "Error checking service status");
}

#[tokio::test]
async fn test_status() {
    let app = TestApp::new();

    let response = app.request("GET", "/status", &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text, "OK");

    app.users.set_unavailable(true);
    let response = app.request("GET", "/status", &[]).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["code"], 500);
    assert_eq!(response.reason(), "Error checking service status");
}
