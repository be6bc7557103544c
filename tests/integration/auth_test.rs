//! Integration tests for the login flows.

mod helpers;

use axum::http::StatusCode;
use helpers::{LONG_TERM_KEY, PASSWORD, SERVER_SECRET, TestApp, basic, claims};

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    app.add_user("a1b2c3", "alice@example.org", true);

    let auth = basic("alice@example.org", PASSWORD);
    let response = app
        .request("POST", "/login", &[("authorization", auth.as_str())])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["userid"], "a1b2c3");
    assert!(response.body.get("password_hash").is_none());

    let token = response.token().expect("token header");
    let claims = claims(&token);
    assert_eq!(claims["usr"], "a1b2c3");
    assert_eq!(claims["svr"], "no");
    assert_eq!(claims["dur"], 3600);
    let lifetime = claims["exp"].as_i64().unwrap() - chrono::Utc::now().timestamp();
    assert!((3590..=3600).contains(&lifetime));
    assert_eq!(app.sessions.len(), 1);
}

#[tokio::test]
async fn test_login_missing_credentials() {
    let app = TestApp::new();

    let response = app.request("POST", "/login", &[]).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], 400);
    assert_eq!(response.reason(), "Missing id and/or password");

    let no_password = basic("alice@example.org", "");
    let response = app
        .request("POST", "/login", &[("authorization", no_password.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("POST", "/login", &[("authorization", "Basic not-base64!")])
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    app.add_user("a1b2c3", "alice@example.org", true);

    let auth = basic("alice@example.org", "not the password");
    let response = app
        .request("POST", "/login", &[("authorization", auth.as_str())])
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), "No user matched the given details");
    assert!(response.token().is_none());
    assert!(app.sessions.is_empty());
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = TestApp::new();

    let auth = basic("nobody@example.org", PASSWORD);
    let response = app
        .request("POST", "/login", &[("authorization", auth.as_str())])
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), "No user matched the given details");
}

#[tokio::test]
async fn test_login_unverified() {
    let app = TestApp::new();
    app.add_user("b2c3d4", "bob@example.org", false);

    let auth = basic("bob@example.org", PASSWORD);
    let response = app
        .request("POST", "/login", &[("authorization", auth.as_str())])
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.reason(), "The user hasn't verified this account yet");
}

#[tokio::test]
async fn test_verification_secret_bypass() {
    let app = TestApp::with_auth(|auth| auth.verification_secret = Some("+skip".to_string()));
    app.add_user("c3d4e5", "carol+skip@example.org", false);

    let auth = basic("carol+skip@example.org", PASSWORD);
    let response = app
        .request("POST", "/login", &[("authorization", auth.as_str())])
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_duration_override() {
    let app = TestApp::new();
    app.add_user("a1b2c3", "alice@example.org", true);

    let auth = basic("alice@example.org", PASSWORD);
    let response = app
        .request(
            "POST",
            "/login",
            &[("authorization", auth.as_str()), ("tokenduration", "7200.5")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(claims(&response.token().unwrap())["dur"], 7200);

    let response = app
        .request(
            "POST",
            "/login",
            &[("authorization", auth.as_str()), ("tokenduration", "-10")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(claims(&response.token().unwrap())["dur"], 3600);
}

#[tokio::test]
async fn test_login_duration_out_of_range() {
    let app = TestApp::new();
    app.add_user("a1b2c3", "alice@example.org", true);
    let auth = basic("alice@example.org", PASSWORD);

    for duration in ["1e30", "9223372036854775807"] {
        let response = app
            .request(
                "POST",
                "/login",
                &[("authorization", auth.as_str()), ("tokenduration", duration)],
            )
            .await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR, "{duration}");
        assert_eq!(response.reason(), "Error updating token");
        assert!(response.token().is_none());
    }
    assert!(app.sessions.is_empty());
}

#[tokio::test]
async fn test_long_term_login() {
    let app = TestApp::new();
    app.add_user("a1b2c3", "alice@example.org", true);
    let auth = basic("alice@example.org", PASSWORD);

    let response = app
        .request(
            "POST",
            &format!("/login/{LONG_TERM_KEY}"),
            &[("authorization", auth.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(claims(&response.token().unwrap())["dur"], 30 * 86_400);

    // A wrong key is an ordinary login.
    let response = app
        .request(
            "POST",
            "/login/not-the-key",
            &[("authorization", auth.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(claims(&response.token().unwrap())["dur"], 3600);

    let response = app.request("POST", "/login/not-the-key", &[]).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_long_term_disabled_without_key() {
    let app = TestApp::with_auth(|auth| auth.long_term_key.clear());
    app.add_user("a1b2c3", "alice@example.org", true);
    let auth = basic("alice@example.org", PASSWORD);

    let response = app
        .request("POST", "/login/x", &[("authorization", auth.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(claims(&response.token().unwrap())["dur"], 3600);
}

#[tokio::test]
async fn test_server_login() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/serverlogin",
            &[
                ("x-tidepool-server-name", "shoreline"),
                ("x-tidepool-server-secret", SERVER_SECRET),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let claims = claims(&response.token().unwrap());
    assert_eq!(claims["svr"], "yes");
    assert_eq!(claims["usr"], "shoreline");
    assert_eq!(claims["dur"], 86_400);
}

#[tokio::test]
async fn test_server_login_rejections() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/serverlogin",
            &[
                ("x-tidepool-server-name", "shoreline"),
                ("x-tidepool-server-secret", "guess"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), "Wrong password");

    let response = app
        .request(
            "POST",
            "/serverlogin",
            &[("x-tidepool-server-name", "shoreline")],
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.reason(), "Missing id and/or password");
}

#[tokio::test]
async fn test_oauth_login() {
    let app = TestApp::new();
    app.add_user("a1b2c3", "alice@example.org", true);
    app.identity.register("upstream-token", "a1b2c3", Some("child01"));

    let response = app
        .request(
            "POST",
            "/oauthlogin",
            &[("authorization", "Bearer upstream-token")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["oauthUser"]["userid"], "a1b2c3");
    assert_eq!(response.body["oauthTarget"], "child01");
    assert_eq!(claims(&response.token().unwrap())["dur"], 3600);
}

#[tokio::test]
async fn test_oauth_login_rejections() {
    let app = TestApp::new();
    app.identity.register("orphan-token", "ghost", None);

    let response = app.request("POST", "/oauthlogin", &[]).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.reason(), "Authorization header is required");

    let response = app
        .request("POST", "/oauthlogin", &[("authorization", "Basic abc")])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), "Authorization header is invalid");

    let response = app
        .request("POST", "/oauthlogin", &[("authorization", "Bearer unknown")])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), "Authorization header is invalid");

    let response = app
        .request(
            "POST",
            "/oauthlogin",
            &[("authorization", "Bearer orphan-token")],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), "No user matched the given details");
}

#[tokio::test]
async fn test_rejections_are_counted() {
    let app = TestApp::new();
    app.add_user("a1b2c3", "alice@example.org", true);

    let wrong = basic("alice@example.org", "nope");
    app.request("POST", "/login", &[("authorization", wrong.as_str())])
        .await;
    app.request("POST", "/login", &[("authorization", wrong.as_str())])
        .await;
    app.request("POST", "/login", &[]).await;

    let response = app.request("GET", "/metrics", &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["no_match"], 2);
    assert_eq!(response.body["missing_id_pw"], 1);
    assert_eq!(response.body["pw_wrong"], 0);
}
