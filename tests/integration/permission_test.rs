//! Integration tests for permission-gated user lookup and custodial release.

mod helpers;

use axum::http::StatusCode;
use helpers::TestApp;

use tessera_core::error::ErrorKind;
use tessera_core::types::permission::{Permission, PermissionSet};
use tessera_core::types::status::StatusReason;

fn setup() -> TestApp {
    let app = TestApp::new();
    app.add_user("parent01", "parent@example.org", true);
    app.add_user("child02", "child@example.org", true);
    app
}

#[tokio::test]
async fn test_user_info_self() {
    let app = setup();
    let token = app.login("parent@example.org").await;

    let response = app
        .request("GET", "/user", &[("x-tidepool-session-token", token.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["userid"], "parent01");

    let response = app
        .request(
            "GET",
            "/user/parent01",
            &[("x-tidepool-session-token", token.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.permissions.lookup_calls(), 0);
}

#[tokio::test]
async fn test_user_info_requires_token() {
    let app = setup();

    let response = app.request("GET", "/user/child02", &[]).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), "Not authorized for requested operation");
}

#[tokio::test]
async fn test_user_info_without_permission() {
    let app = setup();
    let token = app.login("parent@example.org").await;
    app.permissions.grant(
        "parent01",
        "child02",
        PermissionSet::from([Permission::View, Permission::Upload]),
    );

    let response = app
        .request(
            "GET",
            "/user/child02",
            &[("x-tidepool-session-token", token.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), "Not authorized for requested operation");
}

#[tokio::test]
async fn test_user_info_as_custodian() {
    let app = setup();
    let token = app.login("parent@example.org").await;
    app.permissions.grant(
        "parent01",
        "child02",
        PermissionSet::from([Permission::Custodian]),
    );

    let response = app
        .request(
            "GET",
            "/user/child@example.org",
            &[("x-tidepool-session-token", token.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["userid"], "child02");
    assert_eq!(response.body["emails"][0], "child@example.org");
}

#[tokio::test]
async fn test_user_info_as_root() {
    let app = setup();
    let token = app.login("parent@example.org").await;
    app.permissions
        .grant("parent01", "child02", PermissionSet::from([Permission::Root]));

    let response = app
        .request(
            "GET",
            "/user/child02",
            &[("x-tidepool-session-token", token.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_server_token_bypasses_permissions() {
    let app = setup();
    let token = app.server_token().await;

    let response = app
        .request(
            "GET",
            "/user/child02",
            &[("x-tidepool-session-token", token.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.permissions.lookup_calls(), 0);
}

#[tokio::test]
async fn test_user_info_not_found() {
    let app = setup();
    let token = app.server_token().await;

    let response = app
        .request(
            "GET",
            "/user/nobody",
            &[("x-tidepool-session-token", token.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.reason(), "User not found");
}

#[tokio::test]
async fn test_permission_lookup_failure() {
    let app = setup();
    let token = app.login("parent@example.org").await;
    app.permissions.fail_lookups(true);

    let response = app
        .request(
            "GET",
            "/user/child02",
            &[("x-tidepool-session-token", token.as_str())],
        )
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.reason(), "Error finding user");
    assert_eq!(app.metrics.count(StatusReason::ErrFindingUsr), 1);
}

#[tokio::test]
async fn test_release_custodial_account() {
    let app = setup();
    app.permissions.grant(
        "parent01",
        "child02",
        PermissionSet::from([Permission::Custodian, Permission::View]),
    );
    app.permissions.grant(
        "clinic09",
        "child02",
        PermissionSet::from([Permission::Custodian]),
    );
    app.permissions
        .grant("friend07", "child02", PermissionSet::from([Permission::View]));

    let updated = app.flows.release_custodial_account("child02").await.unwrap();
    assert_eq!(updated, 2);
    assert_eq!(
        app.permissions.permissions_of("parent01", "child02"),
        PermissionSet::from([Permission::View])
    );
    assert!(app.permissions.permissions_of("clinic09", "child02").is_empty());
    assert_eq!(
        app.permissions.permissions_of("friend07", "child02"),
        PermissionSet::from([Permission::View])
    );
}

#[tokio::test]
async fn test_release_custodial_account_aborts_on_failure() {
    let app = setup();
    for subject in ["a-custodian", "b-custodian", "c-custodian"] {
        app.permissions
            .grant(subject, "child02", PermissionSet::from([Permission::Custodian]));
    }
    app.permissions.fail_updates_for("b-custodian");

    let err = app
        .flows
        .release_custodial_account("child02")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExternalService);
    assert_eq!(err.reason, Some(StatusReason::ErrUpdatingUsr));

    assert!(app.permissions.permissions_of("a-custodian", "child02").is_empty());
    assert_eq!(
        app.permissions.permissions_of("c-custodian", "child02"),
        PermissionSet::from([Permission::Custodian])
    );
}
