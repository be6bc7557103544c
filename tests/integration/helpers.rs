//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use serde_json::Value;
use tower::ServiceExt;

use tessera_api::{AppState, CounterSink, build_app};
use tessera_auth::{
    AuthFlows, FlowConfig, PasswordHasher, PermissionResolver, SessionManager, TokenDecoder,
    TokenEncoder,
};
use tessera_client::mock::{MockIdentityProvider, MockPermissionService};
use tessera_core::config::AppConfig;
use tessera_core::config::auth::AuthConfig;
use tessera_core::types::user::UserRecord;
use tessera_store::{MemorySessionStore, MemoryUserStore};

pub const API_SECRET: &str = "integration-api-secret";
pub const SERVER_SECRET: &str = "integration-server-secret";
pub const LONG_TERM_KEY: &str = "integration-long-term";
pub const PASSWORD: &str = "correct horse battery";

pub const SESSION_TOKEN: &str = "x-tidepool-session-token";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    pub flows: Arc<AuthFlows>,
    pub users: Arc<MemoryUserStore>,
    pub sessions: Arc<MemorySessionStore>,
    pub permissions: Arc<MockPermissionService>,
    pub identity: Arc<MockIdentityProvider>,
    pub metrics: Arc<CounterSink>,
    pub config: AppConfig,
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        api_secret: API_SECRET.to_string(),
        previous_secret: None,
        public_key: None,
        server_secret: SERVER_SECRET.to_string(),
        long_term_key: LONG_TERM_KEY.to_string(),
        long_term_days_duration: 30,
        token_duration_secs: 3600,
        verification_secret: None,
    }
}

impl TestApp {
    /// App with the default test configuration.
    pub fn new() -> Self {
        Self::with_auth(|_| {})
    }

    /// App with a tweaked auth section.
    pub fn with_auth(tweak: impl FnOnce(&mut AuthConfig)) -> Self {
        let mut auth = test_auth_config();
        tweak(&mut auth);
        let config = AppConfig {
            server: Default::default(),
            auth,
            clients: Default::default(),
            store: Default::default(),
            logging: Default::default(),
        };

        let users = Arc::new(MemoryUserStore::new());
        let sessions = Arc::new(MemorySessionStore::new());
        let permissions = Arc::new(MockPermissionService::new());
        let identity = Arc::new(MockIdentityProvider::new());
        let metrics = Arc::new(CounterSink::new());

        let manager = SessionManager::new(
            Arc::new(TokenEncoder::from_config(&config.auth)),
            Arc::new(TokenDecoder::from_config(&config.auth).expect("Failed to build decoder")),
            sessions.clone(),
        );
        let flows = Arc::new(
            AuthFlows::new(
                manager,
                PermissionResolver::new(permissions.clone()),
                users.clone(),
                metrics.clone(),
                FlowConfig::from_config(&config.auth),
            )
            .with_identity_provider(identity.clone()),
        );

        let router = build_app(AppState {
            config: Arc::new(config.clone()),
            flows: flows.clone(),
            metrics: metrics.clone(),
        });

        Self {
            router,
            flows,
            users,
            sessions,
            permissions,
            identity,
            metrics,
            config,
        }
    }

    /// Add a user whose username and only email are both `email`.
    pub fn add_user(&self, id: &str, email: &str, verified: bool) {
        let mut user = UserRecord::new(id);
        user.username = Some(email.to_string());
        user.emails = vec![email.to_string()];
        user.password_hash = Some(
            PasswordHasher::new()
                .hash_password(PASSWORD)
                .expect("Failed to hash password"),
        );
        user.email_verified = verified;
        self.users.insert(user);
    }

    /// Make a request with the given headers.
    pub async fn request(&self, method: &str, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let req = req.body(Body::empty()).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }

    /// Log `email` in with the shared test password and return the token.
    pub async fn login(&self, email: &str) -> String {
        let auth = basic(email, PASSWORD);
        let response = self
            .request("POST", "/login", &[("authorization", auth.as_str())])
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.text);
        response.token().expect("login returned no token")
    }

    /// Obtain a server token.
    pub async fn server_token(&self) -> String {
        let response = self
            .request(
                "POST",
                "/serverlogin",
                &[
                    ("x-tidepool-server-name", "test-service"),
                    ("x-tidepool-server-secret", SERVER_SECRET),
                ],
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.token().expect("server login returned no token")
    }
}

/// Test response
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when not JSON
    pub body: Value,
    pub text: String,
}

impl TestResponse {
    /// The issued session token header, if present.
    pub fn token(&self) -> Option<String> {
        self.headers
            .get(SESSION_TOKEN)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    /// The `reason` field of a rejection body.
    pub fn reason(&self) -> &str {
        self.body["reason"].as_str().unwrap_or_default()
    }
}

/// `Authorization: Basic` value for `user:password`.
pub fn basic(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}

/// Decode a token's claims without verifying it.
pub fn claims(token: &str) -> Value {
    let payload = token.split('.').nth(1).expect("token has no payload");
    let bytes = URL_SAFE_NO_PAD.decode(payload).expect("payload is not base64url");
    serde_json::from_slice(&bytes).expect("payload is not JSON")
}
