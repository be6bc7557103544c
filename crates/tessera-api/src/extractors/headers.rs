//! Header extractors for the session protocol.
//!
//! None of these reject: an absent or unreadable header becomes `None`
//! and the flow decides which reason to report.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

/// Header carrying the session token, in both directions.
pub const SESSION_TOKEN: &str = "x-tidepool-session-token";
/// Name a calling server identifies itself with.
pub const SERVER_NAME: &str = "x-tidepool-server-name";
/// Shared secret a calling server presents.
pub const SERVER_SECRET: &str = "x-tidepool-server-secret";
/// Caller's requested token lifetime, in seconds.
pub const TOKEN_DURATION: &str = "tokenduration";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// The presented `x-tidepool-session-token`, if any.
#[derive(Debug, Clone, Default)]
pub struct SessionToken(pub Option<String>);

impl SessionToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SessionToken {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(header_str(&parts.headers, SESSION_TOKEN).map(str::to_string)))
    }
}

/// The raw `Authorization` header, if any.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationHeader(pub Option<String>);

impl AuthorizationHeader {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthorizationHeader {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            header_str(&parts.headers, AUTHORIZATION.as_str()).map(str::to_string),
        ))
    }
}

/// Server name and secret headers.
#[derive(Debug, Clone, Default)]
pub struct ServerCredentials {
    pub name: Option<String>,
    pub secret: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for ServerCredentials {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            name: header_str(&parts.headers, SERVER_NAME).map(str::to_string),
            secret: header_str(&parts.headers, SERVER_SECRET).map(str::to_string),
        })
    }
}

/// The `tokenduration` override, in whole seconds.
///
/// Fractional values are truncated; anything unparseable is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationOverride(pub Option<i64>);

impl DurationOverride {
    pub fn parse(raw: &str) -> Option<i64> {
        let secs: f64 = raw.trim().parse().ok()?;
        secs.is_finite().then(|| secs as i64)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for DurationOverride {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            header_str(&parts.headers, TOKEN_DURATION).and_then(Self::parse),
        ))
    }
}
