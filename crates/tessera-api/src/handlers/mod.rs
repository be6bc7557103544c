//! Route handlers organized by domain.

pub mod auth;
pub mod health;
pub mod user;

use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};

use tessera_core::error::AppError;

use crate::error::ApiError;
use crate::extractors::headers::SESSION_TOKEN;

/// Attach an issued token to a response.
pub(crate) fn with_session_token(token: &str, body: impl IntoResponse) -> Result<Response, ApiError> {
    let value = HeaderValue::from_str(token)
        .map_err(|e| AppError::internal(format!("issued token is not a valid header value: {e}")))?;
    Ok(([(HeaderName::from_static(SESSION_TOKEN), value)], body).into_response())
}
