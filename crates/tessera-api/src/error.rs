//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use tessera_core::error::{AppError, ErrorKind};

/// Rejection body: numeric status plus the human-readable reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub code: u16,
    pub reason: String,
}

/// Handler error wrapper so `AppError` can be rendered by Axum.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Internal
        | ErrorKind::ExternalService
        | ErrorKind::Configuration
        | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind);

        // Classified rejections were already logged by the flow.
        if err.reason.is_none() && err.is_server_side() {
            tracing::error!(kind = %err.kind, error = %err.message, "Unclassified server error");
        }

        let reason = match err.reason {
            Some(reason) => reason.as_str().to_string(),
            None => err.message,
        };
        let body = ApiErrorResponse {
            code: status.as_u16(),
            reason,
        };

        (status, Json(body)).into_response()
    }
}
