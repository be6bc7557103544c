//! CORS layer configuration.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use tessera_core::config::app::CorsConfig;

use crate::extractors::headers::{SERVER_NAME, SERVER_SECRET, SESSION_TOKEN, TOKEN_DURATION};

/// Builds a CORS tower layer from configuration.
///
/// The session token header is exposed so browser callers can read the
/// token a login returns.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    let allowed_headers: Vec<HeaderName> =
        [SESSION_TOKEN, SERVER_NAME, SERVER_SECRET, TOKEN_DURATION]
            .map(HeaderName::from_static)
            .into_iter()
            .chain([AUTHORIZATION, CONTENT_TYPE])
            .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(allowed_headers)
        .expose_headers([HeaderName::from_static(SESSION_TOKEN)])
        .max_age(Duration::from_secs(config.max_age_seconds))
}
