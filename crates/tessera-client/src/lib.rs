//! # tessera-client
//!
//! Clients for the services Tessera consults but does not own:
//!
//! - [`GatekeeperClient`]: the permission graph
//! - [`IntrospectionClient`]: the identity-federation service
//!
//! [`mock`] holds in-process stand-ins for both.

pub mod gatekeeper;
pub mod introspection;
pub mod mock;

pub use gatekeeper::GatekeeperClient;
pub use introspection::IntrospectionClient;
pub use mock::{MockIdentityProvider, MockPermissionService};

use std::time::Duration;

use tessera_core::config::clients::ClientsConfig;
use tessera_core::error::{AppError, ErrorKind};

/// Build the shared HTTP client with the configured request timeout.
pub fn http_client(config: &ClientsConfig) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .build()
        .map_err(|e| AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e))
}

/// Wrap a transport failure as an upstream error.
pub(crate) fn upstream(service: &str, err: reqwest::Error) -> AppError {
    let message = if err.is_timeout() {
        format!("{service} request timed out")
    } else {
        format!("{service} request failed: {err}")
    };
    AppError::with_source(ErrorKind::ExternalService, message, err)
}
