//! Upstream service client configuration.

use serde::{Deserialize, Serialize};

/// Settings for the permission-graph and identity-federation clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientsConfig {
    /// Base URL of the permission-graph (gatekeeper) service.
    #[serde(default = "default_gatekeeper_url")]
    pub gatekeeper_url: String,
    /// Base URL of the token introspection service. Federated login is
    /// disabled when unset.
    #[serde(default)]
    pub introspection_url: Option<String>,
    /// Per-request timeout for upstream calls, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Server identity this service uses when calling upstream services.
    #[serde(default = "default_server_name")]
    pub server_name: String,
}

impl Default for ClientsConfig {
    fn default() -> Self {
        Self {
            gatekeeper_url: default_gatekeeper_url(),
            introspection_url: None,
            request_timeout_seconds: default_request_timeout(),
            server_name: default_server_name(),
        }
    }
}

fn default_gatekeeper_url() -> String {
    "http://localhost:9123".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_server_name() -> String {
    "tessera".to_string()
}
