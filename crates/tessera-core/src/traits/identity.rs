//! External identity-federation service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// Result of introspecting an upstream bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Introspection {
    /// Whether the upstream token is currently active.
    pub active: bool,
    /// Local user id the upstream subject maps to.
    pub user_id: String,
    /// Id of the account the upstream grant acts on, if delegated.
    #[serde(default)]
    pub auth_user_id: Option<String>,
}

/// Verifies upstream bearer tokens.
#[async_trait]
pub trait IdentityProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Introspect `token`. Inactive tokens are reported, not errored.
    async fn introspect(&self, token: &str) -> AppResult<Introspection>;
}
