//! Response DTOs.

use serde::{Deserialize, Serialize};

use tessera_core::types::user::PublicUser;

/// Body of a successful federated login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedLoginResponse {
    pub oauth_user: PublicUser,
    /// Delegated account id, `null` when acting as oneself.
    pub oauth_target: Option<String>,
}
