//! Source of this service's own server token.

use async_trait::async_trait;

use crate::result::AppResult;

/// Supplies the token upstream clients present as this service's identity.
#[async_trait]
pub trait ServerTokenProvider: Send + Sync + std::fmt::Debug + 'static {
    async fn server_token(&self) -> AppResult<String>;
}
