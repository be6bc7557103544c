//! Self-issued server token for calls to upstream services.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::info;

use tessera_core::error::AppError;
use tessera_core::result::AppResult;
use tessera_core::traits::token_provider::ServerTokenProvider;

use super::manager::SessionManager;

/// Share of a token's lifetime after which it is re-minted, in percent.
const RENEW_AFTER_PERCENT: i64 = 80;

#[derive(Debug)]
struct CachedToken {
    token: String,
    renew_at: DateTime<Utc>,
}

/// Mints a server token for this service and caches it until renewal is due.
#[derive(Debug)]
pub struct ServerTokenSource {
    sessions: SessionManager,
    server_name: String,
    cached: Mutex<Option<CachedToken>>,
}

impl ServerTokenSource {
    pub fn new(sessions: SessionManager, server_name: impl Into<String>) -> Self {
        Self {
            sessions,
            server_name: server_name.into(),
            cached: Mutex::new(None),
        }
    }

    /// Cached token if still fresh as of `now`, else a newly minted one.
    ///
    /// The cache lock is released while minting. Concurrent callers that
    /// find the cache stale may each mint; the latest renewal point wins.
    pub async fn token_at(&self, now: DateTime<Utc>) -> AppResult<String> {
        if let Some(token) = self.fresh(now).await {
            return Ok(token);
        }

        let issued = self
            .sessions
            .create_at(&self.server_name, true, None, now)
            .await
            .map_err(AppError::from)?;
        let lifetime = issued.data.expires_at - now;
        let renew_at = (now + lifetime * (RENEW_AFTER_PERCENT as i32) / 100)
            .max(now + Duration::seconds(1));
        info!(server = %self.server_name, %renew_at, "Minted server token for upstream calls");

        let mut cached = self.cached.lock().await;
        if cached.as_ref().is_none_or(|entry| entry.renew_at < renew_at) {
            *cached = Some(CachedToken {
                token: issued.token.clone(),
                renew_at,
            });
        }
        Ok(issued.token)
    }

    async fn fresh(&self, now: DateTime<Utc>) -> Option<String> {
        let cached = self.cached.lock().await;
        cached
            .as_ref()
            .filter(|entry| now < entry.renew_at)
            .map(|entry| entry.token.clone())
    }
}

#[async_trait]
impl ServerTokenProvider for ServerTokenSource {
    async fn server_token(&self) -> AppResult<String> {
        self.token_at(Utc::now()).await
    }
}
