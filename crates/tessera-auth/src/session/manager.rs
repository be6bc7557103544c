//! Token lifecycle: create, authenticate, refresh, revoke.
//!
//! A token is honored only while it both verifies cryptographically and has
//! a live record in the [`SessionStore`]. Removing the record revokes the
//! token instantly even though the token itself is self-describing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use tessera_core::result::AppResult;
use tessera_core::traits::session_store::SessionStore;
use tessera_core::types::session::SessionRecord;

use crate::error::{CreationFailure, InvalidToken, SessionError, TokenError};
use crate::jwt::{TokenData, TokenDecoder, TokenEncoder};

/// Characters of a token that may appear in logs.
const LOG_PREFIX_LEN: usize = 12;

/// A token handed to a client, with its verified claims.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub data: TokenData,
}

/// Orchestrates the codec and the revocation store.
#[derive(Debug, Clone)]
pub struct SessionManager {
    encoder: Arc<TokenEncoder>,
    decoder: Arc<TokenDecoder>,
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    pub fn new(
        encoder: Arc<TokenEncoder>,
        decoder: Arc<TokenDecoder>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            encoder,
            decoder,
            store,
        }
    }

    /// Mint and persist a token now.
    pub async fn create(
        &self,
        subject: &str,
        is_server: bool,
        requested_secs: Option<i64>,
    ) -> Result<IssuedToken, SessionError> {
        self.create_at(subject, is_server, requested_secs, Utc::now())
            .await
    }

    /// Mint and persist a token as of `now`.
    ///
    /// The token is returned only after its record is stored; a storage
    /// failure after a successful mint is still a failure.
    pub async fn create_at(
        &self,
        subject: &str,
        is_server: bool,
        requested_secs: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, SessionError> {
        let minted = self
            .encoder
            .mint_at(subject, is_server, requested_secs, now)
            .map_err(|e| SessionError::TokenCreationFailed(CreationFailure::Mint(e)))?;

        let record = SessionRecord::new(minted.token.clone(), now);
        self.store.put(&record).await.map_err(|e| {
            warn!(subject, error = %e, "Failed to persist session record");
            SessionError::TokenCreationFailed(CreationFailure::Persist(e))
        })?;

        info!(
            subject,
            is_server,
            duration_secs = minted.data.duration_secs,
            "Session token issued"
        );

        Ok(IssuedToken {
            token: minted.token,
            data: minted.data,
        })
    }

    /// Authenticate a presented token now.
    pub async fn authenticate(&self, token: &str) -> Result<TokenData, SessionError> {
        self.authenticate_at(token, Utc::now()).await
    }

    /// Verify the token, then require a live session record.
    ///
    /// An empty token fails with `NoToken` without touching the store.
    pub async fn authenticate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenData, SessionError> {
        if token.is_empty() {
            return Err(SessionError::NoToken);
        }

        let data = self.decoder.verify_at(token, now).map_err(|e| {
            debug!(token = %token_prefix(token), error = %e, "Token failed verification");
            InvalidToken::Verification(e)
        })?;

        match self.store.find_by_id(token).await {
            Ok(Some(_)) => Ok(data),
            Ok(None) => {
                debug!(token = %token_prefix(token), "Token has no live session record");
                Err(InvalidToken::Revoked.into())
            }
            Err(e) => Err(SessionError::StoreUnavailable(e)),
        }
    }

    /// Codec-level verification only, without the store check.
    pub fn verify_signature(&self, token: &str) -> Result<TokenData, TokenError> {
        self.decoder.verify(token)
    }

    /// Issue a fresh token for the same identity and duration.
    ///
    /// The old record is left alone; it stays revocable on its own.
    pub async fn refresh(&self, current: &TokenData) -> Result<IssuedToken, SessionError> {
        self.create(&current.userid, current.isserver, Some(current.duration_secs))
            .await
    }

    /// Best-effort removal of a token's record. Failures are logged only.
    pub async fn revoke(&self, token: &str) {
        if token.is_empty() {
            return;
        }
        match self.store.remove_by_id(token).await {
            Ok(true) => info!(token = %token_prefix(token), "Session revoked"),
            Ok(false) => debug!(token = %token_prefix(token), "No session record to revoke"),
            Err(e) => warn!(
                token = %token_prefix(token),
                error = %e,
                "Unable to delete session record"
            ),
        }
    }

    /// Reachability of the revocation store.
    pub async fn health_check(&self) -> AppResult<()> {
        self.store.health_check().await
    }
}

/// Loggable prefix of a token.
pub(crate) fn token_prefix(token: &str) -> &str {
    match token.char_indices().nth(LOG_PREFIX_LEN) {
        Some((idx, _)) => &token[..idx],
        None => token,
    }
}
