//! Token minting.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use tessera_core::config::auth::AuthConfig;

use super::claims::{TokenClaims, TokenData};
use super::policy::DurationPolicy;
use crate::error::MintError;

/// A freshly signed token and its claims.
#[derive(Debug, Clone)]
pub struct MintedToken {
    pub token: String,
    pub data: TokenData,
}

/// Signs new tokens with the current HMAC secret.
#[derive(Clone)]
pub struct TokenEncoder {
    encoding_key: EncodingKey,
    policy: DurationPolicy,
}

impl std::fmt::Debug for TokenEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenEncoder")
            .field("policy", &self.policy)
            .finish()
    }
}

impl TokenEncoder {
    pub fn new(secret: &str, policy: DurationPolicy) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            policy,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.api_secret, DurationPolicy::from_config(config))
    }

    pub fn policy(&self) -> DurationPolicy {
        self.policy
    }

    /// Mint a token now.
    pub fn mint(
        &self,
        subject: &str,
        is_server: bool,
        requested_secs: Option<i64>,
    ) -> Result<MintedToken, MintError> {
        self.mint_at(subject, is_server, requested_secs, Utc::now())
    }

    /// Mint a token as of `now`.
    pub fn mint_at(
        &self,
        subject: &str,
        is_server: bool,
        requested_secs: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<MintedToken, MintError> {
        if subject.is_empty() {
            return Err(MintError::EmptySubject);
        }
        let dur = self.policy.effective_secs(is_server, requested_secs)?;
        let claims = TokenClaims {
            usr: subject.to_string(),
            svr: is_server,
            dur,
            exp: DurationPolicy::expiry(now.timestamp(), dur)?,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims.to_wire(),
            &self.encoding_key,
        )
        .map_err(MintError::Signing)?;

        Ok(MintedToken {
            token,
            data: TokenData::verified(&claims),
        })
    }
}
