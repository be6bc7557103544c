//! Token and credential configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Seconds in one day, used to expand `long_term_days_duration`.
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Token signing, duration policy, and shared-secret configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Current HMAC-SHA256 secret. New tokens are always signed with it.
    pub api_secret: String,
    /// Previous HMAC secret, accepted for verification only during rotation.
    #[serde(default)]
    pub previous_secret: Option<String>,
    /// PEM-encoded RSA public key for verifying externally-minted tokens.
    #[serde(default)]
    pub public_key: Option<String>,
    /// Shared secret presented by internal services on server login.
    pub server_secret: String,
    /// Key that unlocks the long-term login path.
    #[serde(default)]
    pub long_term_key: String,
    /// Lifetime of long-term tokens, in days.
    #[serde(default = "default_long_term_days")]
    pub long_term_days_duration: u32,
    /// Default lifetime of user tokens, in seconds.
    #[serde(default = "default_token_duration")]
    pub token_duration_secs: i64,
    /// Substring that marks an account as verified without the email flag.
    #[serde(default)]
    pub verification_secret: Option<String>,
}

impl AuthConfig {
    /// Long-term token lifetime in seconds.
    pub fn long_term_duration_secs(&self) -> i64 {
        i64::from(self.long_term_days_duration) * SECONDS_PER_DAY
    }

    /// Check the invariants the token engine depends on.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.api_secret.is_empty() {
            return Err(AppError::configuration("auth.api_secret must be set"));
        }
        if self.server_secret.is_empty() {
            return Err(AppError::configuration("auth.server_secret must be set"));
        }
        if self.token_duration_secs <= 0 {
            return Err(AppError::configuration(
                "auth.token_duration_secs must be positive",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("previous_secret", &self.previous_secret.is_some())
            .field("public_key", &self.public_key.is_some())
            .field("long_term_days_duration", &self.long_term_days_duration)
            .field("token_duration_secs", &self.token_duration_secs)
            .finish_non_exhaustive()
    }
}

fn default_long_term_days() -> u32 {
    30
}

fn default_token_duration() -> i64 {
    3600
}
