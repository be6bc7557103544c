//! Token duration policy.

use chrono::DateTime;

use tessera_core::config::auth::AuthConfig;

use crate::error::MintError;

/// Default lifetime of server tokens.
pub const SERVER_TOKEN_SECS: i64 = 24 * 60 * 60;

/// Expiry granularity. Sub-hour remainders of a duration are truncated.
const SECONDS_PER_HOUR: i64 = 60 * 60;

/// Chooses the lifetime of a token at mint time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationPolicy {
    /// Lifetime of user tokens when the caller gives none.
    pub default_secs: i64,
}

impl DurationPolicy {
    pub fn new(default_secs: i64) -> Self {
        Self { default_secs }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.token_duration_secs)
    }

    /// Caller duration if positive, else 24h for servers, else the configured default.
    pub fn effective_secs(&self, is_server: bool, requested: Option<i64>) -> Result<i64, MintError> {
        let secs = match requested {
            Some(secs) if secs > 0 => secs,
            _ if is_server => SERVER_TOKEN_SECS,
            _ => self.default_secs,
        };
        if secs <= 0 {
            return Err(MintError::NonPositiveDuration(secs));
        }
        Ok(secs)
    }

    /// Expiry for a token minted at `now` (Unix seconds) with `duration_secs`.
    ///
    /// Fails when the expiry does not fit a representable timestamp.
    pub fn expiry(now: i64, duration_secs: i64) -> Result<i64, MintError> {
        now.checked_add((duration_secs / SECONDS_PER_HOUR) * SECONDS_PER_HOUR)
            .filter(|exp| DateTime::from_timestamp(*exp, 0).is_some())
            .ok_or(MintError::ExpiryOutOfRange(duration_secs))
    }
}
