//! Token claims and the verified view handed to callers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::TokenError;

/// Wire value of the server flag when set.
const SERVER_YES: &str = "yes";
/// Wire value of the server flag when clear.
const SERVER_NO: &str = "no";

/// The signed payload.
///
/// On the wire: `{"svr": "yes"|"no", "usr": <subject>, "dur": <seconds>, "exp": <unix>}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject identifier.
    pub usr: String,
    /// Server-identity flag.
    pub svr: bool,
    /// Effective duration in seconds.
    pub dur: i64,
    /// Expiry, Unix seconds.
    pub exp: i64,
}

impl TokenClaims {
    /// Render as the JSON object that gets signed.
    pub fn to_wire(&self) -> Value {
        json!({
            "svr": if self.svr { SERVER_YES } else { SERVER_NO },
            "usr": self.usr,
            "dur": self.dur,
            "exp": self.exp,
        })
    }

    /// Parse a decoded payload, checking presence and type of every claim.
    pub fn from_wire(payload: &Map<String, Value>) -> Result<Self, TokenError> {
        let usr = payload
            .get("usr")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(TokenError::Malformed)?;
        let svr = match payload.get("svr").and_then(Value::as_str) {
            Some(SERVER_YES) => true,
            Some(_) => false,
            None => return Err(TokenError::Malformed),
        };
        let dur = payload
            .get("dur")
            .and_then(number_as_secs)
            .ok_or(TokenError::Malformed)?;
        let exp = payload
            .get("exp")
            .and_then(number_as_secs)
            .ok_or(TokenError::Malformed)?;

        Ok(Self {
            usr: usr.to_string(),
            svr,
            dur,
            exp,
        })
    }
}

/// Accept integer or float JSON numbers; fractional seconds are dropped.
fn number_as_secs(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}

/// A verified token as seen by flows and clients.
///
/// Only `userid` and `isserver` are ever serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenData {
    pub userid: String,
    pub isserver: bool,
    #[serde(skip)]
    pub duration_secs: i64,
    #[serde(skip)]
    pub expires_at: DateTime<Utc>,
    /// Set by the codec on successful verification.
    #[serde(skip)]
    pub valid: bool,
}

impl TokenData {
    /// Build the verified view of a set of claims.
    pub(crate) fn verified(claims: &TokenClaims) -> Self {
        Self {
            userid: claims.usr.clone(),
            isserver: claims.svr,
            duration_secs: claims.dur,
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or(DateTime::UNIX_EPOCH),
            valid: true,
        }
    }
}
