//! Persisted revocation record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The side-car entry whose presence keeps a token live.
///
/// `id` is the full signed token string and serves as the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// The signed token string.
    pub id: String,
    /// When the record was written.
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Create a record for a freshly minted token.
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            created_at,
        }
    }
}
