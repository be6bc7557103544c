//! Revocation record persistence.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::session::SessionRecord;

/// Storage for session records, keyed by the full token string.
///
/// A record must be durable before `put` returns. `find_by_id` returning
/// `None` is authoritative: the token is revoked.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a record.
    async fn put(&self, record: &SessionRecord) -> AppResult<()>;

    /// Look a record up by token string.
    async fn find_by_id(&self, id: &str) -> AppResult<Option<SessionRecord>>;

    /// Delete a record. Returns `true` if one was removed.
    async fn remove_by_id(&self, id: &str) -> AppResult<bool>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<()>;
}
