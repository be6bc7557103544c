//! Read access to user records.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::user::{UserQuery, UserRecord};

/// Query interface over the user persistence layer.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// All records matching any populated field of `query`.
    async fn find_users(&self, query: &UserQuery) -> AppResult<Vec<UserRecord>>;

    /// A single record by id.
    async fn find_by_id(&self, id: &str) -> AppResult<Option<UserRecord>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<()>;
}
