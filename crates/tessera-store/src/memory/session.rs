//! In-memory session record store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use tessera_core::error::AppError;
use tessera_core::result::AppResult;
use tessera_core::traits::session_store::SessionStore;
use tessera_core::types::session::SessionRecord;

/// Session records held in a concurrent map keyed by token string.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    records: Arc<DashMap<String, SessionRecord>>,
    /// When set, every operation fails as if the backend were unreachable.
    unavailable: Arc<AtomicBool>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage (or recovery) of the backend.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records are held.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::external_service("Session store is unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put(&self, record: &SessionRecord) -> AppResult<()> {
        self.ensure_available()?;
        self.records.insert(record.id.clone(), record.clone());
        debug!(count = self.records.len(), "Stored session record");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<SessionRecord>> {
        self.ensure_available()?;
        Ok(self.records.get(id).map(|r| r.value().clone()))
    }

    async fn remove_by_id(&self, id: &str) -> AppResult<bool> {
        self.ensure_available()?;
        Ok(self.records.remove(id).is_some())
    }

    async fn health_check(&self) -> AppResult<()> {
        self.ensure_available()
    }
}
