//! In-memory user store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use tessera_core::error::AppError;
use tessera_core::result::AppResult;
use tessera_core::traits::user_store::UserStore;
use tessera_core::types::user::{UserQuery, UserRecord};

/// User records held in a concurrent map keyed by user id.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<DashMap<String, UserRecord>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with records.
    pub fn with_users(users: impl IntoIterator<Item = UserRecord>) -> Self {
        let store = Self::new();
        for user in users {
            store.insert(user);
        }
        store
    }

    /// Insert or replace a record.
    pub fn insert(&self, user: UserRecord) {
        self.users.insert(user.id.clone(), user);
    }

    /// Simulate an outage (or recovery) of the backend.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::external_service("User store is unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_users(&self, query: &UserQuery) -> AppResult<Vec<UserRecord>> {
        self.ensure_available()?;
        let mut found: Vec<UserRecord> = self
            .users
            .iter()
            .filter(|entry| entry.value().matches(query))
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<UserRecord>> {
        self.ensure_available()?;
        Ok(self.users.get(id).map(|u| u.value().clone()))
    }

    async fn health_check(&self) -> AppResult<()> {
        self.ensure_available()
    }
}
