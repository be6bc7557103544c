//! In-process stand-ins for the upstream services.
//!
//! Both mocks count calls and can be told to fail, which is what tests of
//! the short-circuit and batch-abort behavior need.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};

use tessera_core::error::AppError;
use tessera_core::result::AppResult;
use tessera_core::traits::identity::{IdentityProvider, Introspection};
use tessera_core::traits::permission::{GroupMembers, PermissionService};
use tessera_core::types::permission::PermissionSet;

/// Permission graph held in memory, keyed by group.
#[derive(Debug, Default)]
pub struct MockPermissionService {
    groups: DashMap<String, GroupMembers>,
    fail_lookups: AtomicBool,
    failing_subjects: DashSet<String>,
    lookup_calls: AtomicUsize,
    update_calls: AtomicUsize,
}

impl MockPermissionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `subject`'s permissions on `group`.
    pub fn grant(&self, subject: &str, group: &str, permissions: PermissionSet) {
        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(subject.to_string(), permissions);
    }

    /// Current permissions of `subject` on `group`.
    pub fn permissions_of(&self, subject: &str, group: &str) -> PermissionSet {
        self.groups
            .get(group)
            .and_then(|members| members.get(subject).cloned())
            .unwrap_or_default()
    }

    /// Make every lookup fail.
    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    /// Make updates for one subject fail.
    pub fn fail_updates_for(&self, subject: &str) {
        self.failing_subjects.insert(subject.to_string());
    }

    /// Number of `user_in_group` and `users_in_group` calls made.
    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    /// Number of `set_permissions` calls made, including failed ones.
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    fn check_lookup(&self) -> AppResult<()> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(AppError::external_service("mock permission lookup failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl PermissionService for MockPermissionService {
    async fn user_in_group(&self, subject: &str, group: &str) -> AppResult<PermissionSet> {
        self.check_lookup()?;
        Ok(self.permissions_of(subject, group))
    }

    async fn users_in_group(&self, group: &str) -> AppResult<GroupMembers> {
        self.check_lookup()?;
        Ok(self
            .groups
            .get(group)
            .map(|members| members.clone())
            .unwrap_or_default())
    }

    async fn set_permissions(
        &self,
        subject: &str,
        group: &str,
        permissions: &PermissionSet,
    ) -> AppResult<PermissionSet> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_subjects.contains(subject) {
            return Err(AppError::external_service(format!(
                "mock permission update failure for {subject}"
            )));
        }
        self.grant(subject, group, permissions.clone());
        Ok(permissions.clone())
    }
}

/// Identity provider answering from a fixed table of upstream tokens.
///
/// Unknown tokens introspect as inactive.
#[derive(Debug, Default)]
pub struct MockIdentityProvider {
    tokens: DashMap<String, Introspection>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an active upstream token for `user_id`.
    pub fn register(&self, token: &str, user_id: &str, auth_user_id: Option<&str>) {
        self.tokens.insert(
            token.to_string(),
            Introspection {
                active: true,
                user_id: user_id.to_string(),
                auth_user_id: auth_user_id.map(str::to_string),
            },
        );
    }

    /// Make every introspection fail.
    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn introspect(&self, token: &str) -> AppResult<Introspection> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::external_service("mock introspection failure"));
        }
        Ok(self
            .tokens
            .get(token)
            .map(|entry| entry.value().clone())
            .unwrap_or(Introspection {
                active: false,
                user_id: String::new(),
                auth_user_id: None,
            }))
    }
}
