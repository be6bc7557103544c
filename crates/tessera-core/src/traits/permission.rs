//! External permission-graph service.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::permission::PermissionSet;

/// Every subject holding permissions on a group, with their sets.
pub type GroupMembers = BTreeMap<String, PermissionSet>;

/// Client interface to the permission graph.
///
/// Timeouts and transport failures surface as ordinary errors.
#[async_trait]
pub trait PermissionService: Send + Sync + std::fmt::Debug + 'static {
    /// Permissions `subject` holds on `group`.
    async fn user_in_group(&self, subject: &str, group: &str) -> AppResult<PermissionSet>;

    /// All subjects with any permission on `group`.
    async fn users_in_group(&self, group: &str) -> AppResult<GroupMembers>;

    /// Replace the permissions `subject` holds on `group`.
    async fn set_permissions(
        &self,
        subject: &str,
        group: &str,
        permissions: &PermissionSet,
    ) -> AppResult<PermissionSet>;
}
