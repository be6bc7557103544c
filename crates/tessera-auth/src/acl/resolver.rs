//! Permission intersection against the external permission graph.
//!
//! Resolution order:
//! 1. Server bypass: a server-flagged caller gets what it asked for.
//! 2. Self bypass: a caller acting on its own group gets what it asked for.
//! 3. Upstream: requested permissions are intersected with the caller's
//!    actual permissions on the group.

use std::sync::Arc;

use tracing::{debug, info, warn};

use tessera_core::traits::permission::PermissionService;
use tessera_core::types::permission::{Permission, PermissionSet};

use crate::error::PermissionError;
use crate::jwt::TokenData;

/// Turns a verified token plus a target group into a granted permission set.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    service: Arc<dyn PermissionService>,
}

impl PermissionResolver {
    pub fn new(service: Arc<dyn PermissionService>) -> Self {
        Self { service }
    }

    /// The subset of `requested` the caller actually holds on `group`.
    ///
    /// An empty result is a valid "no privilege" outcome. Only an upstream
    /// failure is an error.
    pub async fn resolve(
        &self,
        caller: &TokenData,
        group: &str,
        requested: &PermissionSet,
    ) -> Result<PermissionSet, PermissionError> {
        if caller.isserver {
            debug!(caller = %caller.userid, group, "Server caller, permissions granted as requested");
            return Ok(requested.clone());
        }
        if caller.userid == group {
            return Ok(requested.clone());
        }

        let actual = self
            .service
            .user_in_group(&caller.userid, group)
            .await
            .map_err(|e| {
                warn!(subject = %caller.userid, group, error = %e, "Permission lookup failed");
                PermissionError::LookupFailed(e)
            })?;

        Ok(requested.intersection(&actual))
    }

    /// Remove `permission` from every subject holding it on `group`.
    ///
    /// Subjects whose set does not change are not updated. The first failed
    /// update aborts the batch; earlier updates stay applied. Returns the
    /// number of subjects updated.
    pub async fn revoke_permission(
        &self,
        group: &str,
        permission: &Permission,
    ) -> Result<usize, PermissionError> {
        let members = self
            .service
            .users_in_group(group)
            .await
            .map_err(PermissionError::LookupFailed)?;

        let mut updated = 0;
        for (subject, original) in &members {
            let remaining = original.without(permission);
            if remaining.len() == original.len() {
                continue;
            }
            self.service
                .set_permissions(subject, group, &remaining)
                .await
                .map_err(|source| {
                    warn!(
                        subject = %subject,
                        group,
                        %permission,
                        updated,
                        error = %source,
                        "Permission revocation aborted"
                    );
                    PermissionError::UpdateFailed {
                        subject: subject.clone(),
                        source,
                    }
                })?;
            updated += 1;
        }

        info!(group, %permission, updated, "Permission revoked from group members");
        Ok(updated)
    }
}
