//! Authentication flow orchestrator.
//!
//! Each entry point is one protocol step that produces a token or an
//! authorization decision. Every rejection carries a [`StatusReason`],
//! is reported to the [`MetricsSink`] exactly once, and is logged once
//! (caller errors at `warn`, upstream failures at `error`).

use std::fmt::Display;
use std::sync::Arc;

use subtle::ConstantTimeEq;
use tracing::{error, info, warn};

use tessera_core::config::auth::AuthConfig;
use tessera_core::error::{AppError, ErrorKind};
use tessera_core::result::AppResult;
use tessera_core::traits::identity::IdentityProvider;
use tessera_core::traits::metrics::MetricsSink;
use tessera_core::traits::user_store::UserStore;
use tessera_core::types::permission::{Permission, PermissionSet};
use tessera_core::types::status::StatusReason;
use tessera_core::types::user::{PublicUser, UserQuery};

use super::credentials::{Credentials, bearer_token};
use crate::acl::PermissionResolver;
use crate::error::{PermissionError, SessionError};
use crate::jwt::TokenData;
use crate::password::PasswordHasher;
use crate::session::manager::token_prefix;
use crate::session::{IssuedToken, SessionManager};

/// Shared secrets and durations the flows consult.
#[derive(Clone)]
pub struct FlowConfig {
    pub server_secret: String,
    pub long_term_key: String,
    pub long_term_secs: i64,
    pub verification_secret: Option<String>,
}

impl FlowConfig {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            server_secret: config.server_secret.clone(),
            long_term_key: config.long_term_key.clone(),
            long_term_secs: config.long_term_duration_secs(),
            verification_secret: config.verification_secret.clone(),
        }
    }
}

impl std::fmt::Debug for FlowConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowConfig")
            .field("long_term_enabled", &!self.long_term_key.is_empty())
            .field("long_term_secs", &self.long_term_secs)
            .finish_non_exhaustive()
    }
}

/// Result of a password login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub issued: IssuedToken,
    pub user: PublicUser,
}

/// Result of a federated login.
#[derive(Debug, Clone)]
pub struct FederatedOutcome {
    pub issued: IssuedToken,
    pub user: PublicUser,
    /// Account the upstream grant acts on, if delegated.
    pub target: Option<String>,
}

/// The entry protocols of the service.
#[derive(Debug, Clone)]
pub struct AuthFlows {
    sessions: SessionManager,
    resolver: PermissionResolver,
    users: Arc<dyn UserStore>,
    identity: Option<Arc<dyn IdentityProvider>>,
    metrics: Arc<dyn MetricsSink>,
    hasher: PasswordHasher,
    config: FlowConfig,
}

impl AuthFlows {
    pub fn new(
        sessions: SessionManager,
        resolver: PermissionResolver,
        users: Arc<dyn UserStore>,
        metrics: Arc<dyn MetricsSink>,
        config: FlowConfig,
    ) -> Self {
        Self {
            sessions,
            resolver,
            users,
            identity: None,
            metrics,
            hasher: PasswordHasher::new(),
            config,
        }
    }

    /// Enable federated login through `identity`.
    pub fn with_identity_provider(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    // ── Login ────────────────────────────────────────────────

    /// Password login.
    ///
    /// `requested_secs` is the caller's duration override, if any.
    pub async fn password_login(
        &self,
        credentials: Option<Credentials>,
        requested_secs: Option<i64>,
    ) -> AppResult<LoginOutcome> {
        let Some(credentials) = credentials else {
            return Err(self.reject(
                ErrorKind::Validation,
                StatusReason::MissingIdPw,
                "no usable Basic credentials",
            ));
        };

        let mut found = self
            .users
            .find_users(&UserQuery::by_login(&credentials.user))
            .await
            .map_err(|e| self.reject(ErrorKind::ExternalService, StatusReason::ErrFindingUsr, e))?;

        if found.len() != 1 {
            return Err(self.reject(
                ErrorKind::Unauthorized,
                StatusReason::NoMatch,
                format_args!("found {} users matching login", found.len()),
            ));
        }
        let user = found.remove(0);

        if user.is_deleted() {
            return Err(self.reject(
                ErrorKind::Unauthorized,
                StatusReason::NoMatch,
                "user is marked deleted",
            ));
        }
        if !self.hasher.matches_user(&user, &credentials.password) {
            return Err(self.reject(
                ErrorKind::Unauthorized,
                StatusReason::NoMatch,
                "passwords do not match",
            ));
        }
        if !user.is_email_verified(self.config.verification_secret.as_deref()) {
            return Err(self.reject(
                ErrorKind::Forbidden,
                StatusReason::NotVerified,
                format_args!("user {} is not verified", user.id),
            ));
        }

        let issued = self
            .sessions
            .create(&user.id, false, requested_secs)
            .await
            .map_err(|e| self.reject(ErrorKind::Internal, StatusReason::ErrUpdatingToken, e))?;

        info!(user_id = %user.id, "User login");
        Ok(LoginOutcome {
            issued,
            user: user.to_public(),
        })
    }

    /// Long-term login: a matching key elevates the duration, then password login.
    ///
    /// A caller-supplied duration still takes precedence over the elevated
    /// one. A non-matching key is logged and the login proceeds without the
    /// elevated duration. The elevated duration is not echoed back.
    pub async fn long_term_login(
        &self,
        key: &str,
        credentials: Option<Credentials>,
        requested_secs: Option<i64>,
    ) -> AppResult<LoginOutcome> {
        let requested_secs = if !self.long_term_key_matches(key) {
            warn!("Long-term login key did not match the configured key");
            requested_secs
        } else if requested_secs.is_some() {
            info!("Long-term key matched; caller-supplied duration kept");
            requested_secs
        } else {
            info!(duration_secs = self.config.long_term_secs, "Long-term token duration applied");
            Some(self.config.long_term_secs)
        };
        self.password_login(credentials, requested_secs).await
    }

    fn long_term_key_matches(&self, key: &str) -> bool {
        let configured = self.config.long_term_key.as_bytes();
        !configured.is_empty() && bool::from(configured.ct_eq(key.as_bytes()))
    }

    /// Server login with a name and the shared server secret.
    pub async fn server_login(
        &self,
        server_name: Option<&str>,
        secret: Option<&str>,
        requested_secs: Option<i64>,
    ) -> AppResult<IssuedToken> {
        let (Some(name), Some(secret)) = (
            server_name.filter(|s| !s.is_empty()),
            secret.filter(|s| !s.is_empty()),
        ) else {
            return Err(self.reject(
                ErrorKind::Validation,
                StatusReason::MissingIdPw,
                "server name or secret missing",
            ));
        };

        let matches: bool = self
            .config
            .server_secret
            .as_bytes()
            .ct_eq(secret.as_bytes())
            .into();
        if !matches {
            return Err(self.reject(
                ErrorKind::Unauthorized,
                StatusReason::PwWrong,
                format_args!("wrong secret for server {name}"),
            ));
        }

        let issued = self
            .sessions
            .create(name, true, requested_secs)
            .await
            .map_err(|e| self.reject(ErrorKind::Internal, StatusReason::ErrGeneratingToken, e))?;

        info!(server = name, "Server login");
        Ok(issued)
    }

    /// Federated login via an upstream bearer token.
    ///
    /// The duration is always the service default; no override is accepted.
    pub async fn federated_login(&self, authorization: Option<&str>) -> AppResult<FederatedOutcome> {
        let Some(identity) = self.identity.as_ref() else {
            warn!("Federated login requested but no identity provider is configured");
            return Err(AppError::service_unavailable("Federated login is not enabled"));
        };

        let Some(header) = authorization.filter(|h| !h.is_empty()) else {
            return Err(self.reject(
                ErrorKind::Validation,
                StatusReason::AuthHeaderRequired,
                "no Authorization header",
            ));
        };
        let Some(upstream_token) = bearer_token(header) else {
            return Err(self.reject(
                ErrorKind::Unauthorized,
                StatusReason::AuthHeaderInvalid,
                "Authorization header is not a bearer token",
            ));
        };

        let introspection = identity.introspect(upstream_token).await.map_err(|e| {
            self.reject(ErrorKind::Unauthorized, StatusReason::AuthHeaderInvalid, e)
        })?;
        if !introspection.active || introspection.user_id.is_empty() {
            return Err(self.reject(
                ErrorKind::Unauthorized,
                StatusReason::AuthHeaderInvalid,
                "upstream token is not active",
            ));
        }

        let user = self
            .users
            .find_by_id(&introspection.user_id)
            .await
            .map_err(|e| self.reject(ErrorKind::ExternalService, StatusReason::ErrFindingUsr, e))?
            .ok_or_else(|| {
                self.reject(
                    ErrorKind::Unauthorized,
                    StatusReason::NoMatch,
                    format_args!("no local user {}", introspection.user_id),
                )
            })?;

        let issued = self
            .sessions
            .create(&user.id, false, None)
            .await
            .map_err(|e| self.reject(ErrorKind::Internal, StatusReason::ErrGeneratingToken, e))?;

        info!(user_id = %user.id, "Federated login");
        Ok(FederatedOutcome {
            issued,
            user: user.to_public(),
            target: introspection.auth_user_id,
        })
    }

    // ── Session ──────────────────────────────────────────────

    /// Authenticate the presented token and issue a fresh one.
    pub async fn refresh(&self, token: Option<&str>) -> AppResult<IssuedToken> {
        let current = self
            .sessions
            .authenticate(token.unwrap_or_default())
            .await
            .map_err(|e| self.session_rejection(e, StatusReason::NoToken))?;

        self.sessions
            .refresh(&current)
            .await
            .map_err(|e| self.reject(ErrorKind::Internal, StatusReason::ErrGeneratingToken, e))
    }

    /// Let a server caller validate a token it did not mint.
    ///
    /// The caller's own token is checked by signature only against every
    /// accepted key and must carry the server flag.
    pub async fn check_token(&self, caller_token: Option<&str>, target: &str) -> AppResult<TokenData> {
        let caller = caller_token
            .filter(|t| !t.is_empty())
            .map(|t| self.sessions.verify_signature(t));
        match caller {
            Some(Ok(data)) if data.isserver => {}
            _ => {
                return Err(self.reject(
                    ErrorKind::Unauthorized,
                    StatusReason::NoToken,
                    format_args!(
                        "caller token {} is not a valid server token",
                        caller_token.map(token_prefix).unwrap_or("<none>")
                    ),
                ));
            }
        }

        self.sessions
            .authenticate(target)
            .await
            .map_err(|e| self.session_rejection(e, StatusReason::NoToken))
    }

    /// Revoke the presented token. Never fails.
    pub async fn logout(&self, token: Option<&str>) {
        if let Some(token) = token {
            self.sessions.revoke(token).await;
        }
    }

    // ── Users ────────────────────────────────────────────────

    /// Look a user up on behalf of the caller.
    ///
    /// `userid` matches id, username, or email; `None` means the caller
    /// itself. The caller needs `root` or `custodian` on the found user.
    pub async fn user_info(&self, token: Option<&str>, userid: Option<&str>) -> AppResult<PublicUser> {
        let caller = self
            .sessions
            .authenticate(token.unwrap_or_default())
            .await
            .map_err(|e| self.session_rejection(e, StatusReason::Unauthorized))?;

        let query = match userid.filter(|id| !id.is_empty()) {
            Some(id) => UserQuery::by_any(id),
            None => UserQuery::by_id(&caller.userid),
        };
        let mut found = self
            .users
            .find_users(&query)
            .await
            .map_err(|e| self.reject(ErrorKind::ExternalService, StatusReason::ErrFindingUsr, e))?;

        let user = match found.len() {
            0 => {
                return Err(self.reject(
                    ErrorKind::NotFound,
                    StatusReason::UserNotFound,
                    "no user matched",
                ));
            }
            1 => found.remove(0),
            n => {
                return Err(self.reject(
                    ErrorKind::Internal,
                    StatusReason::ErrFindingUsr,
                    format_args!("found {n} users matching {query:?}"),
                ));
            }
        };

        let requested = PermissionSet::from([Permission::Root, Permission::Custodian]);
        let granted = self
            .resolver
            .resolve(&caller, &user.id, &requested)
            .await
            .map_err(|e| self.reject(ErrorKind::ExternalService, StatusReason::ErrFindingUsr, e))?;

        if !granted.contains(&Permission::Root) && !granted.contains(&Permission::Custodian) {
            return Err(self.reject(
                ErrorKind::Unauthorized,
                StatusReason::Unauthorized,
                format_args!("{} may not read {}", caller.userid, user.id),
            ));
        }

        Ok(user.to_public())
    }

    /// Strip custodian permission from everyone on a custodial account.
    ///
    /// Used once the account holder sets their own password. Returns the
    /// number of custodians updated; the first failed update aborts the rest.
    pub async fn release_custodial_account(&self, account_id: &str) -> AppResult<usize> {
        self.resolver
            .revoke_permission(account_id, &Permission::Custodian)
            .await
            .map_err(|e| {
                let reason = match &e {
                    PermissionError::LookupFailed(_) => StatusReason::ErrFindingUsr,
                    PermissionError::UpdateFailed { .. } => StatusReason::ErrUpdatingUsr,
                };
                self.reject(ErrorKind::ExternalService, reason, e)
            })
    }

    // ── Status ───────────────────────────────────────────────

    /// Reachability of the session and user stores.
    pub async fn status(&self) -> AppResult<()> {
        self.sessions
            .health_check()
            .await
            .map_err(|e| self.reject(ErrorKind::ExternalService, StatusReason::GetstatusErr, e))?;
        self.users
            .health_check()
            .await
            .map_err(|e| self.reject(ErrorKind::ExternalService, StatusReason::GetstatusErr, e))
    }

    // ── Helpers ──────────────────────────────────────────────

    /// Map an `authenticate` failure. Store outages are upstream failures;
    /// anything else is rejected with `invalid_reason`.
    fn session_rejection(&self, err: SessionError, invalid_reason: StatusReason) -> AppError {
        match err {
            SessionError::StoreUnavailable(_) => {
                self.reject(ErrorKind::ExternalService, StatusReason::GetstatusErr, err)
            }
            other => self.reject(ErrorKind::Unauthorized, invalid_reason, other),
        }
    }

    /// Record, log, and build a classified rejection.
    fn reject(&self, kind: ErrorKind, reason: StatusReason, detail: impl Display) -> AppError {
        self.metrics.record(reason);
        let rejection = AppError::rejected(kind, reason);
        if rejection.is_server_side() {
            error!(reason = reason.metric_key(), %detail, "Request failed");
        } else {
            warn!(reason = reason.metric_key(), %detail, "Request rejected");
        }
        rejection
    }
}
