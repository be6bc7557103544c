//! User records as read by the authentication flows.
//!
//! Profile CRUD lives elsewhere; these types only carry what the token and
//! authorization engines need to decide: identity, deletion, verification,
//! and the stored password hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Stable user identifier.
    pub id: String,
    /// Login name. Custodial accounts may have none.
    #[serde(default)]
    pub username: Option<String>,
    /// Registered email addresses.
    #[serde(default)]
    pub emails: Vec<String>,
    /// Argon2id PHC string. `None` for custodial accounts.
    #[serde(default)]
    pub password_hash: Option<String>,
    /// Role names attached to the account.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Whether the account's email address has been confirmed.
    #[serde(default)]
    pub email_verified: bool,
    /// When the terms of use were accepted.
    #[serde(default)]
    pub terms_accepted: Option<DateTime<Utc>>,
    /// Soft-deletion timestamp.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Create a bare record with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            emails: Vec::new(),
            password_hash: None,
            roles: Vec::new(),
            email_verified: false,
            terms_accepted: None,
            deleted_at: None,
        }
    }

    /// Whether the account has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether the account passes the email-verification gate.
    ///
    /// A non-empty `verification_secret` appearing in the username or any
    /// email also counts as verified; test accounts rely on this.
    pub fn is_email_verified(&self, verification_secret: Option<&str>) -> bool {
        if self.email_verified {
            return true;
        }
        match verification_secret.filter(|s| !s.is_empty()) {
            Some(secret) => {
                self.username.as_deref().is_some_and(|u| u.contains(secret))
                    || self.emails.iter().any(|e| e.contains(secret))
            }
            None => false,
        }
    }

    /// Whether any field named by the query matches this record.
    pub fn matches(&self, query: &UserQuery) -> bool {
        if query.id.as_deref().is_some_and(|id| id == self.id) {
            return true;
        }
        if let Some(name) = query.username.as_deref() {
            if self.username.as_deref() == Some(name) {
                return true;
            }
        }
        if let Some(email) = query.email.as_deref() {
            if self.emails.iter().any(|e| e == email) {
                return true;
            }
        }
        false
    }

    /// The view returned to clients.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            userid: self.id.clone(),
            username: self.username.clone(),
            emails: self.emails.clone(),
            roles: self.roles.clone(),
            email_verified: self.email_verified,
            terms_accepted: self.terms_accepted,
        }
    }
}

/// Client-facing projection of a [`UserRecord`]. Never carries the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    /// Stable user identifier.
    pub userid: String,
    /// Login name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Registered email addresses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<String>,
    /// Role names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// Email confirmation flag.
    pub email_verified: bool,
    /// Terms acceptance timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_accepted: Option<DateTime<Utc>>,
}

/// Lookup criteria for [`crate::traits::UserStore::find_users`].
///
/// A record matches when any populated field matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UserQuery {
    /// Match on id only.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Match a login name against username or email.
    pub fn by_login(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: None,
            username: Some(name.clone()),
            email: Some(name),
        }
    }

    /// Match a value against id, username or email.
    pub fn by_any(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            id: Some(value.clone()),
            username: Some(value.clone()),
            email: Some(value),
        }
    }
}
