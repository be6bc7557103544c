//! Authorization header parsing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// A login name and password taken from a Basic header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username or email.
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Parse `Basic base64(user:password)`.
    ///
    /// Splits on the first `:`. Returns `None` when the scheme is wrong, the
    /// payload does not decode, or either part is empty.
    pub fn from_basic_header(header: &str) -> Option<Self> {
        let (scheme, encoded) = header.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }
        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (user, password) = decoded.split_once(':')?;
        if user.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self::new(user, password))
    }
}

/// The token of a `Bearer <token>` header, if well-formed and non-empty.
pub fn bearer_token(header: &str) -> Option<&str> {
    let scheme = header.get(..6)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    header.get(7..).filter(|token| !token.is_empty())
}
