//! # tessera-auth
//!
//! The session-token lifecycle and authorization-resolution engine.
//!
//! ## Modules
//!
//! - `jwt`: token claims, duration policy, signing and verification
//! - `session`: token creation, authentication against the revocation store, refresh, revoke
//! - `acl`: permission intersection against the external permission graph
//! - `password`: Argon2id password hashing and verification
//! - `flow`: the login, refresh, check-token, logout, and user-info protocols

pub mod acl;
pub mod error;
pub mod flow;
pub mod jwt;
pub mod password;
pub mod session;

pub use acl::PermissionResolver;
pub use error::{CreationFailure, InvalidToken, MintError, PermissionError, SessionError, TokenError};
pub use flow::{AuthFlows, Credentials, FederatedOutcome, FlowConfig, LoginOutcome};
pub use jwt::{DurationPolicy, TokenData, TokenDecoder, TokenEncoder};
pub use password::PasswordHasher;
pub use session::{IssuedToken, ServerTokenSource, SessionManager};
