//! Session lifecycle management: creation, authentication, refresh, and revocation.

pub mod manager;
pub mod token_source;

pub use manager::{IssuedToken, SessionManager};
pub use token_source::ServerTokenSource;
