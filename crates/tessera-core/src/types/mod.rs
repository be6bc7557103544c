//! Domain types shared by the token and authorization engines.

pub mod permission;
pub mod session;
pub mod status;
pub mod user;

pub use permission::{Permission, PermissionSet};
pub use session::SessionRecord;
pub use status::StatusReason;
pub use user::{PublicUser, UserQuery, UserRecord};
