//! Collaborator traits defined in `tessera-core` and implemented by other crates.

pub mod identity;
pub mod metrics;
pub mod permission;
pub mod session_store;
pub mod token_provider;
pub mod user_store;

pub use identity::{IdentityProvider, Introspection};
pub use metrics::{MetricsSink, NoopSink};
pub use permission::{GroupMembers, PermissionService};
pub use session_store::SessionStore;
pub use token_provider::ServerTokenProvider;
pub use user_store::UserStore;
