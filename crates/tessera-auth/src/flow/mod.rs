//! Entry protocols: login variants, refresh, check-token, logout, user info.

pub mod credentials;
pub mod orchestrator;

pub use credentials::{Credentials, bearer_token};
pub use orchestrator::{AuthFlows, FederatedOutcome, FlowConfig, LoginOutcome};
