//! Custom Axum extractors.

pub mod headers;

pub use headers::{AuthorizationHeader, DurationOverride, ServerCredentials, SessionToken};
