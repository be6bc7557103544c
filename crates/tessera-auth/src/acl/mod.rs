//! Authorization resolution against the external permission graph.

pub mod resolver;

pub use resolver::PermissionResolver;
