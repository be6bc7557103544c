//! # tessera-core
//!
//! Core crate for Tessera. Contains the unified error system, configuration
//! schemas, the traits implemented by storage and upstream-service crates,
//! and the domain types shared by the token and authorization engines.
//!
//! This crate has **no** internal dependencies on other Tessera crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
