//! # tessera-store
//!
//! Store implementations for Tessera's collaborator traits. The in-memory
//! backends suit single-node deployments, local development, and tests.

pub mod memory;

pub use memory::{MemorySessionStore, MemoryUserStore};
