//! dashmap-backed stores.

pub mod session;
pub mod user;

pub use session::MemorySessionStore;
pub use user::MemoryUserStore;
