//! # tessera-api
//!
//! HTTP API layer for Tessera built on Axum.
//!
//! Maps the header-based session protocol onto the flows in
//! `tessera-auth`, renders rejections as `{"code", "reason"}` bodies, and
//! owns the process-wide rejection counters.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use metrics::CounterSink;
pub use state::AppState;
