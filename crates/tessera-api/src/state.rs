//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use tessera_auth::AuthFlows;
use tessera_core::config::AppConfig;

use crate::metrics::CounterSink;

/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Login, session, and user-info protocols
    pub flows: Arc<AuthFlows>,
    /// Rejection counters, also wired into `flows`
    pub metrics: Arc<CounterSink>,
}
