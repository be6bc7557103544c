//! Rejection accounting.

use crate::types::status::StatusReason;

/// Receives one call per classified rejection.
pub trait MetricsSink: Send + Sync + std::fmt::Debug + 'static {
    fn record(&self, reason: StatusReason);
}

/// A sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl MetricsSink for NoopSink {
    fn record(&self, _reason: StatusReason) {}
}
