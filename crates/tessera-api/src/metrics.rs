//! Counter-backed metrics sink.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tessera_core::traits::metrics::MetricsSink;
use tessera_core::types::status::StatusReason;

/// One atomic counter per [`StatusReason`], owned by the process.
#[derive(Debug)]
pub struct CounterSink {
    counters: Vec<AtomicU64>,
}

impl CounterSink {
    pub fn new() -> Self {
        Self {
            counters: StatusReason::ALL.iter().map(|_| AtomicU64::new(0)).collect(),
        }
    }

    pub fn count(&self, reason: StatusReason) -> u64 {
        self.counters
            .get(reason.index())
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    /// Counter values keyed by metric key, zero counters included.
    pub fn snapshot(&self) -> BTreeMap<&'static str, u64> {
        StatusReason::ALL
            .iter()
            .map(|reason| (reason.metric_key(), self.count(*reason)))
            .collect()
    }
}

impl Default for CounterSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSink for CounterSink {
    fn record(&self, reason: StatusReason) {
        if let Some(counter) = self.counters.get(reason.index()) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }
}
