//! Vendor-agnostic parse metrics via a pluggable sink.
//!
//! Install a [`MetricsSink`] once at startup with [`set_sink`]; every call to
//! [`crate::RepoInitParserService::parse_str`] or [`crate::RepoInitParser::parse`]
//! then reports a [`ParseStats`], including calls rejected for size or read
//! errors. Without a sink the stats are dropped.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use repoinit_parser::metrics::{set_sink, MetricsSink, ParseStats};
//!
//! struct Counter(AtomicU64);
//!
//! impl MetricsSink for Counter {
//!     fn on_parse(&self, stats: &ParseStats) {
//!         self.0.fetch_add(stats.operations as u64, Ordering::Relaxed);
//!     }
//! }
//!
//! set_sink(Arc::new(Counter(AtomicU64::new(0))));
//! ```

use serde::Serialize;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tracing::warn;

/// Outcome of one parse, passed to [`MetricsSink::on_parse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Wall-clock time from the start of the call.
    pub duration: Duration,
    /// Script size in bytes, as far as it was read.
    pub bytes: usize,
    /// Operations produced, zero on failure.
    pub operations: usize,
    /// Whether the script was read and parsed without error.
    pub success: bool,
}

/// Receives parse metrics. Called synchronously on the parsing thread, so
/// implementations should return quickly.
pub trait MetricsSink: Send + Sync {
    fn on_parse(&self, stats: &ParseStats);
}

static SINK: OnceLock<Arc<dyn MetricsSink>> = OnceLock::new();

/// Parses before [`set_sink`] are not reported, and do not claim the slot.
fn report(stats: &ParseStats) {
    if let Some(sink) = SINK.get() {
        sink.on_parse(stats);
    }
}

/// Set the global metrics sink. Only the first call has an effect.
pub fn set_sink(sink: Arc<dyn MetricsSink>) {
    if SINK.set(sink).is_err() {
        warn!(
            "Metrics sink was already initialized. Ignoring subsequent set_sink call. \
             Set the sink before the first parse."
        );
    }
}

/// Records one parse to the global sink when dropped, so early returns are
/// still counted as failures.
pub(crate) struct ParseRecorder {
    start: Instant,
    bytes: usize,
    operations: usize,
    success: bool,
}

impl ParseRecorder {
    pub(crate) fn start(bytes: usize) -> Self {
        ParseRecorder {
            start: Instant::now(),
            bytes,
            operations: 0,
            success: false,
        }
    }

    pub(crate) fn set_bytes(&mut self, bytes: usize) {
        self.bytes = bytes;
    }

    pub(crate) fn succeeded(&mut self, operations: usize) {
        self.operations = operations;
        self.success = true;
    }

    fn stats(&self) -> ParseStats {
        ParseStats {
            duration: self.start.elapsed(),
            bytes: self.bytes,
            operations: self.operations,
            success: self.success,
        }
    }
}

impl Drop for ParseRecorder {
    fn drop(&mut self) {
        report(&self.stats());
    }
}
