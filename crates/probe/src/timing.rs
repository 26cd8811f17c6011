//! Build timing.

use std::time::{Duration, Instant};

/// Name of the histogram [`MetricsSink`] records into, in seconds.
pub const SPY_DURATION_METRIC: &str = "probe_spy_duration_seconds";

/// Receives the wall-clock duration of one build.
pub trait TimingSink {
    fn observe(&self, elapsed: Duration);
}

/// Records build durations into the global `metrics` recorder.
#[derive(Clone, Copy, Debug, Default)]
pub struct MetricsSink;

impl TimingSink for MetricsSink {
    fn observe(&self, elapsed: Duration) {
        metrics::histogram!(SPY_DURATION_METRIC).record(elapsed.as_secs_f64());
    }
}

/// Sink that drops every sample.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TimingSink for NoopSink {
    fn observe(&self, _elapsed: Duration) {}
}

/// Reports the time since creation to a sink when dropped, so every exit
/// path of a build is observed exactly once.
pub(crate) struct Timer<'a> {
    sink: &'a dyn TimingSink,
    begin: Instant,
}

impl<'a> Timer<'a> {
    pub(crate) fn start(sink: &'a dyn TimingSink) -> Self {
        Self {
            sink,
            begin: Instant::now(),
        }
    }
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        self.sink.observe(self.begin.elapsed());
    }
}
