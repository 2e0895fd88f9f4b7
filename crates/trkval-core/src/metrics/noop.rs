use crate::metrics::backend::{MetricsBackend, SampleOutcome};

/// Metrics backend that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_sample_started(&self, _: &str) {}

    #[inline(always)]
    fn record_sample_completed(&self, _: &str, _: SampleOutcome, _: u64) {}

    #[inline(always)]
    fn record_tool_error(&self, _: &str, _: &str) {}
}
