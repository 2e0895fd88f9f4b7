use std::sync::Arc;

/// Terminal sample outcome for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// Results copied into the archive.
    Archived,
    /// Sentinel already present, nothing done.
    AlreadyValidated,
    /// Discovery returned no primary dataset.
    NoDataset,
    /// Discovery returned no parent dataset.
    NoParentDataset,
    /// Job or pipeline step failed.
    Failed,
}

impl SampleOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            SampleOutcome::Archived => "archived",
            SampleOutcome::AlreadyValidated => "already_validated",
            SampleOutcome::NoDataset => "no_dataset",
            SampleOutcome::NoParentDataset => "no_parent_dataset",
            SampleOutcome::Failed => "failed",
        }
    }
}

/// Backend metrics collection interface.
///
/// Labels stay low-cardinality: the global tag, the outcome and the tool name.
/// Sample names are never used as labels.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Called when the driver starts processing a sample.
    fn record_sample_started(&self, tag: &str);
    /// Called once per sample with its terminal outcome and wall time in milliseconds.
    fn record_sample_completed(&self, tag: &str, outcome: SampleOutcome, duration_ms: u64);
    /// Called when an external tool could not be run (spawn failure, timeout, ...).
    ///
    /// A tool that ran and returned a non-zero status is not a tool error.
    fn record_tool_error(&self, tool: &str, error_kind: &str);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
