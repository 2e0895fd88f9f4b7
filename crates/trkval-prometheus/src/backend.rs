use std::sync::Arc;

use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    proto::MetricFamily,
};
use trkval_core::{MetricsBackend, SampleOutcome};

/// Sample wall time ranges from a skipped sample (milliseconds) to a full job (hours).
const DURATION_BUCKETS: [f64; 10] = [0.1, 1.0, 10.0, 30.0, 60.0, 300.0, 900.0, 1800.0, 3600.0, 7200.0];

/// Prometheus implementation of [`MetricsBackend`].
///
/// Label values are bounded: global tags come from configuration, outcomes from
/// [`SampleOutcome`], tools and error kinds from fixed sets.
#[derive(Clone)]
pub struct PrometheusMetrics {
    samples_started: CounterVec,
    samples_completed: CounterVec,
    sample_duration: HistogramVec,
    tool_errors: CounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let samples_started = CounterVec::new(
            Opts::new("trkval_samples_started_total", "Samples the driver started on"),
            &["tag"],
        )?;
        registry.register(Box::new(samples_started.clone()))?;

        let samples_completed = CounterVec::new(
            Opts::new(
                "trkval_samples_completed_total",
                "Samples that reached a terminal state",
            ),
            &["tag", "outcome"],
        )?;
        registry.register(Box::new(samples_completed.clone()))?;

        let sample_duration = HistogramVec::new(
            HistogramOpts::new(
                "trkval_sample_duration_seconds",
                "Wall time spent on one sample",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["tag"],
        )?;
        registry.register(Box::new(sample_duration.clone()))?;

        let tool_errors = CounterVec::new(
            Opts::new("trkval_tool_errors_total", "External tools that could not be run"),
            &["tool", "error_kind"],
        )?;
        registry.register(Box::new(tool_errors.clone()))?;

        Ok(Self {
            samples_started,
            samples_completed,
            sample_duration,
            tool_errors,
            registry,
        })
    }

    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Render every registered metric in the text exposition format.
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_sample_started(&self, tag: &str) {
        self.samples_started.with_label_values(&[tag]).inc();
    }

    fn record_sample_completed(&self, tag: &str, outcome: SampleOutcome, duration_ms: u64) {
        self.samples_completed
            .with_label_values(&[tag, outcome.as_label()])
            .inc();
        self.sample_duration
            .with_label_values(&[tag])
            .observe(duration_ms as f64 / 1000.0);
    }

    fn record_tool_error(&self, tool: &str, error_kind: &str) {
        self.tool_errors
            .with_label_values(&[tool, error_kind])
            .inc();
    }
}
