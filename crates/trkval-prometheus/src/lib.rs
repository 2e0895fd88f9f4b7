//! Prometheus backend for the validation driver metrics.
//!
//! [`PrometheusMetrics`] implements [`trkval_core::MetricsBackend`]. The driver runs as a
//! batch job, so there is no scrape endpoint: callers dump the text exposition with
//! [`PrometheusMetrics::encode_text`] once the sweep is over.
//!
//! ## Metrics
//! - `trkval_samples_started_total{tag}` - Counter
//! - `trkval_samples_completed_total{tag, outcome}` - Counter
//! - `trkval_sample_duration_seconds{tag}` - Histogram
//! - `trkval_tool_errors_total{tool, error_kind}` - Counter

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
