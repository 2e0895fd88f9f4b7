//! Metrics collection abstraction for the validation driver.
//!
//! Backends (prometheus, ...) implement [`MetricsBackend`] and are injected via [`crate::DriverContext`].
mod backend;
pub use backend::{MetricsBackend, MetricsHandle, SampleOutcome};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
