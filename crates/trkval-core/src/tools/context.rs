use std::{fmt, sync::Arc};

use crate::{
    metrics::MetricsHandle,
    tools::{DiscoveryClient, JobRunner, PlotRenderer},
};

/// Collaborators shared by every sample the driver processes.
#[derive(Clone)]
pub struct DriverContext {
    discovery: Arc<dyn DiscoveryClient>,
    jobs: Arc<dyn JobRunner>,
    plots: Arc<dyn PlotRenderer>,
    metrics: MetricsHandle,
}

impl DriverContext {
    /// Create a context with no-op metrics.
    pub fn new(
        discovery: Arc<dyn DiscoveryClient>,
        jobs: Arc<dyn JobRunner>,
        plots: Arc<dyn PlotRenderer>,
    ) -> Self {
        Self {
            discovery,
            jobs,
            plots,
            metrics: crate::metrics::noop_metrics(),
        }
    }

    pub fn discovery(&self) -> &dyn DiscoveryClient {
        self.discovery.as_ref()
    }

    pub fn jobs(&self) -> &dyn JobRunner {
        self.jobs.as_ref()
    }

    pub fn plots(&self) -> &dyn PlotRenderer {
        self.plots.as_ref()
    }

    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }

    /// Replace the metrics backend and return updated context.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }
}

impl fmt::Debug for DriverContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverContext")
            .field("discovery", &"<dyn>")
            .field("jobs", &"<dyn>")
            .field("plots", &"<dyn>")
            .field("metrics", &"<handle>")
            .finish()
    }
}
