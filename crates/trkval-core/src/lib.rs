pub mod error;
pub use error::CoreError;

pub mod metrics;
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, SampleOutcome, noop_metrics};

pub mod tools;
pub use tools::{DiscoveryClient, DriverContext, JobRunner, PlotRenderer, ToolError, ToolStatus};

pub mod template;
pub use template::{JobField, MacroBindings, MacroField, Template};

mod jobcfg;
pub use jobcfg::{JobConfig, SecondaryFiles};

pub mod driver;
pub use driver::{FailReason, SampleReport, SampleState, SkipReason, ValidationDriver};

