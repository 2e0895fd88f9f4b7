mod error;
pub use error::ExecError;

mod metrics;
pub use metrics::exec_error_to_tool_error;
pub use metrics::{TOOL_DISCOVERY, TOOL_FETCH, TOOL_PLOTTER, TOOL_RUNNER};

#[cfg(feature = "subprocess")]
pub mod subprocess;

#[cfg(feature = "subprocess")]
mod discovery;
#[cfg(feature = "subprocess")]
pub use discovery::{DbsDiscovery, ensure_discovery_tool};

#[cfg(feature = "subprocess")]
mod job;
#[cfg(feature = "subprocess")]
pub use job::CmsRunJob;

#[cfg(feature = "subprocess")]
mod plot;
#[cfg(feature = "subprocess")]
pub use plot::RootPlotter;
