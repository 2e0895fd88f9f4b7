//! External collaborators of the driver.
//!
//! The driver only sees these traits; `trkval-exec` provides subprocess-backed
//! implementations and tests plug in in-memory fakes.
mod error;
pub use error::ToolError;

mod context;
pub use context::DriverContext;

use std::path::Path;

use async_trait::async_trait;

/// Exit status of an external tool that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStatus {
    code: Option<i32>,
}

impl ToolStatus {
    pub const SUCCESS: ToolStatus = ToolStatus { code: Some(0) };

    /// `None` means the process was terminated by a signal.
    pub const fn new(code: Option<i32>) -> Self {
        Self { code }
    }

    pub const fn code(&self) -> Option<i32> {
        self.code
    }

    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Dataset discovery service.
#[async_trait]
pub trait DiscoveryClient: Send + Sync {
    /// Latest primary dataset produced for `sample` in `release` with `tag`.
    async fn find_dataset(
        &self,
        sample: &str,
        release: &str,
        tag: &str,
    ) -> Result<Option<String>, ToolError>;

    /// Files of `dataset` belonging to `sample`, one entry per file.
    async fn list_files(&self, dataset: &str, sample: &str) -> Result<Vec<String>, ToolError>;

    /// Parent dataset of `dataset`.
    async fn find_parent(&self, dataset: &str, sample: &str) -> Result<Option<String>, ToolError>;
}

/// Executes a generated job configuration.
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Run the job described by `config`, sending all output to `log`.
    async fn run(&self, config: &Path, log: &Path) -> Result<ToolStatus, ToolError>;
}

/// Renders comparison plots from a generated macro.
#[async_trait]
pub trait PlotRenderer: Send + Sync {
    /// Run the macro in batch mode, sending stdout to `log`.
    async fn render(&self, macro_file: &Path, log: &Path) -> Result<ToolStatus, ToolError>;
}
