use std::{path::Path, time::Duration};

use async_trait::async_trait;
use tracing::info;
use trkval_core::{PlotRenderer, ToolError, ToolStatus};
use trkval_model::DriverConfig;

use crate::{
    TOOL_PLOTTER, exec_error_to_tool_error, job::in_parent_dir,
    subprocess::{CommandSpec, OutputTarget, run_command},
};

/// [`PlotRenderer`] running the macro in batch mode: `<plotter> -b -q -l <macro>`.
#[derive(Debug, Clone)]
pub struct RootPlotter {
    program: String,
    timeout: Option<Duration>,
}

impl RootPlotter {
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_config(cfg: &DriverConfig) -> Self {
        Self::new(
            cfg.tools.plotter.as_str(),
            cfg.tools.timeout_secs.map(Duration::from_secs),
        )
    }

    fn command(&self, macro_file: &Path, log: &Path) -> CommandSpec {
        let spec = CommandSpec::new(TOOL_PLOTTER, self.program.as_str()).args(["-b", "-q", "-l"]);
        in_parent_dir(spec, macro_file)
            .stdout(OutputTarget::File(log.to_path_buf()))
            .timeout(self.timeout)
    }
}

#[async_trait]
impl PlotRenderer for RootPlotter {
    async fn render(&self, macro_file: &Path, log: &Path) -> Result<ToolStatus, ToolError> {
        let spec = self.command(macro_file, log);
        info!(command = %spec, "rendering plots");
        let out = run_command(&spec)
            .await
            .map_err(|e| exec_error_to_tool_error(TOOL_PLOTTER, e))?;
        Ok(ToolStatus::new(out.code()))
    }
}
