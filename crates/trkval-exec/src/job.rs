use std::{path::Path, time::Duration};

use async_trait::async_trait;
use tracing::info;
use trkval_core::{JobRunner, ToolError, ToolStatus};
use trkval_model::DriverConfig;

use crate::{
    TOOL_RUNNER, exec_error_to_tool_error,
    subprocess::{CommandSpec, OutputTarget, run_command},
};

/// [`JobRunner`] that runs `<runner> <config>` inside the configuration's directory.
#[derive(Debug, Clone)]
pub struct CmsRunJob {
    program: String,
    timeout: Option<Duration>,
}

impl CmsRunJob {
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_config(cfg: &DriverConfig) -> Self {
        Self::new(
            cfg.tools.runner.as_str(),
            cfg.tools.timeout_secs.map(Duration::from_secs),
        )
    }

    fn command(&self, config: &Path, log: &Path) -> CommandSpec {
        let spec = in_parent_dir(CommandSpec::new(TOOL_RUNNER, self.program.as_str()), config);
        spec.stdout(OutputTarget::File(log.to_path_buf()))
            .stderr(OutputTarget::File(log.to_path_buf()))
            .timeout(self.timeout)
    }
}

#[async_trait]
impl JobRunner for CmsRunJob {
    async fn run(&self, config: &Path, log: &Path) -> Result<ToolStatus, ToolError> {
        let spec = self.command(config, log);
        info!(command = %spec, log = %log.display(), "running job");
        let out = run_command(&spec)
            .await
            .map_err(|e| exec_error_to_tool_error(TOOL_RUNNER, e))?;
        Ok(ToolStatus::new(out.code()))
    }
}

/// Run from the directory holding `file` and pass only its name.
///
/// Generated files reference their siblings by relative name, so the child must
/// start next to them.
pub(crate) fn in_parent_dir(spec: CommandSpec, file: &Path) -> CommandSpec {
    let spec = match file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => spec.cwd(dir),
        _ => spec,
    };
    match file.file_name() {
        Some(name) => spec.arg(name.to_string_lossy()),
        None => spec.arg(file.to_string_lossy()),
    }
}
