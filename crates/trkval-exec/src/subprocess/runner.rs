use std::{fs::File, path::PathBuf, process::Stdio};

use tokio::process::Command;
use tracing::{debug, trace};

use crate::{
    ExecError,
    subprocess::config::{CommandSpec, OutputTarget},
};

/// Longest captured line echoed at trace level.
const MAX_TRACE_LINE: usize = 4096;

/// Result of a command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    code: Option<i32>,
    stdout: String,
}

impl CommandOutput {
    /// Exit code; `None` when the process was terminated by a signal.
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Captured stdout (empty unless stdout was [`OutputTarget::Capture`]).
    pub fn stdout(&self) -> &str {
        &self.stdout
    }
}

/// Spawn `spec` and wait for it to exit.
///
/// A non-zero exit is not an error; callers decide what it means.
pub async fn run_command(spec: &CommandSpec) -> Result<CommandOutput, ExecError> {
    spec.validate()?;
    spec.trace_state();

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args).stdin(Stdio::null()).kill_on_drop(true);
    if let Some(cwd) = &spec.cwd {
        cmd.current_dir(cwd);
    }

    let mut opened = Vec::new();
    cmd.stdout(open_target(&spec.stdout, &mut opened)?);
    cmd.stderr(open_target(&spec.stderr, &mut opened)?);

    let child = cmd.spawn().map_err(|source| ExecError::Spawn {
        program: spec.program.clone(),
        source,
    })?;

    let wait = child.wait_with_output();
    let output = match spec.timeout {
        Some(limit) => tokio::time::timeout(limit, wait)
            .await
            .map_err(|_| ExecError::Timeout {
                program: spec.program.clone(),
                secs: limit.as_secs(),
            })??,
        None => wait.await?,
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    for line in stdout.lines() {
        let end = line
            .char_indices()
            .nth(MAX_TRACE_LINE)
            .map_or(line.len(), |(i, _)| i);
        trace!(tool = spec.tool, "{}", &line[..end]);
    }

    let code = output.status.code();
    debug!(tool = spec.tool, code = ?code, "command finished");
    Ok(CommandOutput { code, stdout })
}

/// Map an output target to a child stdio handle.
///
/// Targets naming the same file share one handle, so both streams land in a single log.
fn open_target(
    target: &OutputTarget,
    opened: &mut Vec<(PathBuf, File)>,
) -> Result<Stdio, ExecError> {
    let path = match target {
        OutputTarget::Capture => return Ok(Stdio::piped()),
        OutputTarget::Null => return Ok(Stdio::null()),
        OutputTarget::Inherit => return Ok(Stdio::inherit()),
        OutputTarget::File(path) => path,
    };
    let log_err = |source: std::io::Error| ExecError::LogFile {
        path: path.clone(),
        source,
    };

    if let Some((_, file)) = opened.iter().find(|(p, _)| p == path) {
        return Ok(Stdio::from(file.try_clone().map_err(log_err)?));
    }
    let file = File::create(path).map_err(log_err)?;
    let handle = file.try_clone().map_err(log_err)?;
    opened.push((path.clone(), file));
    Ok(Stdio::from(handle))
}
