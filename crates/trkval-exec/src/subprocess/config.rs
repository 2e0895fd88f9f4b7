use std::{fmt, path::PathBuf, time::Duration};

use tracing::trace;

use crate::ExecError;

/// Where a stream of the child process goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Collected into [`crate::subprocess::CommandOutput::stdout`] (stdout only).
    Capture,
    /// Truncated and written to the file.
    File(PathBuf),
    /// Discarded.
    Null,
    /// Shared with the parent process.
    Inherit,
}

/// Fully resolved external command.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Tool identifier for logs and metrics.
    pub(crate) tool: &'static str,
    /// Program to execute (e.g. `"cmsRun"`, `"./DDSearchCLI.py"`).
    pub(crate) program: String,
    pub(crate) args: Vec<String>,
    /// Working directory; `None` inherits the parent one.
    pub(crate) cwd: Option<PathBuf>,
    pub(crate) stdout: OutputTarget,
    pub(crate) stderr: OutputTarget,
    /// Kill the child after this long; `None` waits forever.
    pub(crate) timeout: Option<Duration>,
}

impl CommandSpec {
    /// New command with captured stdout and inherited stderr.
    pub fn new(tool: &'static str, program: impl Into<String>) -> Self {
        Self {
            tool,
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            stdout: OutputTarget::Capture,
            stderr: OutputTarget::Inherit,
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn stdout(mut self, target: OutputTarget) -> Self {
        self.stdout = target;
        self
    }

    pub fn stderr(mut self, target: OutputTarget) -> Self {
        self.stderr = target;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Validate the command before spawning.
    ///
    /// Rules:
    /// - `program` is not empty or whitespace-only;
    /// - stderr cannot be captured;
    /// - a zero timeout is rejected.
    pub fn validate(&self) -> Result<(), ExecError> {
        if self.program.trim().is_empty() {
            return Err(ExecError::InvalidSpec(format!("{}: program is empty", self.tool)));
        }
        if self.stderr == OutputTarget::Capture {
            return Err(ExecError::InvalidSpec(format!(
                "{}: stderr cannot be captured",
                self.tool
            )));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(ExecError::InvalidSpec(format!("{}: zero timeout", self.tool)));
        }
        Ok(())
    }

    /// Emit a trace-level log with the resolved command.
    pub fn trace_state(&self) {
        trace!(
            tool = self.tool,
            program = %self.program,
            args = ?self.args,
            cwd = ?self.cwd,
            stdout = ?self.stdout,
            stderr = ?self.stderr,
            timeout = ?self.timeout,
            "command resolved"
        );
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
