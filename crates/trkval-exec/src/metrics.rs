//! Tool identifiers and error classification for metrics.

use trkval_core::ToolError;

use crate::ExecError;

/// Dataset discovery CLI.
pub const TOOL_DISCOVERY: &str = "discovery";

/// Job runner.
pub const TOOL_RUNNER: &str = "runner";

/// Plotting macro interpreter.
pub const TOOL_PLOTTER: &str = "plotter";

/// Downloader used to bootstrap the discovery CLI.
pub const TOOL_FETCH: &str = "fetch";

/// Convert an [`ExecError`] into the core-level [`ToolError`] for `tool`.
pub fn exec_error_to_tool_error(tool: &'static str, error: ExecError) -> ToolError {
    match error {
        ExecError::Timeout { secs, .. } => ToolError::Timeout { tool, secs },
        ExecError::Io(e) => ToolError::Wait {
            tool,
            reason: e.to_string(),
        },
        other => ToolError::Spawn {
            tool,
            reason: other.to_string(),
        },
    }
}
