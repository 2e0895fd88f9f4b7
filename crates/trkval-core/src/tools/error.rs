use thiserror::Error;

/// Failure to run an external tool at all.
///
/// A tool that ran and exited non-zero is reported through [`crate::ToolStatus`] instead.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to spawn {tool}: {reason}")]
    Spawn { tool: &'static str, reason: String },

    #[error("{tool} did not finish within {secs}s")]
    Timeout { tool: &'static str, secs: u64 },

    #[error("{tool} terminated abnormally: {reason}")]
    Wait { tool: &'static str, reason: String },

    #[error("io error: {0}")]
    Io(String),
}

impl ToolError {
    /// Tool that failed, `"unknown"` for bare I/O errors.
    pub fn tool(&self) -> &'static str {
        match self {
            ToolError::Spawn { tool, .. }
            | ToolError::Timeout { tool, .. }
            | ToolError::Wait { tool, .. } => tool,
            ToolError::Io(_) => "unknown",
        }
    }

    /// Bounded label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Spawn { .. } => "spawn_failed",
            ToolError::Timeout { .. } => "timeout",
            ToolError::Wait { .. } => "wait_failed",
            ToolError::Io(_) => "io",
        }
    }
}

impl From<std::io::Error> for ToolError {
    fn from(e: std::io::Error) -> Self {
        ToolError::Io(e.to_string())
    }
}
