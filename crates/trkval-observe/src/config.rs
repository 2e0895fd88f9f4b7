use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::{LoggerFormat, LoggerLevel, LoggerResult, LoggerTimeZone};

/// Environment variable holding a filter expression that overrides the configured level.
pub const LOG_ENV: &str = "TRKVAL_LOG";

/// Logger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// Filter expression (e.g. `"info"`, `"trkval_exec=debug,info"`).
    pub level: LoggerLevel,
    pub tz: LoggerTimeZone,
    /// Include module targets in each record.
    pub with_targets: bool,
    /// Colour text output; ignored unless stdout is a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Replace the level with the value of [`LOG_ENV`] when it is set.
    ///
    /// An invalid expression is an error rather than silently ignored.
    pub fn with_env_override(self) -> LoggerResult<Self> {
        self.with_level_override(std::env::var(LOG_ENV).ok().as_deref())
    }

    /// Replace the level when `level` is present and non-empty.
    pub fn with_level_override(mut self, level: Option<&str>) -> LoggerResult<Self> {
        if let Some(raw) = level.filter(|s| !s.trim().is_empty()) {
            self.level = raw.parse()?;
        }
        Ok(self)
    }

    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}
