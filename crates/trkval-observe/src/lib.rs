//! Logging setup for the `trkval` tools.
mod clock;
pub use clock::{LoggerRfc3339, LoggerTimeZone, init_local_offset};

mod config;
pub use config::{LOG_ENV, LoggerConfig};

mod error;
pub use error::{LoggerError, LoggerResult};

mod format;
pub use format::LoggerFormat;

mod level;
pub use level::LoggerLevel;

mod init;
pub use init::init_logger;
