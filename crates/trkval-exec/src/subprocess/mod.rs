//! Blocking-until-exit subprocess execution on `tokio::process::Command`.
//!
//! Every external tool the driver uses goes through [`run_command`]: stdin is closed,
//! stdout/stderr are captured, sent to a log file, discarded or inherited, and an
//! optional timeout kills the child.
mod config;
pub use config::{CommandSpec, OutputTarget};

mod runner;
pub use runner::{CommandOutput, run_command};
