mod cli;
mod commands;

use clap::Parser;
use trkval_observe::{LoggerConfig, LoggerTimeZone, init_local_offset, init_logger};

use crate::cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // Offset detection needs a single-threaded process.
    if cli.log_tz == LoggerTimeZone::Local {
        init_local_offset();
    }

    let log_cfg = LoggerConfig {
        format: cli.log_format,
        tz: cli.log_tz,
        ..LoggerConfig::default()
    }
    .with_env_override()?
    .with_level_override(cli.log_level.as_deref())?;
    init_logger(&log_cfg)?;

    match cli.command {
        Command::Run(args) => commands::run(args),
        Command::Selection(args) => {
            println!("{}", commands::selection(&args));
            Ok(())
        }
        Command::Binding(args) => {
            print!("{}", commands::binding(&args)?);
            Ok(())
        }
    }
}
