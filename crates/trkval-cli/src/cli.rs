use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use trkval_model::binding::Era;
use trkval_observe::{LoggerFormat, LoggerTimeZone};

/// Tracking validation batch driver.
#[derive(Parser, Debug)]
#[command(name = "trkval", version, about)]
pub struct Cli {
    /// Log filter expression; overrides `TRKVAL_LOG`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output: text, json or journald.
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LoggerFormat,

    /// Timestamp timezone: utc or local.
    #[arg(long, global = true, default_value = "utc")]
    pub log_tz: LoggerTimeZone,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate every configured sample and archive the results.
    Run(RunArgs),
    /// Print the selection name results are filed under.
    Selection(SelectionArgs),
    /// Print the CSC rec-hit validation module declaration.
    Binding(BindingArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// JSON driver configuration; built-in defaults when omitted.
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Write the Prometheus text exposition here once the sweep is over.
    #[arg(long)]
    pub metrics_out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SelectionArgs {
    #[arg(long)]
    pub tag: String,
    #[arg(long, default_value = "")]
    pub quality: String,
    #[arg(long, default_value = "")]
    pub algorithm: String,
    #[arg(long, default_value = "")]
    pub label: String,
    /// Custom track collection.
    #[arg(long, default_value = "")]
    pub tracks: String,
}

#[derive(Args, Debug)]
pub struct BindingArgs {
    /// Also list the parameters in effect under this era.
    #[arg(long)]
    pub era: Option<Era>,
}
