//! CLI argument definitions for schemalock.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Command-line interface for the schemalock schema comparison tool.
#[derive(Parser, Debug)]
#[command(name = "schemalock", disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// The command to run.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Structured subcommands for the schemalock CLI.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Checks a comparison report, running plugins over it first.
    Status(StatusArgs),
}

/// Arguments of the `status` command.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct StatusArgs {
    /// Report file to check; the report is read from stdin when omitted.
    #[arg(long, value_name = "FILE")]
    pub(crate) report: Option<Utf8PathBuf>,
    /// Comma-separated plugin executables, overriding the configured list.
    #[arg(long, value_name = "LIST")]
    pub(crate) plugins: Option<String>,
}
