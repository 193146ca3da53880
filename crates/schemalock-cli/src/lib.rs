//! Command-line runtime for the schemalock schema comparison tool.
//!
//! The module owns argument parsing, configuration bootstrapping, report
//! loading and the plugin run. Configuration loading, the plugin runner and
//! every IO stream can be substituted so the runtime is exercised from tests
//! without touching the process environment.
//!
//! Exit codes:
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | `0`  | The report carries no warnings                            |
//! | `1`  | The report carries warnings, printed one per line         |
//! | `2`  | A plugin failed, or the input could not be loaded         |

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::process::ExitCode;

use camino::Utf8Path;
use clap::Parser;
use tracing::debug;

use schemalock_config::Config;
use schemalock_plugins::{PluginExecutor, PluginResolver, PluginRunner};
use schemalock_report::Report;

mod cli;
mod config;
mod errors;
mod output;
mod telemetry;


use cli::{Cli, CliCommand, StatusArgs};
use config::{ConfigArgumentSplit, ConfigLoader, OrthoConfigLoader, split_config_arguments};
use errors::AppError;

const CLI_TARGET: &str = "schemalock_cli";
const EXIT_WARNINGS: u8 = 1;
const EXIT_ERROR: u8 = 2;

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, R: Read, W: Write, E: Write> {
    pub(crate) stdin: R,
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, R: Read, W: Write, E: Write> IoStreams<'a, R, W, E> {
    pub(crate) const fn new(stdin: R, stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
        }
    }
}

struct CliRunner<'a, 'io, R, W, E, L, PR, PE>
where
    R: Read,
    W: Write,
    E: Write,
{
    io: &'a mut IoStreams<'io, R, W, E>,
    loader: &'a L,
    plugins: &'a PluginRunner<PR, PE>,
    install_telemetry: bool,
}

impl<'a, 'io, R, W, E, L, PR, PE> CliRunner<'a, 'io, R, W, E, L, PR, PE>
where
    R: Read,
    W: Write,
    E: Write,
    L: ConfigLoader,
    PR: PluginResolver,
    PE: PluginExecutor,
{
    const fn new(
        io: &'a mut IoStreams<'io, R, W, E>,
        loader: &'a L,
        plugins: &'a PluginRunner<PR, PE>,
    ) -> Self {
        Self {
            io,
            loader,
            plugins,
            install_telemetry: true,
        }
    }

    #[cfg(test)]
    const fn without_telemetry(mut self) -> Self {
        self.install_telemetry = false;
        self
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);
        let cli_arguments = prepare_cli_arguments(&args, &split);

        let cli = match Cli::try_parse_from(cli_arguments) {
            Ok(cli) => cli,
            Err(error) if !error.use_stderr() => {
                // --help and --version land here.
                let _ = write!(self.io.stdout, "{error}");
                return ExitCode::SUCCESS;
            }
            Err(error) => return self.fail(&AppError::CliUsage(error)),
        };

        let result = self
            .loader
            .load(&split.config_arguments)
            .and_then(|config| self.execute(&cli, &config));

        match result {
            Ok(exit_code) => exit_code,
            Err(error) => self.fail(&error),
        }
    }

    fn execute(&mut self, cli: &Cli, config: &Config) -> Result<ExitCode, AppError> {
        if self.install_telemetry {
            telemetry::initialise(config)?;
        }
        match &cli.command {
            CliCommand::Status(args) => self.status(args, config),
        }
    }

    fn status(&mut self, args: &StatusArgs, config: &Config) -> Result<ExitCode, AppError> {
        let loaded = self.load_report(args.report.as_deref())?;
        let plugin_list = args.plugins.as_deref().or_else(|| config.plugin_list());

        let report = match plugin_list {
            Some(list) => {
                debug!(target: CLI_TARGET, plugins = list, "running plugins");
                self.plugins.run(list, loaded)?
            }
            None => loaded,
        };

        output::write_warnings(self.io.stdout, report.warnings())
            .map_err(AppError::WriteOutput)?;
        if report.warnings().is_empty() {
            Ok(ExitCode::SUCCESS)
        } else {
            Ok(ExitCode::from(EXIT_WARNINGS))
        }
    }

    fn load_report(&mut self, report_path: Option<&Utf8Path>) -> Result<Report, AppError> {
        let Some(path) = report_path else {
            return Ok(Report::from_json_reader(&mut self.io.stdin)?);
        };
        let file = File::open(path).map_err(|source| AppError::OpenReport {
            path: path.to_owned(),
            source,
        })?;
        Ok(Report::from_json_reader(BufReader::new(file))?)
    }

    fn fail(&mut self, error: &AppError) -> ExitCode {
        let _ = writeln!(self.io.stderr, "{error}");
        ExitCode::from(EXIT_ERROR)
    }
}

fn prepare_cli_arguments(args: &[OsString], split: &ConfigArgumentSplit) -> Vec<OsString> {
    args.first()
        .into_iter()
        .chain(args.get(split.command_start..).unwrap_or_default())
        .cloned()
        .collect()
}

/// Runs the CLI using the provided arguments and IO handles.
///
/// The report is read from `stdin` unless `status --report` names a file.
/// Warnings are written to `stdout`; errors are written to `stderr`.
#[must_use]
pub fn run<I, R, W, E>(args: I, stdin: R, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdin, stdout, stderr);
    let plugins = PluginRunner::system();
    CliRunner::new(&mut io, &OrthoConfigLoader, &plugins).run(args)
}
