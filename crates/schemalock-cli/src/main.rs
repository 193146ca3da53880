//! CLI entrypoint for the schemalock schema comparison tool.
//!
//! The binary delegates to [`schemalock_cli::run`], which loads
//! configuration, reads the comparison report, runs any configured plugins,
//! and renders the resulting warnings.

use std::io::{self, StderrLock, StdinLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let stdin: StdinLock<'_> = io::stdin().lock();
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    schemalock_cli::run(std::env::args_os(), stdin, &mut stdout, &mut stderr)
}
