//! Domain errors raised by plugin runs.
//!
//! Errors split along the propagation policy of a run: [`ResolveError`] is
//! absorbed by the invocation that hit it, while [`ExecutionError`] and
//! plugin-reported messages become [`PluginFailure`] records and surface
//! together as an [`AggregatedError`]. I/O and JSON errors are wrapped in
//! `Arc` so every type here stays `Clone` and cheap to move across threads.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use schemalock_report::display_safe;
use thiserror::Error;

/// Errors returned by a whole plugin run.
#[derive(Debug, Clone, Error)]
pub enum PluginRunError {
    /// The report could not be serialised into the exchange payload. No
    /// plugin was started.
    #[error("failed to build plugin payload: {0}")]
    BuildPayload(#[source] Arc<serde_json::Error>),

    /// One or more plugins failed.
    #[error(transparent)]
    Plugins(#[from] AggregatedError),

    /// The result collector stopped before the run finished.
    #[error("plugin result collector terminated unexpectedly")]
    Collector,
}

/// A plugin name could not be turned into an executable path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The plugin name was empty after trimming.
    #[error("plugin name is empty")]
    EmptyName,

    /// No executable with this name exists on the search path.
    #[error("executable file '{name}' not found in search path")]
    NotFound {
        /// Name that was looked up.
        name: String,
    },

    /// The name points at a file that is missing or not executable.
    #[error("'{}' is not an executable file", path.display())]
    NotExecutable {
        /// Path that was checked.
        path: PathBuf,
    },
}

/// A plugin process could not be run to a successful exit.
#[derive(Debug, Clone, Error)]
pub enum ExecutionError {
    /// The process could not be started.
    #[error("failed to start: {source}")]
    Spawn {
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// Capturing the process output failed part way through.
    #[error("I/O error while running plugin: {source}")]
    Io {
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
        /// Output captured before the failure.
        output: Vec<u8>,
    },

    /// The process exited unsuccessfully.
    #[error("{}", describe_exit(.code.as_ref()))]
    NonZeroExit {
        /// Exit code, or `None` when the process was killed by a signal.
        code: Option<i32>,
        /// Combined stdout and stderr of the process.
        output: Vec<u8>,
    },
}

impl ExecutionError {
    /// Returns the output captured before the failure, if any.
    #[must_use]
    pub fn output(&self) -> &[u8] {
        match self {
            Self::Spawn { .. } => &[],
            Self::Io { output, .. } | Self::NonZeroExit { output, .. } => output,
        }
    }
}

fn describe_exit(code: Option<&i32>) -> String {
    match code {
        Some(status) => format!("exit status {status}"),
        None => String::from("terminated by signal"),
    }
}

/// Why a single plugin invocation failed.
#[derive(Debug, Clone, Error)]
pub enum FailureCause {
    /// The process failed to launch or exited unsuccessfully.
    #[error(transparent)]
    Process(ExecutionError),

    /// The plugin exited cleanly but reported an error message.
    #[error("{0}")]
    Reported(String),

    /// The invocation task panicked before reporting an outcome.
    #[error("plugin invocation panicked")]
    Panicked,
}

/// Failure description for one plugin invocation.
///
/// The display form is `name (path): cause` followed by the plugin output on
/// the next line, with internal path separators rewritten for display.
#[derive(Debug, Clone)]
pub struct PluginFailure {
    name: String,
    path: PathBuf,
    cause: FailureCause,
    output: String,
}

impl PluginFailure {
    /// Creates a failure record, decoding `output` lossily as UTF-8.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        cause: FailureCause,
        output: &[u8],
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            cause,
            output: String::from_utf8_lossy(output).into_owned(),
        }
    }

    /// Returns the plugin name as configured, trimmed.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the resolved executable path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the underlying cause.
    #[must_use]
    pub const fn cause(&self) -> &FailureCause {
        &self.cause
    }

    /// Returns the raw plugin output.
    #[must_use]
    pub const fn output(&self) -> &str {
        self.output.as_str()
    }
}

impl fmt::Display for PluginFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}\n{}",
            self.name,
            self.path.display(),
            self.cause,
            display_safe(&self.output)
        )
    }
}

impl std::error::Error for PluginFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// Every plugin failure gathered during one run.
#[derive(Debug, Clone, Error)]
#[error("accumulated plugin errors:\n{}", join_failures(.failures))]
pub struct AggregatedError {
    failures: Vec<PluginFailure>,
}

impl AggregatedError {
    /// Wraps the gathered failures.
    #[must_use]
    pub const fn new(failures: Vec<PluginFailure>) -> Self {
        Self { failures }
    }

    /// Returns the individual failures in arrival order.
    #[must_use]
    pub fn failures(&self) -> &[PluginFailure] {
        &self.failures
    }
}

fn join_failures(failures: &[PluginFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
