//! Concurrent plugin runs over a comparison report.
//!
//! [`PluginRunner::run`] serialises the report once, starts one invocation
//! per configured plugin name on its own thread, and funnels every result
//! through the [`Collector`](crate::collector). When every invocation has
//! finished the collector is stopped and its state decides the outcome:
//! any recorded failure turns the run into an [`AggregatedError`] and the
//! merged warnings are discarded, otherwise the report comes back with the
//! plugin warnings appended.
//!
//! Resolution failures and undecodable output are logged and skipped; the
//! plugin contributes nothing to the run.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::thread;

use tracing::{debug, info, warn};

use schemalock_report::Report;

use crate::collector::{Collector, CollectorHandle};
use crate::error::{AggregatedError, ExecutionError, FailureCause, PluginFailure, PluginRunError};
use crate::process::ProcessExecutor;
use crate::protocol::{Payload, decode_output};
use crate::resolver::{PathResolver, PluginResolver};

/// Tracing target for plugin runs.
const RUNNER_TARGET: &str = "schemalock_plugins::runner";

/// Trait abstracting plugin process execution for testability.
///
/// The production implementation is
/// [`ProcessExecutor`](crate::process::ProcessExecutor). Test code can
/// implement this trait to return canned output without spawning processes.
///
/// # Example
///
/// ```
/// use std::io::Read;
/// use std::path::Path;
///
/// use schemalock_plugins::ExecutionError;
/// use schemalock_plugins::runner::PluginExecutor;
///
/// struct EchoExecutor;
///
/// impl PluginExecutor for EchoExecutor {
///     fn execute(
///         &self,
///         _executable: &Path,
///         input: &mut (dyn Read + Send),
///     ) -> Result<Vec<u8>, ExecutionError> {
///         let mut output = Vec::new();
///         input.read_to_end(&mut output).map_err(|err| ExecutionError::Io {
///             source: err.into(),
///             output: Vec::new(),
///         })?;
///         Ok(output)
///     }
/// }
/// ```
pub trait PluginExecutor: Sync {
    /// Runs `executable` with `input` on its stdin and returns its combined
    /// stdout and stderr.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecutionError`] when the process cannot be started,
    /// output capture fails, or the process exits unsuccessfully.
    fn execute(
        &self,
        executable: &Path,
        input: &mut (dyn Read + Send),
    ) -> Result<Vec<u8>, ExecutionError>;
}

/// Terminal classification of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// The plugin succeeded without adding warnings.
    NoWarnings,
    /// The plugin succeeded and added this many warnings.
    Warnings(usize),
    /// The name did not resolve to an executable; the plugin was skipped.
    ResolutionFailed,
    /// The process failed to start or exited unsuccessfully.
    ProcessFailed,
    /// The output was not a valid response; the plugin was skipped.
    DecodeFailed,
    /// The plugin reported an error message.
    Reported,
}

/// Runs plugins against reports using a resolver and an executor.
///
/// # Example
///
/// ```
/// use schemalock_plugins::PluginRunner;
/// use schemalock_plugins::process::ProcessExecutor;
/// use schemalock_plugins::resolver::PathResolver;
/// use schemalock_report::Report;
///
/// let runner = PluginRunner::new(PathResolver::with_search_path("/nonexistent"), ProcessExecutor);
/// // Unresolvable plugins are skipped, so the report comes back unchanged.
/// let report = runner.run("missing-a, missing-b", Report::default()).expect("run");
/// assert!(report.warnings().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PluginRunner<R, E> {
    resolver: R,
    executor: E,
}

impl PluginRunner<PathResolver, ProcessExecutor> {
    /// Creates a runner that searches `PATH` and spawns real processes.
    #[must_use]
    pub fn system() -> Self {
        Self::new(PathResolver::new(), ProcessExecutor)
    }
}

impl<R, E> PluginRunner<R, E> {
    /// Creates a runner with the given resolver and executor.
    #[must_use]
    pub const fn new(resolver: R, executor: E) -> Self {
        Self { resolver, executor }
    }

    /// Returns the resolver.
    #[must_use]
    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Returns the executor.
    #[must_use]
    pub const fn executor(&self) -> &E {
        &self.executor
    }
}

impl<R: PluginResolver, E: PluginExecutor> PluginRunner<R, E> {
    /// Runs every plugin in the comma-separated `plugin_list` against
    /// `report`.
    ///
    /// Names are trimmed; duplicates run once per occurrence. Every plugin
    /// receives the same payload and runs concurrently with the others.
    ///
    /// # Errors
    ///
    /// Returns [`PluginRunError::BuildPayload`] when the report cannot be
    /// serialised, [`PluginRunError::Plugins`] when any plugin failed, and
    /// [`PluginRunError::Collector`] if result collection broke down.
    pub fn run(&self, plugin_list: &str, mut report: Report) -> Result<Report, PluginRunError> {
        let payload = Payload::build(&report)?;
        let names: Vec<&str> = plugin_list.split(',').map(str::trim).collect();

        debug!(
            target: RUNNER_TARGET,
            plugins = names.len(),
            payload_bytes = payload.as_bytes().len(),
            "dispatching plugins"
        );

        let (handle, collector) = Collector::new(report.take_warnings());
        let accumulated = thread::scope(|scope| {
            let collector_task = scope.spawn(move || collector.run());

            let invocations: Vec<_> = names
                .iter()
                .map(|&name| {
                    let task_handle = handle.clone();
                    let shared = &payload;
                    scope.spawn(move || self.invoke(name, shared, &task_handle))
                })
                .collect();

            for (&name, invocation) in names.iter().zip(invocations) {
                match invocation.join() {
                    Ok(outcome) => debug!(
                        target: RUNNER_TARGET,
                        plugin = name,
                        ?outcome,
                        "plugin invocation finished"
                    ),
                    Err(_) => handle.send_failure(PluginFailure::new(
                        name,
                        PathBuf::new(),
                        FailureCause::Panicked,
                        &[],
                    )),
                }
            }

            handle.stop();
            collector_task.join()
        })
        .map_err(|_| PluginRunError::Collector)?;

        if !accumulated.failures.is_empty() {
            info!(
                target: RUNNER_TARGET,
                failures = accumulated.failures.len(),
                "plugin run failed"
            );
            return Err(AggregatedError::new(accumulated.failures).into());
        }

        info!(
            target: RUNNER_TARGET,
            warnings = accumulated.warnings.len(),
            "plugin run completed"
        );
        report.set_warnings(accumulated.warnings);
        Ok(report)
    }

    /// Runs a single plugin and forwards its results to the collector.
    fn invoke(&self, name: &str, payload: &Payload, collector: &CollectorHandle) -> InvocationOutcome {
        let path = match self.resolver.resolve(name) {
            Ok(path) => path,
            Err(err) => {
                warn!(
                    target: RUNNER_TARGET,
                    plugin = name,
                    error = %err,
                    "plugin exec error, skipping plugin"
                );
                return InvocationOutcome::ResolutionFailed;
            }
        };

        debug!(
            target: RUNNER_TARGET,
            plugin = name,
            executable = %path.display(),
            "running plugin"
        );

        let output = match self.executor.execute(&path, &mut payload.reader()) {
            Ok(output) => output,
            Err(err) => {
                let output = err.output().to_vec();
                collector.send_failure(PluginFailure::new(
                    name,
                    path,
                    FailureCause::Process(err),
                    &output,
                ));
                return InvocationOutcome::ProcessFailed;
            }
        };

        let response = match decode_output(&output) {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    target: RUNNER_TARGET,
                    plugin = name,
                    output = %String::from_utf8_lossy(&output),
                    error = %err,
                    "plugin data decode error, skipping plugin"
                );
                return InvocationOutcome::DecodeFailed;
            }
        };

        let (warnings, error_message) = response.into_plugin_parts();
        let warning_count = warnings.len();
        if !warnings.is_empty() {
            collector.send_warnings(name, warnings);
        }

        if !error_message.is_empty() {
            collector.send_failure(PluginFailure::new(
                name,
                path,
                FailureCause::Reported(error_message),
                &output,
            ));
            return InvocationOutcome::Reported;
        }

        if warning_count == 0 {
            InvocationOutcome::NoWarnings
        } else {
            InvocationOutcome::Warnings(warning_count)
        }
    }
}

/// Runs `plugin_list` against `report` using `PATH` lookup and real
/// processes.
///
/// # Errors
///
/// See [`PluginRunner::run`].
pub fn run_plugins(plugin_list: &str, report: Report) -> Result<Report, PluginRunError> {
    PluginRunner::system().run(plugin_list, report)
}
