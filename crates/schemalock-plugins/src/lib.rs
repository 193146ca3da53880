//! Plugin execution for schemalock comparison reports.
//!
//! After the comparison has produced a [`Report`](schemalock_report::Report),
//! the `schemalock-plugins` crate hands it to external plugin executables so
//! they can add warnings or reject the change outright. Plugins are ordinary
//! programs found on `PATH`; they receive an
//! [`ExchangePayload`](protocol::ExchangePayload) as JSON on stdin and answer
//! with the same document on stdout.
//!
//! # Architecture
//!
//! A run builds the payload once and starts one thread per configured
//! plugin name. Each invocation resolves its executable, runs it with its own
//! reader over the shared payload bytes, and decodes the combined output.
//! Results flow over a rendezvous channel to a single collector thread, the
//! only writer of the merged warnings and the failure list. Once every
//! invocation has finished the collector is stopped and the run either
//! returns the extended report or an [`AggregatedError`] listing every
//! failure.
//!
//! | Failure | Effect on the run |
//! |---------|-------------------|
//! | name does not resolve | logged, plugin skipped |
//! | process fails or exits non-zero | recorded, run fails |
//! | output is not a valid response | logged, plugin skipped |
//! | response carries an error message | recorded, run fails |
//!
//! # Example
//!
//! ```rust,no_run
//! use schemalock_plugins::run_plugins;
//! use schemalock_report::Report;
//!
//! let report = Report::from_json_str("{}").expect("valid report");
//! match run_plugins("schemalock-plugin-a, schemalock-plugin-b", report) {
//!     Ok(report) => println!("{} warnings", report.warnings().len()),
//!     Err(err) => eprintln!("{err}"),
//! }
//! ```

mod collector;
pub mod error;
pub mod extend;
pub mod process;
pub mod protocol;
pub mod resolver;
pub mod runner;

#[cfg(test)]
mod tests;

pub use self::error::{
    AggregatedError, ExecutionError, FailureCause, PluginFailure, PluginRunError, ResolveError,
};
pub use self::protocol::{ExchangePayload, Payload};
pub use self::resolver::{PathResolver, PluginResolver};
pub use self::runner::{InvocationOutcome, PluginExecutor, PluginRunner, run_plugins};
