//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

use schemalock_plugins::PluginRunError;
use schemalock_report::ReportError;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("failed to initialise logging: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to open report '{path}': {source}")]
    OpenReport {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0}")]
    Report(#[from] ReportError),
    #[error("{0}")]
    Plugins(#[from] PluginRunError),
    #[error("failed to write warnings: {0}")]
    WriteOutput(#[source] io::Error),
}
