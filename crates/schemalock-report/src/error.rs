//! Errors raised while loading a report.

use std::sync::Arc;

use thiserror::Error;

/// Errors arising from report loading.
#[derive(Debug, Clone, Error)]
pub enum ReportError {
    /// The report source could not be read.
    #[error("failed to read report: {0}")]
    Read(#[source] Arc<std::io::Error>),

    /// The report JSON was malformed.
    #[error("failed to parse report: {0}")]
    Parse(#[source] Arc<serde_json::Error>),
}
