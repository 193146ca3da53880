//! Layered configuration for the schemalock binaries.
//!
//! [`Config`] is loaded through `ortho_config`, which merges, from lowest to
//! highest precedence: built-in defaults, a configuration file named by
//! `--config-path`, `SCHEMALOCK_*` environment variables, and command-line
//! flags.

mod defaults;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, default_log_filter, default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Runtime configuration shared by the schemalock binaries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "SCHEMALOCK")]
pub struct Config {
    /// Comma-separated plugin executables to run after the comparison.
    #[serde(default)]
    #[ortho_config(default = String::new())]
    pub plugins: String,
    /// Tracing filter expression, for example `schemalock_plugins=debug`.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format of the log stream.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plugins: String::new(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Returns the configured plugin list, or `None` when it is blank.
    #[must_use]
    pub fn plugin_list(&self) -> Option<&str> {
        let trimmed = self.plugins.trim();
        (!trimmed.is_empty()).then_some(self.plugins.as_str())
    }

    /// Returns the tracing filter expression.
    #[must_use]
    pub const fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
