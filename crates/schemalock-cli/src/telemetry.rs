//! Tracing setup for the `schemalock` binary.
//!
//! Diagnostics always go to stderr so stdout carries only warning lines.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, time::UtcTime};

use schemalock_config::{Config, LogFormat};

static INSTALLED: OnceCell<()> = OnceCell::new();

#[derive(Debug, thiserror::Error)]
pub(crate) enum TelemetryError {
    #[error("invalid log filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(#[source] SetGlobalDefaultError),
}

/// Logging choices resolved from configuration and the terminal.
#[derive(Debug)]
struct Settings {
    filter: EnvFilter,
    format: LogFormat,
    ansi: bool,
}

impl Settings {
    fn resolve(config: &Config, stderr_is_terminal: bool) -> Result<Self, TelemetryError> {
        let filter =
            EnvFilter::try_new(config.log_filter()).map_err(|error| TelemetryError::Filter {
                filter: config.log_filter().to_owned(),
                reason: error.to_string(),
            })?;
        Ok(Self {
            filter,
            format: config.log_format(),
            ansi: stderr_is_terminal && config.log_format() == LogFormat::Compact,
        })
    }
}

/// Installs the global subscriber on first use; later calls keep it.
pub(crate) fn initialise(config: &Config) -> Result<(), TelemetryError> {
    INSTALLED
        .get_or_try_init(|| {
            let settings = Settings::resolve(config, io::stderr().is_terminal())?;
            install(settings)
        })
        .map(|&()| ())
}

fn install(settings: Settings) -> Result<(), TelemetryError> {
    let base = fmt::Subscriber::builder()
        .with_env_filter(settings.filter)
        .with_target(true)
        .with_writer(io::stderr)
        .with_ansi(settings.ansi)
        .with_timer(UtcTime::rfc_3339());

    let installed = match settings.format {
        LogFormat::Json => {
            tracing::subscriber::set_global_default(base.json().flatten_event(true).finish())
        }
        LogFormat::Compact => tracing::subscriber::set_global_default(base.compact().finish()),
    };
    installed.map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn config(filter: &str, format: LogFormat) -> Config {
        Config {
            log_filter: filter.to_owned(),
            log_format: format,
            ..Config::default()
        }
    }

    #[rstest]
    #[case::compact_terminal(LogFormat::Compact, true, true)]
    #[case::compact_pipe(LogFormat::Compact, false, false)]
    #[case::json_terminal(LogFormat::Json, true, false)]
    fn colour_only_for_compact_output_on_a_terminal(
        #[case] format: LogFormat,
        #[case] terminal: bool,
        #[case] expected: bool,
    ) {
        let settings = Settings::resolve(&config("warn", format), terminal).expect("settings");
        assert_eq!(settings.ansi, expected);
        assert_eq!(settings.format, format);
    }

    #[test]
    fn rejects_malformed_filters() {
        let error = Settings::resolve(&config("schemalock=loud", LogFormat::Compact), false)
            .expect_err("filter should be rejected");
        assert!(error.to_string().contains("schemalock=loud"));
    }
}
