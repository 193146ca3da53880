//! Exchange protocol between the host and plugin executables.
//!
//! The host serialises one [`ExchangePayload`] as a JSON document and writes
//! it to each plugin's stdin. The plugin answers on stdout with a document of
//! the same shape, filling `plugin_warnings` and/or `plugin_error_message`.
//! Every field is optional on the way back so plugins may echo only what they
//! add.

use std::io::Cursor;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use schemalock_report::{Report, SchemaSnapshot, Warning};

use crate::error::PluginRunError;

/// Document exchanged with a plugin over its standard streams.
///
/// # Example
///
/// ```
/// use schemalock_plugins::protocol::ExchangePayload;
///
/// let response: ExchangePayload =
///     serde_json::from_str(r#"{"plugin_error_message": "unsupported syntax"}"#)
///         .expect("valid response");
/// assert_eq!(response.plugin_error_message(), "unsupported syntax");
/// assert!(response.plugin_warnings().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangePayload {
    #[serde(default)]
    current: SchemaSnapshot,
    #[serde(default)]
    updated: SchemaSnapshot,
    #[serde(rename = "protolock_warnings", default)]
    inherited_warnings: Vec<Warning>,
    #[serde(default)]
    plugin_warnings: Vec<Warning>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    plugin_error_message: String,
}

impl ExchangePayload {
    /// Builds the outbound document for `report`.
    #[must_use]
    pub fn from_report(report: &Report) -> Self {
        Self {
            current: report.current().clone(),
            updated: report.updated().clone(),
            inherited_warnings: report.warnings().to_vec(),
            plugin_warnings: Vec::new(),
            plugin_error_message: String::new(),
        }
    }

    /// Replaces the plugin warnings, for use when answering the host.
    #[must_use]
    pub fn with_plugin_warnings(mut self, warnings: Vec<Warning>) -> Self {
        self.plugin_warnings = warnings;
        self
    }

    /// Sets the plugin error message, for use when answering the host.
    #[must_use]
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.plugin_error_message = message.into();
        self
    }

    /// Returns the locked snapshot.
    #[must_use]
    pub const fn current(&self) -> &SchemaSnapshot {
        &self.current
    }

    /// Returns the snapshot being checked.
    #[must_use]
    pub const fn updated(&self) -> &SchemaSnapshot {
        &self.updated
    }

    /// Returns the warnings the host had already raised.
    #[must_use]
    pub fn inherited_warnings(&self) -> &[Warning] {
        &self.inherited_warnings
    }

    /// Returns the warnings added by the plugin.
    #[must_use]
    pub fn plugin_warnings(&self) -> &[Warning] {
        &self.plugin_warnings
    }

    /// Returns the plugin error message, empty when none was reported.
    #[must_use]
    pub const fn plugin_error_message(&self) -> &str {
        self.plugin_error_message.as_str()
    }

    /// Splits a plugin response into its warnings and error message.
    #[must_use]
    pub fn into_plugin_parts(self) -> (Vec<Warning>, String) {
        (self.plugin_warnings, self.plugin_error_message)
    }
}

/// Serialised outbound document shared by every invocation of a run.
///
/// The bytes are fixed at construction. Each invocation reads them through
/// its own cursor from offset zero, so no reader observes another's progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    bytes: Vec<u8>,
}

impl Payload {
    /// Serialises the outbound document for `report`, newline terminated.
    ///
    /// # Errors
    ///
    /// Returns [`PluginRunError::BuildPayload`] when the report cannot be
    /// serialised.
    pub fn build(report: &Report) -> Result<Self, PluginRunError> {
        let mut bytes = serde_json::to_vec(&ExchangePayload::from_report(report))
            .map_err(|err| PluginRunError::BuildPayload(Arc::new(err)))?;
        bytes.push(b'\n');
        Ok(Self { bytes })
    }

    /// Returns a fresh reader positioned at the start of the payload.
    #[must_use]
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(self.bytes.as_slice())
    }

    /// Returns the serialised bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Parses the captured output of a plugin that exited successfully.
///
/// # Errors
///
/// Returns the JSON error when the output is not an [`ExchangePayload`].
pub fn decode_output(output: &[u8]) -> Result<ExchangePayload, serde_json::Error> {
    serde_json::from_slice(output)
}
