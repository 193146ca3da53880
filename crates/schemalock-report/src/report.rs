//! The comparison report and its schema snapshots.

use std::io::Read;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::path::Protopath;
use crate::warning::Warning;

/// One schema definition in a snapshot.
///
/// The entry body is kept as opaque JSON: only plugins interpret it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(rename = "protopath")]
    filepath: Protopath,
    def: serde_json::Value,
}

impl Definition {
    /// Creates a definition for `filepath`.
    #[must_use]
    pub const fn new(filepath: Protopath, def: serde_json::Value) -> Self {
        Self { filepath, def }
    }

    /// Returns the file the definition came from.
    #[must_use]
    pub const fn filepath(&self) -> &Protopath {
        &self.filepath
    }

    /// Returns the definition body.
    #[must_use]
    pub const fn def(&self) -> &serde_json::Value {
        &self.def
    }
}

/// A point-in-time view of every schema definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    #[serde(default)]
    definitions: Vec<Definition>,
}

impl SchemaSnapshot {
    /// Creates a snapshot from its definitions.
    #[must_use]
    pub const fn new(definitions: Vec<Definition>) -> Self {
        Self { definitions }
    }

    /// Returns the definitions in the snapshot.
    #[must_use]
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }
}

/// Result of comparing the `current` and `updated` snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    current: SchemaSnapshot,
    #[serde(default)]
    updated: SchemaSnapshot,
    #[serde(default)]
    warnings: Vec<Warning>,
}

impl Report {
    /// Creates a report from both snapshots and the comparison warnings.
    #[must_use]
    pub const fn new(current: SchemaSnapshot, updated: SchemaSnapshot, warnings: Vec<Warning>) -> Self {
        Self {
            current,
            updated,
            warnings,
        }
    }

    /// Parses a report from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Parse`] when the text is not a valid report.
    pub fn from_json_str(text: &str) -> Result<Self, ReportError> {
        serde_json::from_str(text).map_err(|err| ReportError::Parse(Arc::new(err)))
    }

    /// Reads and parses a report from `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Read`] when the reader fails and
    /// [`ReportError::Parse`] when the content is not a valid report.
    pub fn from_json_reader(mut reader: impl Read) -> Result<Self, ReportError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|err| ReportError::Read(Arc::new(err)))?;
        Self::from_json_str(&text)
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

    /// Returns the accumulated warnings.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Appends a single warning.
    pub fn push_warning(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    /// Takes the warning list out of the report, leaving it empty.
    #[must_use]
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    /// Replaces the warning list.
    pub fn set_warnings(&mut self, warnings: Vec<Warning>) {
        self.warnings = warnings;
    }
}
