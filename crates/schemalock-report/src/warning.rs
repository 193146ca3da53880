//! Structured diagnostics raised by the comparison or by plugins.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::Protopath;

/// A diagnostic attached to a schema file.
///
/// Warnings are immutable once created. Empty fields are omitted when
/// serialised and default when absent, matching what plugins emit.
///
/// ```
/// use schemalock_report::{Protopath, Warning};
///
/// let warning = Warning::new(Protopath::new("a:#:b.proto"), "field removed")
///     .with_rule_name("NoRemovingFields");
/// assert_eq!(warning.rule_name(), "NoRemovingFields");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Warning {
    #[serde(default, skip_serializing_if = "Protopath::is_empty")]
    filepath: Protopath,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    message: String,
    #[serde(
        rename = "rulename",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    rule_name: String,
}

impl Warning {
    /// Creates a warning for `filepath` with the given message.
    #[must_use]
    pub fn new(filepath: Protopath, message: impl Into<String>) -> Self {
        Self {
            filepath,
            message: message.into(),
            rule_name: String::new(),
        }
    }

    /// Attaches the name of the rule that raised the warning.
    #[must_use]
    pub fn with_rule_name(mut self, rule_name: impl Into<String>) -> Self {
        self.rule_name = rule_name.into();
        self
    }

    /// Returns the file the warning refers to.
    #[must_use]
    pub const fn filepath(&self) -> &Protopath {
        &self.filepath
    }

    /// Returns the message text.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Returns the rule name, empty when none was recorded.
    #[must_use]
    pub const fn rule_name(&self) -> &str {
        self.rule_name.as_str()
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CONFLICT: \"{}\" [{}]", self.message, self.filepath)
    }
}
