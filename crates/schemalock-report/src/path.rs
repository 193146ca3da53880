//! Separator-aware paths used inside schema snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator joining the segments of a [`Protopath`].
pub const PROTO_SEP: &str = ":#:";

/// Host file separator substituted for [`PROTO_SEP`] in display text.
#[cfg(windows)]
pub const FILE_SEP: &str = "\\";

/// Host file separator substituted for [`PROTO_SEP`] in display text.
#[cfg(not(windows))]
pub const FILE_SEP: &str = "/";

/// Rewrites every [`PROTO_SEP`] in `text` to [`FILE_SEP`].
///
/// ```
/// use schemalock_report::display_safe;
///
/// assert_eq!(display_safe("proto:#:user.proto"), "proto/user.proto");
/// ```
#[must_use]
pub fn display_safe(text: &str) -> String {
    text.replace(PROTO_SEP, FILE_SEP)
}

/// A schema file path stored with [`PROTO_SEP`] between segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Protopath(String);

impl Protopath {
    /// Wraps an already separator-joined path.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Joins path segments with [`PROTO_SEP`].
    #[must_use]
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = segments
            .into_iter()
            .map(|segment| segment.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(PROTO_SEP);
        Self(joined)
    }

    /// Returns the raw, separator-joined form.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns `true` when the path is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the path with host separators, suitable for display.
    #[must_use]
    pub fn to_display(&self) -> String {
        display_safe(&self.0)
    }
}

impl fmt::Display for Protopath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::single("user.proto", "user.proto")]
    #[case::nested("proto:#:v1:#:user.proto", "proto/v1/user.proto")]
    #[case::empty("", "")]
    #[cfg(not(windows))]
    fn display_rewrites_every_separator(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(Protopath::new(raw).to_display(), expected);
    }

    #[test]
    fn from_segments_joins_with_proto_separator() {
        let path = Protopath::from_segments(["proto", "user.proto"]);
        assert_eq!(path.as_str(), "proto:#:user.proto");
    }

    #[test]
    fn serialises_as_plain_string() {
        let json = serde_json::to_string(&Protopath::new("a:#:b")).expect("serialise");
        assert_eq!(json, "\"a:#:b\"");
    }
}
