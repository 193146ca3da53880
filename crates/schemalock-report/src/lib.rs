//! Schema comparison report model shared by the schemalock crates.
//!
//! A [`Report`] pairs the `current` (locked) and `updated` schema snapshots
//! with the warnings raised while comparing them. The report is produced
//! upstream of this workspace; the crates here only load it, hand it to
//! plugins, and render the outcome.
//!
//! Paths inside a snapshot use [`PROTO_SEP`] between segments. Anything shown
//! to an operator should go through [`display_safe`] first so the internal
//! separator never leaks into user-facing text.
//!
//! # Example
//!
//! ```
//! use schemalock_report::{Protopath, Report, Warning};
//!
//! let mut report = Report::default();
//! report.push_warning(Warning::new(
//!     Protopath::new("proto:#:user.proto"),
//!     "field \"id\" was removed",
//! ));
//! assert_eq!(report.warnings().len(), 1);
//! ```

mod error;
mod path;
mod report;
mod warning;

pub use self::error::ReportError;
pub use self::path::{FILE_SEP, PROTO_SEP, Protopath, display_safe};
pub use self::report::{Definition, Report, SchemaSnapshot};
pub use self::warning::Warning;
