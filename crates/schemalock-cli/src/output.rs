//! Rendering of report warnings for operators.

use std::io::{self, Write};

use schemalock_report::Warning;

/// Writes one line per warning.
pub(crate) fn write_warnings<W: Write>(writer: &mut W, warnings: &[Warning]) -> io::Result<()> {
    for warning in warnings {
        writeln!(writer, "{warning}")?;
    }
    writer.flush()
}
