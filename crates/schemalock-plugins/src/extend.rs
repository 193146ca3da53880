//! Plugin-side helper for answering the host.
//!
//! Plugin executables read one [`ExchangePayload`] from stdin and write one
//! back to stdout. [`serve`] wraps that exchange so a plugin only supplies
//! the analysis step.
//!
//! # Example
//!
//! ```
//! use schemalock_plugins::extend::serve;
//! use schemalock_report::{Protopath, Warning};
//!
//! let input = br#"{"current": {}, "updated": {}, "protolock_warnings": [], "plugin_warnings": []}"#;
//! let mut output = Vec::new();
//! serve(&input[..], &mut output, |payload| {
//!     payload.with_plugin_warnings(vec![Warning::new(
//!         Protopath::new("a.proto"),
//!         "enum value renamed",
//!     )])
//! })
//! .expect("exchange succeeds");
//! assert!(String::from_utf8_lossy(&output).contains("enum value renamed"));
//! ```

use std::io::{Read, Write};
use std::sync::Arc;

use thiserror::Error;

use crate::protocol::ExchangePayload;

/// Errors raised while a plugin exchanges data with the host.
#[derive(Debug, Clone, Error)]
pub enum ExtendError {
    /// The host payload could not be decoded.
    #[error("failed to decode host payload: {0}")]
    Decode(#[source] Arc<serde_json::Error>),

    /// The response could not be written.
    #[error("failed to write plugin response: {0}")]
    Encode(#[source] Arc<serde_json::Error>),

    /// The output stream failed.
    #[error("I/O error writing plugin response: {0}")]
    Io(#[source] Arc<std::io::Error>),
}

/// Reads the host payload from `reader`, applies `handler`, and writes the
/// result to `writer` followed by a newline.
///
/// # Errors
///
/// Returns [`ExtendError`] when the payload cannot be decoded or the
/// response cannot be written.
pub fn serve<R, W, F>(reader: R, mut writer: W, handler: F) -> Result<(), ExtendError>
where
    R: Read,
    W: Write,
    F: FnOnce(ExchangePayload) -> ExchangePayload,
{
    let payload: ExchangePayload =
        serde_json::from_reader(reader).map_err(|err| ExtendError::Decode(Arc::new(err)))?;
    let response = handler(payload);
    serde_json::to_writer(&mut writer, &response)
        .map_err(|err| ExtendError::Encode(Arc::new(err)))?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|err| ExtendError::Io(Arc::new(err)))
}
