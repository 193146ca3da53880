//! Process-based plugin execution.
//!
//! [`ProcessExecutor`] implements [`PluginExecutor`] by spawning the plugin
//! executable, streaming the payload into its stdin, and capturing stdout and
//! stderr through one shared pipe so the two streams stay interleaved in the
//! order the plugin wrote them. The call blocks until the process exits; no
//! timeout is applied.

use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread;

use tracing::debug;

use crate::error::ExecutionError;
use crate::runner::PluginExecutor;

/// Tracing target for plugin process operations.
const PROCESS_TARGET: &str = "schemalock_plugins::process";

/// Executes plugins as child processes with combined output capture.
///
/// # Example
///
/// ```rust,no_run
/// use std::path::Path;
///
/// use schemalock_plugins::process::ProcessExecutor;
/// use schemalock_plugins::runner::PluginExecutor;
///
/// let mut input: &[u8] = b"{}\n";
/// let output = ProcessExecutor.execute(Path::new("/usr/bin/cat"), &mut input);
/// assert_eq!(output.expect("cat succeeds"), b"{}\n");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl PluginExecutor for ProcessExecutor {
    fn execute(
        &self,
        executable: &Path,
        input: &mut (dyn Read + Send),
    ) -> Result<Vec<u8>, ExecutionError> {
        let (mut output_reader, output_writer) =
            io::pipe().map_err(|err| ExecutionError::Spawn {
                source: Arc::new(err),
            })?;
        let error_writer = output_writer
            .try_clone()
            .map_err(|err| ExecutionError::Spawn {
                source: Arc::new(err),
            })?;

        debug!(
            target: PROCESS_TARGET,
            executable = %executable.display(),
            "spawning plugin process"
        );

        // The command owns the parent's copies of the pipe writers; it must be
        // dropped before reading or the pipe never reports end of file.
        let mut child = {
            let mut command = Command::new(executable);
            command
                .stdin(Stdio::piped())
                .stdout(output_writer)
                .stderr(error_writer);
            command.spawn().map_err(|err| ExecutionError::Spawn {
                source: Arc::new(err),
            })?
        };

        let stdin = child.stdin.take();
        let mut output = Vec::new();
        let read_result = thread::scope(|scope| {
            scope.spawn(move || write_input(executable, stdin, input));
            output_reader.read_to_end(&mut output)
        });

        let status = child.wait().map_err(|err| ExecutionError::Io {
            source: Arc::new(err),
            output: output.clone(),
        })?;

        if let Err(err) = read_result {
            return Err(ExecutionError::Io {
                source: Arc::new(err),
                output,
            });
        }

        debug!(
            target: PROCESS_TARGET,
            executable = %executable.display(),
            ?status,
            output_bytes = output.len(),
            "plugin process exited"
        );

        if status.success() {
            Ok(output)
        } else {
            Err(ExecutionError::NonZeroExit {
                code: status.code(),
                output,
            })
        }
    }
}

/// Copies the payload into the child's stdin and closes it.
///
/// A plugin may exit without reading its input; the resulting broken pipe is
/// not an error of the invocation.
fn write_input(
    executable: &Path,
    child_stdin: Option<std::process::ChildStdin>,
    input: &mut (dyn Read + Send),
) {
    let Some(mut stdin) = child_stdin else {
        return;
    };
    let copied = io::copy(input, &mut stdin).and_then(|bytes| stdin.flush().map(|()| bytes));
    match copied {
        Ok(bytes) => debug!(
            target: PROCESS_TARGET,
            executable = %executable.display(),
            bytes,
            "wrote payload to plugin stdin"
        ),
        Err(err) => debug!(
            target: PROCESS_TARGET,
            executable = %executable.display(),
            error = %err,
            "plugin stdin closed before payload was written"
        ),
    }
    // Stdin is dropped here, closing the pipe to signal no more input.
}
