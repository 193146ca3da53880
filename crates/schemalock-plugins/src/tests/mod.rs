//! Shared test doubles and crate-level behaviour tests.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use schemalock_report::{Protopath, Report, SchemaSnapshot, Warning};

use crate::error::{ExecutionError, ResolveError};
use crate::protocol::ExchangePayload;
use crate::resolver::PluginResolver;
use crate::runner::PluginExecutor;


/// Resolves every known plugin name to `/plugins/<name>`.
#[derive(Debug, Default)]
pub(crate) struct StaticResolver {
    known: Vec<String>,
}

impl StaticResolver {
    pub(crate) fn knowing<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl PluginResolver for StaticResolver {
    fn resolve(&self, name: &str) -> Result<PathBuf, ResolveError> {
        if self.known.iter().any(|known| known == name) {
            Ok(plugin_path(name))
        } else {
            Err(ResolveError::NotFound {
                name: name.to_owned(),
            })
        }
    }
}

pub(crate) fn plugin_path(name: &str) -> PathBuf {
    PathBuf::from(format!("/plugins/{name}"))
}

/// Canned behaviour for one scripted plugin.
#[derive(Debug, Clone)]
pub(crate) enum Script {
    /// Exit cleanly and print the given response.
    Respond(ExchangePayload),
    /// Exit cleanly and print arbitrary text.
    Print(String),
    /// Exit with a non-zero status after printing the text.
    Exit { code: i32, output: String },
    /// Panic inside the executor.
    Panic,
}

/// Executor that plays back a [`Script`] per executable and records inputs.
#[derive(Debug, Default)]
pub(crate) struct ScriptedExecutor {
    scripts: HashMap<PathBuf, Script>,
    inputs: Mutex<Vec<(PathBuf, Vec<u8>)>>,
}

impl ScriptedExecutor {
    pub(crate) fn with_script(mut self, name: &str, script: Script) -> Self {
        self.scripts.insert(plugin_path(name), script);
        self
    }

    pub(crate) fn inputs(&self) -> Vec<(PathBuf, Vec<u8>)> {
        self.inputs.lock().map(|inputs| inputs.clone()).unwrap_or_default()
    }
}

impl PluginExecutor for ScriptedExecutor {
    fn execute(
        &self,
        executable: &Path,
        input: &mut (dyn Read + Send),
    ) -> Result<Vec<u8>, ExecutionError> {
        let mut received = Vec::new();
        input.read_to_end(&mut received).expect("read payload");
        self.inputs
            .lock()
            .expect("inputs lock")
            .push((executable.to_path_buf(), received));

        match self.scripts.get(executable) {
            Some(Script::Respond(response)) => {
                Ok(serde_json::to_vec(response).expect("serialise response"))
            }
            Some(Script::Print(text)) => Ok(text.clone().into_bytes()),
            Some(Script::Exit { code, output }) => Err(ExecutionError::NonZeroExit {
                code: Some(*code),
                output: output.clone().into_bytes(),
            }),
            Some(Script::Panic) => panic!("scripted executor panic"),
            None => Ok(b"{}".to_vec()),
        }
    }
}

pub(crate) fn warning(message: &str) -> Warning {
    Warning::new(Protopath::new("proto:#:user.proto"), message)
}

pub(crate) fn warnings_response(messages: &[&str]) -> Script {
    Script::Respond(
        ExchangePayload::default()
            .with_plugin_warnings(messages.iter().map(|message| warning(message)).collect()),
    )
}

pub(crate) fn error_response(message: &str) -> Script {
    Script::Respond(ExchangePayload::default().with_error_message(message))
}

pub(crate) fn report_with(messages: &[&str]) -> Report {
    Report::new(
        SchemaSnapshot::default(),
        SchemaSnapshot::default(),
        messages.iter().map(|message| warning(message)).collect(),
    )
}

pub(crate) fn messages(report: &Report) -> Vec<String> {
    let mut messages: Vec<String> = report
        .warnings()
        .iter()
        .map(|warning| warning.message().to_owned())
        .collect();
    messages.sort();
    messages
}
