//! Integration tests running real plugin scripts through the system runner.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use rstest::{fixture, rstest};
use tempfile::TempDir;

use schemalock_plugins::process::ProcessExecutor;
use schemalock_plugins::{
    ExecutionError, FailureCause, PathResolver, PluginResolver, PluginRunError, PluginRunner,
    ResolveError,
};
use schemalock_report::{Protopath, Report, SchemaSnapshot, Warning};

struct PluginDir {
    dir: TempDir,
}

impl PluginDir {
    fn install(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write plugin script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod plugin");
        path
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn runner(&self) -> PluginRunner<PathResolver, ProcessExecutor> {
        PluginRunner::new(PathResolver::with_search_path(self.path()), ProcessExecutor)
    }
}

#[fixture]
fn plugins() -> PluginDir {
    PluginDir {
        dir: TempDir::new().expect("temp dir"),
    }
}

fn report() -> Report {
    Report::new(
        SchemaSnapshot::default(),
        SchemaSnapshot::default(),
        vec![Warning::new(Protopath::new("proto:#:a.proto"), "w1")],
    )
}

#[rstest]
fn script_warnings_are_merged(plugins: PluginDir) {
    plugins.install(
        "adds-warning",
        r#"cat > /dev/null
printf '%s\n' '{"plugin_warnings":[{"filepath":"b.proto","message":"from-script"}]}'"#,
    );
    let merged = plugins
        .runner()
        .run("adds-warning", report())
        .expect("run succeeds");
    let messages: Vec<&str> = merged.warnings().iter().map(Warning::message).collect();
    assert_eq!(messages, ["w1", "from-script"]);
}

#[rstest]
fn non_zero_exit_captures_interleaved_output(plugins: PluginDir) {
    let path = plugins.install("fails", "cat > /dev/null\necho out\necho err >&2\nexit 3");
    let err = plugins
        .runner()
        .run("fails", report())
        .expect_err("run fails");
    let PluginRunError::Plugins(aggregated) = err else {
        panic!("expected aggregated error, got {err}");
    };
    let failure = aggregated.failures().first().expect("one failure");
    assert_eq!(failure.name(), "fails");
    assert_eq!(failure.path(), path.as_path());
    assert_eq!(failure.output(), "out\nerr\n");
    assert!(matches!(
        failure.cause(),
        FailureCause::Process(ExecutionError::NonZeroExit { code: Some(3), .. })
    ));
}

#[rstest]
fn every_script_reads_the_same_payload(plugins: PluginDir) {
    let capture = |target: &str| format!("cat > '{target}'\necho '{{}}'");
    let first = plugins.path().join("first.in");
    let second = plugins.path().join("second.in");
    plugins.install("first", &capture(&first.to_string_lossy()));
    plugins.install("second", &capture(&second.to_string_lossy()));

    plugins
        .runner()
        .run("first,second", report())
        .expect("run succeeds");

    let first_input = fs::read(first).expect("first input");
    let second_input = fs::read(second).expect("second input");
    assert!(!first_input.is_empty());
    assert_eq!(first_input, second_input);
    let payload: serde_json::Value = serde_json::from_slice(&first_input).expect("json payload");
    assert!(payload.get("protolock_warnings").is_some());
}

#[rstest]
fn plugin_that_ignores_stdin_still_succeeds(plugins: PluginDir) {
    plugins.install("ignores-input", "echo '{}'");
    let unchanged = plugins
        .runner()
        .run("ignores-input", report())
        .expect("run succeeds");
    assert_eq!(unchanged, report());
}

#[rstest]
fn reported_error_includes_display_safe_output(plugins: PluginDir) {
    plugins.install(
        "strict",
        r#"cat > /dev/null
printf '%s\n' '{"plugin_error_message":"breaking change in proto:#:a.proto"}'"#,
    );
    let err = plugins
        .runner()
        .run("strict", report())
        .expect_err("run fails");
    let message = err.to_string();
    assert!(message.contains("strict ("), "{message}");
    assert!(message.contains("breaking change in proto:#:a.proto"), "{message}");
    assert!(message.contains("proto/a.proto"), "{message}");
}

#[rstest]
fn missing_and_garbled_plugins_are_skipped(plugins: PluginDir) {
    plugins.install("garbled", "cat > /dev/null\necho 'definitely not json'");
    let unchanged = plugins
        .runner()
        .run("garbled, not-installed", report())
        .expect("run succeeds");
    assert_eq!(unchanged, report());
}

/// Resolves every name inside a directory whether or not the file exists.
struct Unchecked<'a>(&'a Path);

impl PluginResolver for Unchecked<'_> {
    fn resolve(&self, name: &str) -> Result<PathBuf, ResolveError> {
        Ok(self.0.join(name))
    }
}

#[rstest]
fn launch_failure_is_recorded_as_spawn_error(plugins: PluginDir) {
    plugins.install("healthy", "cat > /dev/null\necho '{}'");
    let vanished = plugins.path().join("vanished");
    let runner = PluginRunner::new(Unchecked(plugins.path()), ProcessExecutor);

    let err = runner
        .run("healthy, vanished", report())
        .expect_err("run fails");
    let PluginRunError::Plugins(aggregated) = err else {
        panic!("expected aggregated error, got {err}");
    };
    let [failure] = aggregated.failures() else {
        panic!("expected exactly one failure: {aggregated}");
    };
    assert_eq!(failure.name(), "vanished");
    assert_eq!(failure.path(), vanished.as_path());
    assert!(failure.output().is_empty());
    assert!(
        matches!(
            failure.cause(),
            FailureCause::Process(ExecutionError::Spawn { .. })
        ),
        "unexpected cause: {:?}",
        failure.cause()
    );
}
