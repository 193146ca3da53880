//! Precedence between defaults and command-line flags.

use std::ffi::OsString;

use ortho_config::OrthoConfig;
use rstest::rstest;

use schemalock_config::{Config, LogFormat, default_log_filter};

fn load(args: &[&str]) -> Config {
    let mut full: Vec<OsString> = vec![OsString::from("schemalock")];
    full.extend(args.iter().map(OsString::from));
    match Config::load_from_iter(full) {
        Ok(config) => config,
        Err(error) => panic!("configuration should load: {error}"),
    }
}

#[test]
fn defaults_apply_without_flags() {
    let config = load(&[]);
    assert_eq!(config.log_filter(), default_log_filter());
    assert_eq!(config.log_format(), LogFormat::Compact);
    assert_eq!(config.plugin_list(), None);
}

#[test]
fn bare_program_name_loads_the_default_config() {
    assert_eq!(load(&[]), Config::default());
}

#[rstest]
#[case::plugins(&["--plugins", "lint,style"], Some("lint,style"))]
#[case::no_plugins(&["--log-filter", "debug"], None)]
fn cli_flags_set_plugins(#[case] args: &[&str], #[case] expected: Option<&str>) {
    assert_eq!(load(args).plugin_list(), expected);
}

#[test]
fn cli_flags_override_logging_defaults() {
    let config = load(&["--log-filter", "schemalock_plugins=debug", "--log-format", "json"]);
    assert_eq!(config.log_filter(), "schemalock_plugins=debug");
    assert_eq!(config.log_format(), LogFormat::Json);
}
