// tests/config_loading.rs

mod common;

use std::io::Write;
use tempfile::NamedTempFile;

use firewatch::config::{ConfigFile, load_and_validate};
use firewatch::errors::FirewatchError;
use firewatch::exec::{ChangeAction, WatchTarget};
use firewatch::watch::{DEFAULT_EVENT_BUFFER_SIZE, DEFAULT_MAX_DIRECTORIES};
use firewatch_test_utils::builders::ConfigFileBuilder;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn loads_entries_with_defaults() {
    let file = write_config(
        r#"
[watch.shader]
path = "assets/basic.frag"
cmd = "glslc assets/basic.frag -o assets/basic.spv"

[watch.settings]
path = "settings.toml"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.config.max_directories, DEFAULT_MAX_DIRECTORIES);
    assert_eq!(cfg.config.event_buffer_size, DEFAULT_EVENT_BUFFER_SIZE);

    let targets = WatchTarget::from_config(&cfg);
    assert_eq!(targets.len(), 2);
    // BTreeMap order: "settings" < "shader".
    assert_eq!(targets[0].name, "settings");
    assert_eq!(targets[0].action, ChangeAction::Print);
    assert_eq!(targets[1].path, "assets/basic.frag");
    assert_eq!(
        targets[1].action,
        ChangeAction::Command("glslc assets/basic.frag -o assets/basic.spv".to_string())
    );
}

#[test]
fn config_section_feeds_watch_options() {
    let file = write_config(
        r#"
[config]
max_directories = 4
event_buffer_size = 4096

[watch.a]
path = "a.txt"
"#,
    );

    let options = load_and_validate(file.path()).unwrap().watch_options();
    assert_eq!(options.max_directories, 4);
    assert_eq!(options.event_buffer_size, 4096);
}

#[test]
fn empty_config_returns_config_error() {
    let file = write_config("[config]\nmax_directories = 8\n");

    match load_and_validate(file.path()) {
        Err(FirewatchError::ConfigError(msg)) => assert!(msg.contains("at least one")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn directory_path_returns_config_error() {
    let raw = ConfigFileBuilder::new()
        .with_watch("assets", "assets/", None)
        .build_raw();

    match ConfigFile::try_from(raw) {
        Err(FirewatchError::ConfigError(msg)) => {
            assert!(msg.contains("assets"));
            assert!(msg.contains("directory"));
        }
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn unusable_limits_are_rejected() {
    let zero_dirs = ConfigFileBuilder::new()
        .with_watch("a", "a.txt", None)
        .max_directories(0)
        .build_raw();
    assert!(matches!(
        ConfigFile::try_from(zero_dirs),
        Err(FirewatchError::ConfigError(_))
    ));

    let tiny_buffer = ConfigFileBuilder::new()
        .with_watch("a", "a.txt", None)
        .event_buffer_size(64)
        .build_raw();
    assert!(matches!(
        ConfigFile::try_from(tiny_buffer),
        Err(FirewatchError::ConfigError(_))
    ));
}

#[test]
fn blank_command_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_watch("a", "a.txt", Some("   "))
        .build_raw();
    assert!(matches!(ConfigFile::try_from(raw), Err(FirewatchError::ConfigError(_))));
}

#[test]
fn malformed_toml_returns_toml_error() {
    let file = write_config("[watch.a\npath = ");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(FirewatchError::TomlError(_))
    ));
}

#[test]
fn missing_file_returns_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_and_validate(dir.path().join("Firewatch.toml")),
        Err(FirewatchError::IoError(_))
    ));
}

#[test]
fn command_line_paths_become_print_targets() {
    let targets = WatchTarget::from_paths(&["a.txt".to_string(), "/etc/app.conf".to_string()]);
    assert_eq!(targets.len(), 2);
    assert!(targets.iter().all(|t| t.action == ChangeAction::Print));
    assert_eq!(targets[1].name, "/etc/app.conf");
}
