use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;

use crate::ui::editor;

use super::loader::{Config, ConfigureArgs};

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.ansi, None);
    assert_eq!(config.spinner_interval_ms, 500);
    assert_eq!(config.spinner_interval(), Duration::from_millis(500));
    assert_eq!(config.completion_append, Some(' '));
    assert!(!config.debug);
}

#[test]
fn test_config_serialization_round_trip() {
    let config = Config {
        ansi: Some(true),
        completion_append: None,
        debug: true,
        ..Config::default()
    };

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"ansi\":true"));
    assert!(json.contains("\"completion_append\":null"));

    let deserialized: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, config);
}

#[test]
fn test_config_load_existing_valid() {
    let json = r#"{
        "ansi": false,
        "spinner_interval_ms": 250,
        "completion_append": "/",
        "debug": true
    }"#;

    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(json.as_bytes()).unwrap();

    let config = Config::load_existing(temp_file.path()).unwrap();

    assert_eq!(config.ansi, Some(false));
    assert_eq!(config.spinner_interval_ms, 250);
    assert_eq!(config.completion_append, Some('/'));
    assert!(config.debug);
}

#[test]
fn test_config_load_existing_fills_missing_fields() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"{}").unwrap();

    let config = Config::load_existing(temp_file.path()).unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_load_existing_invalid_json() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"{ not json").unwrap();

    let result = Config::load_existing(temp_file.path());
    assert!(result.is_err());
}

#[test]
fn test_config_load_existing_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load_existing(&dir.path().join("missing.json"));
    assert!(result.is_err());
}

#[test]
fn test_config_save_to_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = Config {
        spinner_interval_ms: 42,
        ..Config::default()
    };

    config.save_to(&path).unwrap();
    let loaded = Config::load_existing(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_config_update_only_touches_given_fields() {
    let mut config = Config {
        ansi: Some(true),
        ..Config::default()
    };

    let args = ConfigureArgs {
        spinner_interval_ms: Some(75),
        completion_append: Some(String::new()),
        ..ConfigureArgs::default()
    };
    config.update(&args);

    assert_eq!(config.ansi, Some(true));
    assert_eq!(config.spinner_interval_ms, 75);
    assert_eq!(config.completion_append, None);
    assert!(!config.debug);
}

#[test]
fn test_config_update_ansi_auto_clears_override() {
    let mut config = Config {
        ansi: Some(false),
        ..Config::default()
    };

    let args = ConfigureArgs {
        ansi_auto: true,
        ..ConfigureArgs::default()
    };
    config.update(&args);

    assert_eq!(config.ansi, None);
}

#[test]
fn test_config_apply_sets_append_character() {
    let _lock = editor::test_lock();
    let before = editor::append_character();

    let config = Config {
        completion_append: Some('/'),
        ..Config::default()
    };
    config.apply();
    assert_eq!(editor::append_character(), Some('/'));

    editor::set_append_character(before);
}
