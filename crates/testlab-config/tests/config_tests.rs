//! Configuration loading and precedence tests

use pretty_assertions::assert_eq;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use testlab_config::{
    ConfigError, ConfigLoader, ReporterKind, Settings, SettingsOverrides, CONFIG_FILE_NAME,
};

fn create_config_file(dir: &Path, content: &str) -> PathBuf {
    let config_path = dir.join(CONFIG_FILE_NAME);
    fs::write(&config_path, content).unwrap();
    config_path
}

// ============================================================================
// Precedence Tests
// ============================================================================

#[test]
#[serial]
fn test_file_overrides_defaults() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        r#"
timeout = 900
reporter = "json"
"#,
    );

    let config = ConfigLoader::new()
        .load_from_directory(temp_dir.path())
        .unwrap();

    let expected = Settings {
        timeout: 900,
        reporter: ReporterKind::Json,
        ..Settings::default()
    };
    assert_eq!(config.settings, expected);
}

#[test]
#[serial]
fn test_env_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        r#"
debug = false
reporter = "console"
"#,
    );

    env::set_var("TESTLAB_DEBUG", "1");
    env::set_var("TESTLAB_REPORTER", "JSON");
    let config = ConfigLoader::new().load_from_directory(temp_dir.path());
    env::remove_var("TESTLAB_DEBUG");
    env::remove_var("TESTLAB_REPORTER");

    let config = config.unwrap();
    assert!(config.settings.debug);
    assert_eq!(config.settings.reporter, ReporterKind::Json);
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "timeout = 900\n");

    env::set_var("TESTLAB_TIMEOUT", "800");
    let config = ConfigLoader::new().load_from_directory(temp_dir.path());
    env::remove_var("TESTLAB_TIMEOUT");

    let mut settings = config.unwrap().settings;
    settings
        .apply_overrides(SettingsOverrides {
            timeout: Some(700),
            test_directory: Some(PathBuf::from("other")),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(settings.timeout, 700);
    assert_eq!(settings.test_directory, PathBuf::from("other"));
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_missing_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let result = ConfigLoader::new().load_from_file(&temp_dir.path().join(CONFIG_FILE_NAME));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_invalid_toml_reports_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "timeout = = 3");

    let err = ConfigLoader::new().load_from_file(&path).unwrap_err();
    match err {
        ConfigError::TomlParseError { file, .. } => assert_eq!(file, path),
        other => panic!("expected TomlParseError, got {:?}", other),
    }
}

#[test]
fn test_unknown_reporter_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "reporter = \"tap\"\n");

    assert!(ConfigLoader::new().load_from_file(&path).is_err());
}
