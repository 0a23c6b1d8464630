//! Unit tests for configuration loading and graceful degradation
//!
//! - Missing TOML files do not stop startup (defaults are used)
//! - Malformed TOML files are reported as configuration errors
//! - Partial TOML files only override what they name

use licscan_common::config::{
    default_config_path, ensure_directory_exists, load_toml_config, CompiledDefaults,
    LoggingConfig, TomlConfig, DEFAULT_ANALYSIS_URL, DEFAULT_AUTH_URL, DEFAULT_UI_PORT,
};
use licscan_common::Error;
use std::path::PathBuf;

#[test]
fn test_compiled_defaults() {
    let defaults = CompiledDefaults::for_current_platform();

    assert!(!defaults.data_folder.as_os_str().is_empty());
    assert!(defaults.data_folder.to_string_lossy().contains("licscan"));
    assert_eq!(defaults.port, DEFAULT_UI_PORT);
    assert_eq!(defaults.auth_url, DEFAULT_AUTH_URL);
    assert_eq!(defaults.analysis_url, DEFAULT_ANALYSIS_URL);
    assert_eq!(defaults.log_level, "info");
}

#[test]
fn test_default_config_path_names_module() {
    if let Some(path) = default_config_path("licscan-ui") {
        assert!(path.ends_with(PathBuf::from("licscan").join("licscan-ui.toml")));
    }
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_toml_config(&dir.path().join("does-not-exist.toml")).unwrap();
    assert_eq!(config, TomlConfig::default());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_full_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("licscan-ui.toml");
    std::fs::write(
        &path,
        r#"
port = 6000
auth_url = "http://auth.internal:9000"
analysis_url = "http://analysis.internal:9001"
data_folder = "/var/lib/licscan"

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.port, Some(6000));
    assert_eq!(config.auth_url.as_deref(), Some("http://auth.internal:9000"));
    assert_eq!(
        config.analysis_url.as_deref(),
        Some("http://analysis.internal:9001")
    );
    assert_eq!(config.data_folder, Some(PathBuf::from("/var/lib/licscan")));
    assert_eq!(
        config.logging,
        LoggingConfig {
            level: "debug".to_string()
        }
    );
}

#[test]
fn test_partial_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("licscan-ui.toml");
    std::fs::write(&path, "auth_url = \"http://localhost:7000\"\n").unwrap();

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.auth_url.as_deref(), Some("http://localhost:7000"));
    assert_eq!(config.port, None);
    assert_eq!(config.analysis_url, None);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_malformed_config_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("licscan-ui.toml");
    std::fs::write(&path, "port = \"not a number\"\n").unwrap();

    let err = load_toml_config(&path).unwrap_err();
    assert!(matches!(err, Error::Config(_)), "got {:?}", err);
}

#[test]
fn test_ensure_directory_exists_creates_nested_folder() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");

    ensure_directory_exists(&nested).unwrap();
    assert!(nested.is_dir());

    // Second call is a no-op
    ensure_directory_exists(&nested).unwrap();
}
