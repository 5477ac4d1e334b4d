//! Unit tests for configuration loading and graceful degradation
//!
//! Tests cover:
//! - Missing TOML files SHALL NOT cause termination
//! - Malformed TOML files are reported as configuration errors
//! - Section parsing for both services

use rxscan_common::config::{load_toml_config, TomlConfig};
use rxscan_common::Error;
use std::io::Write;

#[test]
fn test_missing_explicit_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist.toml");

    let config = TomlConfig::load(Some(&missing)).expect("missing file must not fail");
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_full_config_parses() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[api]
host = "127.0.0.1"
port = 5050

[ocr]
region = "eu-west-1"
access_key_id = "AKIA_TEST"
secret_access_key = "secret"

[ner]
general_url = "http://localhost:8081/ner"
medical_url = "http://localhost:8082/biomedical"
timeout_secs = 60

[ui]
port = 3030
backend_url = "http://localhost:5050"

[smtp]
server = "smtp.example.com"
port = 2525
sender_email = "alerts@example.com"

[logging]
level = "debug"
"#
    )
    .unwrap();

    let config = TomlConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.api.port, Some(5050));
    assert_eq!(config.api.host.as_deref(), Some("127.0.0.1"));
    assert_eq!(config.ocr.region.as_deref(), Some("eu-west-1"));
    assert_eq!(config.ner.timeout_secs, Some(60));
    assert_eq!(
        config.ner.medical_url.as_deref(),
        Some("http://localhost:8082/biomedical")
    );
    assert_eq!(config.ui.backend_url.as_deref(), Some("http://localhost:5050"));
    assert_eq!(config.smtp.port, Some(2525));
    assert!(config.smtp.sender_password.is_none());
    assert_eq!(config.logging.level.as_deref(), Some("debug"));
}

#[test]
fn test_partial_config_leaves_other_sections_default() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[ui]\nport = 4000").unwrap();

    let config = load_toml_config(file.path()).unwrap();
    assert_eq!(config.ui.port, Some(4000));
    assert_eq!(config.api, Default::default());
    assert_eq!(config.smtp, Default::default());
}

#[test]
fn test_malformed_config_is_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[api\nport = \"not closed").unwrap();

    match TomlConfig::load(Some(file.path())) {
        Err(Error::Config(msg)) => assert!(msg.contains("Invalid config file")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn test_wrong_type_is_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[api]\nport = \"five thousand\"").unwrap();

    assert!(matches!(load_toml_config(file.path()), Err(Error::Config(_))));
}
