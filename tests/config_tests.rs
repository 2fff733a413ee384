// Configuration loading tests
// Author: kelexine (https://github.com/kelexine)

use std::fs;
use tempfile::TempDir;
use vision_chat::config::{AppConfig, ConfigOverrides, DEFAULT_API_VERSION};
use vision_chat::error::VisionChatError;

const SAMPLE_CONFIG: &str = r#"
project_connection = "https://file.services.ai.azure.com/api/projects/from-file"
model_deployment = "gpt-4o-mini"

[fetch]
timeout_seconds = 5

[inference]
max_tokens = 800

[logging]
level = "debug"
format = "json"
"#;

#[test]
fn test_file_values_fill_in_over_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, SAMPLE_CONFIG).unwrap();

    let config = AppConfig::load(Some(path.as_path()), ConfigOverrides::default()).unwrap();

    assert_eq!(config.model_deployment, "gpt-4o-mini");
    assert_eq!(config.fetch.timeout_seconds, 5);
    assert_eq!(config.fetch.user_agent, "Mozilla/5.0");
    assert_eq!(config.inference.max_tokens, Some(800));
    assert_eq!(config.inference.api_version, DEFAULT_API_VERSION);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
}

#[test]
fn test_overrides_take_precedence() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, SAMPLE_CONFIG).unwrap();

    let overrides = ConfigOverrides {
        project_connection: Some("https://flag.services.ai.azure.com/api/projects/p".to_string()),
        model_deployment: None,
    };
    let config = AppConfig::load(Some(path.as_path()), overrides).unwrap();

    assert_eq!(
        config.project_connection,
        "https://flag.services.ai.azure.com/api/projects/p"
    );
    // Unset override leaves the file value in place
    assert_eq!(config.model_deployment, "gpt-4o-mini");
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.toml");

    let result = AppConfig::load(Some(path.as_path()), ConfigOverrides::default());
    assert!(result.is_err());
}

#[test]
fn test_write_default_config_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    AppConfig::default().write_to(&path).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("[fetch]"));
    assert!(written.contains("Mozilla/5.0"));

    let loaded = AppConfig::load(Some(path.as_path()), ConfigOverrides::default()).unwrap();
    assert_eq!(loaded.fetch.max_image_bytes, AppConfig::default().fetch.max_image_bytes);
    assert_eq!(loaded.inference.system_prompt, AppConfig::default().inference.system_prompt);
}

#[test]
fn test_write_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "model_deployment = \"keep-me\"\n").unwrap();

    let err = AppConfig::default().write_to(&path).unwrap_err();
    assert!(matches!(err, VisionChatError::Config(_)));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "model_deployment = \"keep-me\"\n"
    );
}
