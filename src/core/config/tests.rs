use super::data::{CliOverrides, Config, Settings};
use super::io::ConfigError;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn load_reads_all_file_keys() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
api_key = "file-key"
host = "proxy.example.com"
model = "text-bison-002"
theme = "light"
markdown = false
"#,
    )
    .unwrap();

    let config = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(config.api_key.as_deref(), Some("file-key"));
    assert_eq!(config.host.as_deref(), Some("proxy.example.com"));
    assert_eq!(config.model.as_deref(), Some("text-bison-002"));
    assert_eq!(config.theme.as_deref(), Some("light"));
    assert_eq!(config.markdown, Some(false));
}

#[test]
fn invalid_toml_reports_parse_error_with_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "api_key = [").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("Failed to parse config at "));
}

#[test]
fn defaults_fill_everything_but_the_key() {
    let settings = Config::default()
        .resolve_with(env_from(&[("CODEGPT_API_KEY", "k")]), &CliOverrides::default())
        .expect("resolves");

    assert_eq!(
        settings,
        Settings {
            api_key: "k".into(),
            host: "generativelanguage.googleapis.com".into(),
            model: "text-bison-001".into(),
            theme: "dark".into(),
            markdown: true,
        }
    );
}

#[test]
fn missing_key_is_an_error() {
    let err = Config::default()
        .resolve_with(env_from(&[("CODEGPT_API_KEY", "   ")]), &CliOverrides::default())
        .unwrap_err();
    assert!(matches!(err, ConfigError::MissingApiKey));
    assert!(err.to_string().contains("CODEGPT_API_KEY"));
}

#[test]
fn precedence_is_cli_then_env_then_file() {
    let config = Config {
        api_key: Some("file-key".into()),
        host: Some("file.example.com".into()),
        model: Some("file-model".into()),
        ..Default::default()
    };

    let env = env_from(&[
        ("CODEGPT_API_KEY", "env-key"),
        ("CODEGPT_HOST", "env.example.com"),
        ("CODEGPT_MODEL", "env-model"),
    ]);
    let overrides = CliOverrides {
        host: None,
        model: Some("cli-model".into()),
    };

    let settings = config.resolve_with(env, &overrides).expect("resolves");
    assert_eq!(settings.api_key, "env-key");
    assert_eq!(settings.host, "env.example.com");
    assert_eq!(settings.model, "cli-model");

    let file_only = config
        .resolve_with(env_from(&[]), &CliOverrides::default())
        .expect("resolves");
    assert_eq!(file_only.api_key, "file-key");
    assert_eq!(file_only.host, "file.example.com");
    assert_eq!(file_only.model, "file-model");
}

#[test]
fn redacted_key_keeps_last_four() {
    let settings = Config::default()
        .resolve_with(
            env_from(&[("CODEGPT_API_KEY", "AIzaSyExample1234")]),
            &CliOverrides::default(),
        )
        .unwrap();
    assert_eq!(settings.redacted_api_key(), "*************1234");

    let short = Settings {
        api_key: "abc".into(),
        ..settings
    };
    assert_eq!(short.redacted_api_key(), "***");
}
