use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::io::ConfigError;
use crate::core::constants::{
    API_KEY_ENV, DEFAULT_HOST, DEFAULT_MODEL, DEFAULT_THEME, HOST_ENV, MODEL_ENV,
};

/// Contents of `config.toml`. Every field is optional; unset values fall
/// through to the environment and then to built-in defaults.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Static API key sent as the `key` query parameter
    pub api_key: Option<String>,
    /// API host name, e.g. `generativelanguage.googleapis.com`
    pub host: Option<String>,
    /// Model identifier, e.g. `text-bison-001`
    pub model: Option<String>,
    /// UI theme name ("dark" or "light")
    pub theme: Option<String>,
    /// Render assistant turns as markdown
    pub markdown: Option<bool>,
}

/// Values supplied on the command line. These win over everything else.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub model: Option<String>,
}

/// Fully resolved, immutable runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub host: String,
    pub model: String,
    pub theme: String,
    pub markdown: bool,
}

impl Settings {
    /// API key with everything but the last four characters masked.
    pub fn redacted_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Resolve against the process environment.
    pub fn resolve(&self, overrides: &CliOverrides) -> Result<Settings, ConfigError> {
        self.resolve_with(|key| std::env::var(key).ok(), overrides)
    }

    /// Resolve using `env` for environment lookups.
    ///
    /// Precedence, highest first: CLI overrides, environment, file, defaults.
    pub fn resolve_with<F>(&self, env: F, overrides: &CliOverrides) -> Result<Settings, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = non_empty(env(API_KEY_ENV))
            .or_else(|| non_empty(self.api_key.clone()))
            .ok_or(ConfigError::MissingApiKey)?;

        let host = non_empty(overrides.host.clone())
            .or_else(|| non_empty(env(HOST_ENV)))
            .or_else(|| non_empty(self.host.clone()))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let model = non_empty(overrides.model.clone())
            .or_else(|| non_empty(env(MODEL_ENV)))
            .or_else(|| non_empty(self.model.clone()))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Settings {
            api_key,
            host,
            model,
            theme: non_empty(self.theme.clone()).unwrap_or_else(|| DEFAULT_THEME.to_string()),
            markdown: self.markdown.unwrap_or(true),
        })
    }
}
