//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::client::ClientConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Academic API connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Bearer token sent with every request
    #[serde(default)]
    pub token: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            token: None,
        }
    }
}

/// Output settings for the CLI
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_format")]
    pub default_format: String,
}

fn default_format() -> String {
    "table".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_format: default_format(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// The first existing file wins. A file that cannot be read or parsed is
    /// returned as an error rather than skipped.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_first(&default_paths())
    }

    fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                tracing::debug!("Loaded config from {:?}", path);
                Ok(config)
            }
            None => {
                tracing::debug!("Using default config with environment overrides");
                Ok(Self::from_env())
            }
        }
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // API overrides
        if let Some(url) = lookup("AULA_API_URL") {
            self.api.base_url = url;
        }
        if let Some(token) = lookup("AULA_API_TOKEN") {
            self.api.token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(timeout) = lookup("AULA_API_TIMEOUT") {
            if let Ok(secs) = timeout.trim().parse() {
                self.api.request_timeout_secs = secs;
            }
        }

        // Logging overrides
        if let Some(level) = lookup("AULA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("AULA_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Client settings derived from the `[api]` section
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api.base_url.clone(),
            request_timeout_ms: self.api.request_timeout_secs.saturating_mul(1000),
            token: self.api.token.clone(),
        }
    }
}

/// Config file locations, in search order
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("aula").join("config.toml"));
    }
    paths.push(PathBuf::from("./aula.toml"));
    paths
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Aula Configuration
#
# Environment variables override these settings:
# - AULA_API_URL
# - AULA_API_TOKEN
# - AULA_API_TIMEOUT
# - AULA_LOG_LEVEL
# - AULA_LOG_FORMAT

[api]
# Base URL of the academic API, including the /api prefix
base_url = "http://localhost:3000/api"

# Request timeout in seconds
request_timeout_secs = 15

# Bearer token, if the backend requires one
# token = ""

[display]
# Output format: table, json or csv
default_format = "table"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
