//! Service configuration
//!
//! Loaded from a JSON file. Every field has a serde default, so an empty
//! object is a valid config. `DATABASE_URL` in the environment overrides
//! the configured database URL.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_server::HttpServerConfig;

/// Environment variable overriding `database.url`
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL (default: "sqlite://person.db")
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Pool size (default: 5)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long to wait for a pooled connection (default: 3000ms)
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
}

fn default_database_url() -> String {
    "sqlite://person.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_ms() -> u64 {
    3000
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            acquire_timeout_ms: default_acquire_timeout_ms(),
        }
    }
}

/// Top-level configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    /// `tracing` filter directive; `RUST_LOG` wins when set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info,tower_http=debug".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            database: DatabaseConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file, apply environment overrides, validate
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&content)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(DATABASE_URL_ENV).filter(|url| !url.is_empty()) {
            self.database.url = url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.is_empty() {
            return Err(ConfigError::Invalid("database.url must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid("database.max_connections must be > 0".into()));
        }

        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid("server.request_timeout_ms must be > 0".into()));
        }

        Ok(())
    }

    /// Pretty JSON, as written by `init`
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, value: serde_json::Value) -> std::path::PathBuf {
        let path = dir.path().join("person-api.json");
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn test_config_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.database.url, "sqlite://person.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_load_nested_sections() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            json!({
                "server": {"port": 9100},
                "database": {"url": "sqlite::memory:", "max_connections": 1}
            }),
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.database.max_connections, 1);
    }

    #[test]
    fn test_rejects_zero_pool() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, json!({"database": {"max_connections": 0}}));

        assert!(matches!(Config::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::Read(_))));
    }

    #[test]
    fn test_database_url_override() {
        let mut config = Config::default();
        config.apply_overrides(|key| {
            (key == DATABASE_URL_ENV).then(|| "sqlite://override.db".to_string())
        });
        assert_eq!(config.database.url, "sqlite://override.db");

        config.apply_overrides(|_| Some(String::new()));
        assert_eq!(config.database.url, "sqlite://override.db");
    }

    #[test]
    fn test_json_round_trip() {
        let config = Config::default();
        let parsed: Config = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
