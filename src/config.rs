//! Configuration management for InterMAX
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from a YAML file, environment variables, and CLI
//! overrides, applied in that order.

use crate::error::{IntermaxError, Result};
use crate::models::DEFAULT_MODEL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for InterMAX
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Inference endpoint settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Login credential pairs
    #[serde(default)]
    pub auth: AuthConfig,

    /// Durable store location
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Inference endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// API credential; when absent the client falls back to the
    /// `INTERMAX_API_KEY` and `OPENAI_API_KEY` environment variables,
    /// and finally to the local simulator
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used when no preference is stored yet
    #[serde(default = "default_model_id")]
    pub default_model: String,

    /// HTTP client timeout (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model_id() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: None,
            default_model: default_model_id(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ProviderConfig {
    /// Resolve the API credential: config value first, then the
    /// `INTERMAX_API_KEY` and `OPENAI_API_KEY` environment variables
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = &self.api_key {
            if !key.trim().is_empty() {
                return Some(key.clone());
            }
        }
        for var in ["INTERMAX_API_KEY", "OPENAI_API_KEY"] {
            if let Ok(key) = std::env::var(var) {
                if !key.trim().is_empty() {
                    return Some(key);
                }
            }
        }
        None
    }
}

/// Credential pairs for the fixed login check
///
/// Defaults match the shipped single-operator setup; real deployments
/// override them in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password")]
    pub password: String,

    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

fn default_username() -> String {
    "Paul".to_string()
}

fn default_password() -> String {
    "intermaxuiweb2025".to_string()
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "intermax-admin-2025".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
        }
    }
}

/// Durable store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store directory; defaults to the platform application data dir
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Errors
    ///
    /// Returns error if an existing file cannot be read or parsed. A
    /// missing file is not an error; defaults are used instead.
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| IntermaxError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| IntermaxError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_base) = std::env::var("INTERMAX_API_BASE") {
            self.provider.api_base = api_base;
        }

        if let Ok(model) = std::env::var("INTERMAX_MODEL") {
            self.provider.default_model = model;
        }

        if let Ok(timeout) = std::env::var("INTERMAX_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.provider.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid INTERMAX_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(store_path) = std::env::var("INTERMAX_STORE") {
            self.storage.path = Some(PathBuf::from(store_path));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(store_path) = &cli.store {
            self.storage.path = Some(PathBuf::from(store_path));
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `IntermaxError::Config` when a setting is unusable.
    pub fn validate(&self) -> Result<()> {
        if self.provider.api_base.trim().is_empty() {
            return Err(IntermaxError::Config("provider.api_base must not be empty".into()).into());
        }
        if self.provider.timeout_seconds == 0 {
            return Err(
                IntermaxError::Config("provider.timeout_seconds must be positive".into()).into(),
            );
        }
        if self.provider.default_model.trim().is_empty() {
            return Err(
                IntermaxError::Config("provider.default_model must not be empty".into()).into(),
            );
        }
        Ok(())
    }

    /// Open the configured durable store
    pub fn open_store(&self) -> Result<crate::storage::KvStore> {
        match &self.storage.path {
            Some(path) => crate::storage::KvStore::open(path.clone()),
            None => crate::storage::KvStore::open_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use serial_test::serial;

    fn cli_with(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).expect("cli should parse")
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider.api_base, "https://api.openai.com/v1");
        assert_eq!(config.provider.default_model, "gpt-4o-mini");
        assert_eq!(config.auth.username, "Paul");
    }

    #[test]
    #[serial]
    fn test_load_missing_file_uses_defaults() {
        let cli = cli_with(&["intermax", "models", "list"]);
        let config = Config::load("/nonexistent/config.yaml", &cli).unwrap();
        assert_eq!(config.provider.default_model, "gpt-4o-mini");
    }

    #[test]
    #[serial]
    fn test_load_parses_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "provider:\n  api_base: http://localhost:9999/v1\n  default_model: gpt-4\nauth:\n  username: morgan\n",
        )
        .unwrap();

        let cli = cli_with(&["intermax", "models", "list"]);
        let config = Config::load(path.to_str().unwrap(), &cli).unwrap();
        assert_eq!(config.provider.api_base, "http://localhost:9999/v1");
        assert_eq!(config.provider.default_model, "gpt-4");
        assert_eq!(config.auth.username, "morgan");
        // Unspecified fields keep their defaults
        assert_eq!(config.auth.admin_username, "admin");
    }

    #[test]
    #[serial]
    fn test_env_vars_override_file_values() {
        std::env::set_var("INTERMAX_API_BASE", "http://envhost/v1");
        std::env::set_var("INTERMAX_MODEL", "gpt-3.5-turbo");

        let cli = cli_with(&["intermax", "models", "list"]);
        let config = Config::load("/nonexistent/config.yaml", &cli).unwrap();
        assert_eq!(config.provider.api_base, "http://envhost/v1");
        assert_eq!(config.provider.default_model, "gpt-3.5-turbo");

        std::env::remove_var("INTERMAX_API_BASE");
        std::env::remove_var("INTERMAX_MODEL");
    }

    #[test]
    #[serial]
    fn test_cli_store_override_wins() {
        let cli = cli_with(&["intermax", "--store", "/tmp/teststore", "models", "list"]);
        let config = Config::load("/nonexistent/config.yaml", &cli).unwrap();
        assert_eq!(config.storage.path, Some(PathBuf::from("/tmp/teststore")));
    }

    #[test]
    #[serial]
    fn test_resolve_api_key_prefers_config_value() {
        std::env::set_var("INTERMAX_API_KEY", "env-key");
        let provider = ProviderConfig {
            api_key: Some("config-key".to_string()),
            ..Default::default()
        };
        assert_eq!(provider.resolve_api_key().as_deref(), Some("config-key"));
        std::env::remove_var("INTERMAX_API_KEY");
    }

    #[test]
    #[serial]
    fn test_resolve_api_key_falls_back_to_env_then_none() {
        std::env::remove_var("INTERMAX_API_KEY");
        std::env::remove_var("OPENAI_API_KEY");

        let provider = ProviderConfig::default();
        assert!(provider.resolve_api_key().is_none());

        std::env::set_var("OPENAI_API_KEY", "sk-env");
        assert_eq!(provider.resolve_api_key().as_deref(), Some("sk-env"));
        std::env::remove_var("OPENAI_API_KEY");
    }

    #[test]
    fn test_validate_rejects_empty_api_base() {
        let mut config = Config::default();
        config.provider.api_base = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.provider.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }
}
