//! Configuration management for Nexus
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{NexusError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Nexus
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Generation provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Chat history storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Model to query
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL (overridable so tests can point at a mock server)
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// HTTP timeout for a single generation call (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_model() -> String {
    "gemini-1.5-flash-latest".to_string()
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// History storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// History file; `None` means the platform data directory
    #[serde(default)]
    pub history_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| NexusError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| NexusError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(model) = std::env::var("NEXUS_MODEL") {
            self.provider.model = model;
        }

        if let Ok(api_base) = std::env::var("NEXUS_API_BASE") {
            self.provider.api_base = api_base;
        }

        if let Ok(timeout) = std::env::var("NEXUS_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.provider.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid NEXUS_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(history_file) = std::env::var(crate::storage::HISTORY_FILE_ENV) {
            tracing::debug!(history_file = %history_file, "Env override: NEXUS_HISTORY_FILE");
            self.storage.history_file = Some(PathBuf::from(history_file));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(history_file) = &cli.history_file {
            tracing::info!("Using history file override from CLI: {}", history_file.display());
            self.storage.history_file = Some(history_file.clone());
        }
    }

    /// Resolve the API key from the environment
    ///
    /// # Errors
    ///
    /// Returns [`NexusError::Config`] when the variable named by
    /// `provider.api_key_env` is unset or blank
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.provider.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(NexusError::Config(format!(
                "API key not configured: set {}",
                self.provider.api_key_env
            ))
            .into()),
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.model.trim().is_empty() {
            return Err(NexusError::Config("provider.model cannot be empty".to_string()).into());
        }

        if self.provider.api_base.trim().is_empty() {
            return Err(
                NexusError::Config("provider.api_base cannot be empty".to_string()).into(),
            );
        }

        if self.provider.api_key_env.trim().is_empty() {
            return Err(
                NexusError::Config("provider.api_key_env cannot be empty".to_string()).into(),
            );
        }

        if self.provider.timeout_seconds == 0 {
            return Err(NexusError::Config(
                "provider.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
