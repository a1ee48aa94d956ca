//! Client configuration.
//!
//! Supports loading configuration from:
//! 1. Config file (TOML, JSON, or YAML) named by `AUCTIONS_CONFIG`
//! 2. Environment variables
//!
//! Environment variables take precedence over config file values.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Auctions client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Auctions service base URL (default: "http://localhost:8081")
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Connect timeout in seconds (default: 10)
    pub connect_timeout_secs: u64,
    /// Currency used when the caller does not name one (default: "EUR")
    pub default_currency: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            default_currency: "EUR".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from file and environment variables.
    /// Environment variables override file values.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(config_path) = std::env::var("AUCTIONS_CONFIG") {
            config = Self::from_file(&config_path)?;
            tracing::info!("Loaded configuration from: {}", config_path);
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load configuration from a file (supports TOML, JSON, YAML)
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::parse(&content, extension)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn parse(content: &str, extension: &str) -> anyhow::Result<Self> {
        let config: ClientConfig = match extension {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            "yaml" | "yml" => serde_yaml::from_str(content)?,
            _ => {
                // Try to detect format
                if content.trim().starts_with('{') {
                    serde_json::from_str(content)?
                } else if content.contains("---") || content.contains(": ") {
                    serde_yaml::from_str(content)?
                } else {
                    toml::from_str(content)?
                }
            }
        };

        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("AUCTIONS_BASE_URL") {
            self.base_url = val;
        }
        if let Some(val) = lookup("AUCTIONS_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.timeout_secs = secs;
            }
        }
        if let Some(val) = lookup("AUCTIONS_CONNECT_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.connect_timeout_secs = secs;
            }
        }
        if let Some(val) = lookup("AUCTIONS_DEFAULT_CURRENCY") {
            self.default_currency = val;
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
