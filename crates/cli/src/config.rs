//! Configuration loading from suisage.toml and the environment.
//!
//! The config file is optional; the environment always wins. The only
//! hard requirement is `ANTHROPIC_API_KEY`, checked once at startup.

use market::Network;
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Model backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Market-data provider configuration.
    #[serde(default)]
    pub market: MarketConfig,
}

/// Backend provider configuration.
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Model to use.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// Market-data provider configuration.
#[derive(Debug, Deserialize, Default)]
pub struct MarketConfig {
    /// Default network for tool calls, MAINNET or TESTNET.
    #[serde(default)]
    pub network: String,
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.3
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// The API key, from the environment only. Absence is a startup-time
    /// failure, not a per-query one.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        std::env::var("ANTHROPIC_API_KEY").map_err(|_| ConfigError::MissingApiKey)
    }

    /// The model, with `SUISAGE_MODEL` taking precedence.
    pub fn model(&self) -> String {
        std::env::var("SUISAGE_MODEL").unwrap_or_else(|_| self.backend.model.clone())
    }

    /// The default network, with `SUISAGE_NETWORK` taking precedence.
    pub fn network(&self) -> Result<Network, ConfigError> {
        let raw = std::env::var("SUISAGE_NETWORK").unwrap_or_else(|_| self.market.network.clone());
        if raw.is_empty() {
            return Ok(Network::default());
        }
        raw.parse().map_err(ConfigError::InvalidNetwork)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("ANTHROPIC_API_KEY is not set")]
    MissingApiKey,

    #[error("{0}")]
    InvalidNetwork(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let config = Config::parse(
            r#"
            [backend]
            model = "claude-sonnet-4-20250514"
            max_tokens = 800
            temperature = 0.0

            [market]
            network = "TESTNET"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.max_tokens, 800);
        assert_eq!(config.market.network, "TESTNET");
    }

    #[test]
    fn parse_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.backend.model, default_model());
        assert_eq!(config.backend.max_tokens, 500);
        assert!(config.market.network.is_empty());
    }

    #[test]
    fn parse_rejects_bad_toml() {
        assert!(Config::parse("backend = ").is_err());
    }
}
