//! Masqued daemon configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MasquedConfig {
    /// Delivery pacing
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Simulated channel roster
    #[serde(default)]
    pub channels: ChannelConfig,

    /// Completion oracle
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Emoji tag table file
    #[serde(default)]
    pub emoji_file: Option<PathBuf>,
}

/// Delivery pacing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Delay before a response starts, in milliseconds
    #[serde(default)]
    pub delay_ms: u64,

    /// Simulated typing time per message, in milliseconds
    #[serde(default = "default_typing_time")]
    pub typing_time_ms: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            typing_time_ms: default_typing_time(),
        }
    }
}

fn default_typing_time() -> u64 {
    2000
}

/// Channels the daemon presents to the persona
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Channels reported as active on every minute tick
    #[serde(default = "default_active")]
    pub active: Vec<String>,

    /// Default channel for frontend input without a `#channel` prefix
    #[serde(default = "default_channel")]
    pub default: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            active: default_active(),
            default: default_channel(),
        }
    }
}

fn default_active() -> Vec<String> {
    vec![default_channel()]
}

fn default_channel() -> String {
    "general".to_string()
}

/// Completion oracle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Ask the oracle when rules produce nothing for a mention
    #[serde(default)]
    pub enabled: bool,

    /// Chat-completion endpoint
    #[serde(default = "default_oracle_url")]
    pub url: String,

    /// Model name sent in the request
    #[serde(default = "default_oracle_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: default_oracle_url(),
            model: default_oracle_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_oracle_url() -> String {
    "https://api.mistral.ai/v1/chat/completions".to_string()
}

fn default_oracle_model() -> String {
    "mistral-large-latest".to_string()
}

fn default_api_key_env() -> String {
    "MASQUE_ORACLE_KEY".to_string()
}

impl MasquedConfig {
    /// Load daemon configuration, falling back to defaults when the
    /// file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}
