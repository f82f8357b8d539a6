//! Configuration loading, validation, and profile resolution for Switchboard.
//!
//! Two layers with different lifetimes. The **bootstrap file**
//! (`switchboard.toml`, this module) is read once at startup and tells the
//! process where to listen, where the settings store lives, and how the
//! active completion profile is chosen. The **settings document**
//! ([`model`]) comes from the store and is re-read on a timer while the
//! process runs, so profiles and flags change without a restart.

pub mod model;
pub mod resolver;

pub use model::{
    CompletionProfile, ConfigDocument, ConfigSnapshot, ConnectionInfo, FeatureFlag, FlagVariant,
    PromptMessage,
};
pub use resolver::ResolutionStrategy;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root bootstrap configuration.
///
/// Maps directly to `switchboard.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Settings-store location and refresh cadence
    #[serde(default)]
    pub store: StoreConfig,

    /// How the active completion profile is chosen
    #[serde(default)]
    pub resolution: ResolutionStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by CORS. The default covers a local Vite dev server.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8080
}
fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:5173".into()]
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Seconds between settings re-fetches
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Where the settings document lives
    #[serde(default)]
    pub source: SourceConfig,
}

fn default_poll_interval_secs() -> u64 {
    10
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            source: SourceConfig::default(),
        }
    }
}

/// Where the settings document is fetched from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    /// A local JSON file (dev and demo mode)
    File { path: PathBuf },

    /// An HTTP endpoint serving the JSON document
    Http { endpoint: String },
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::File {
            path: PathBuf::from("settings.json"),
        }
    }
}

impl AppConfig {
    /// Load configuration from `switchboard.toml` in the working directory,
    /// or from the path named by `SWITCHBOARD_CONFIG`.
    ///
    /// `SWITCHBOARD_STORE_ENDPOINT` overrides the settings source with an
    /// HTTP endpoint, so deployed environments stay out of the file.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("SWITCHBOARD_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("switchboard.toml"));
        let mut config = Self::load_from(&path)?;

        if let Ok(endpoint) = std::env::var("SWITCHBOARD_STORE_ENDPOINT") {
            config.store.source = SourceConfig::Http { endpoint };
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.store.poll_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "store.poll_interval_secs must be at least 1".into(),
            ));
        }

        if self.gateway.allowed_origins.is_empty() {
            return Err(ConfigError::ValidationError(
                "gateway.allowed_origins must not be empty".into(),
            ));
        }

        if let SourceConfig::Http { endpoint } = &self.store.source {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ConfigError::ValidationError(format!(
                    "store endpoint must be an http(s) URL, got '{endpoint}'"
                )));
            }
        }

        Ok(())
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
