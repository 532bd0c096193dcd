//! # Configuration
//!
//! Settings are read from a TOML file (default `config.toml`) with three
//! sections:
//!
//! - [`ResizerConfig`] - capacity bounds that decide which magazines are downsized
//! - [`DatabaseConfig`] - where the item table is read from and written to
//! - [`LoggingConfig`] - log level and optional log file
//!
//! Every section has defaults, so an empty file is a valid configuration.
//!
//! ```toml
//! [resizer]
//! min_magazine_capacity_to_be_included = 20
//! max_magazine_capacity_to_be_included = 40
//!
//! [database]
//! items_path = "database/templates/items.json"
//!
//! [logging]
//! level = "info"
//! file = "twoslotmags.log"
//! ```
//!
//! The resizer keys may also be written in the camelCase form used by the
//! mod's standalone `config.json` (`minMagazineCapacityToBeIncluded`), which
//! [`ResizerConfig::load_json`] reads directly.

use crate::items::DEFAULT_MAX_FILE_BYTES;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resizer: ResizerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Inclusive capacity bounds for magazines that get downsized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizerConfig {
    #[serde(
        default = "default_min_capacity",
        alias = "minMagazineCapacityToBeIncluded"
    )]
    pub min_magazine_capacity_to_be_included: i64,
    #[serde(
        default = "default_max_capacity",
        alias = "maxMagazineCapacityToBeIncluded"
    )]
    pub max_magazine_capacity_to_be_included: i64,
}

fn default_min_capacity() -> i64 {
    20
}

fn default_max_capacity() -> i64 {
    40
}

impl Default for ResizerConfig {
    fn default() -> Self {
        Self {
            min_magazine_capacity_to_be_included: default_min_capacity(),
            max_magazine_capacity_to_be_included: default_max_capacity(),
        }
    }
}

impl ResizerConfig {
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            min_magazine_capacity_to_be_included: min,
            max_magazine_capacity_to_be_included: max,
        }
    }

    /// Load bounds from a standalone JSON file with camelCase keys.
    pub async fn load_json(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read resizer config {}: {}", path, e))?;

        serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse resizer config {}: {}", path, e))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Item template table to patch.
    #[serde(default = "default_items_path")]
    pub items_path: String,
    /// Where the patched table is written; the input file when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    /// Refuse item tables larger than this.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

fn default_items_path() -> String {
    "database/templates/items.json".to_string()
}

fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            items_path: default_items_path(),
            output_path: None,
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

impl DatabaseConfig {
    pub fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or(&self.items_path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file does not exist.
    ///
    /// The flag in the result is `true` when the defaults were used.
    pub async fn load_or_default(path: &str) -> Result<(Self, bool)> {
        if !Path::new(path).exists() {
            return Ok((Config::default(), true));
        }
        Ok((Config::load(path).await?, false))
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config {
            logging: LoggingConfig {
                file: Some("twoslotmags.log".to_string()),
                ..LoggingConfig::default()
            },
            ..Config::default()
        };
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}
