//! # Configuration Management Module
//!
//! Puppyhouse reads a single TOML file (`config.toml` by default) holding the
//! kennel identity, storage location, engine tuning and logging settings.
//!
//! ## Configuration Structure
//!
//! - [`KennelConfig`] - Kennel name and the defaults used when puppies are created
//! - [`StorageConfig`] - Where the sled database lives
//! - [`EngineConfig`] - Decay intervals, day length and log caps
//! - [`LoggingConfig`] - Log level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use puppyhouse::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Config::create_default("config.toml").await?;
//!     let config = Config::load("config.toml").await?;
//!     println!("Kennel: {}", config.kennel.name);
//!     println!("Energy tick: {} ms", config.engine.energy_tick_ms);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [kennel]
//! name = "Puppy House"
//! default_breed = "labrador"
//!
//! [storage]
//! data_dir = "./data"
//!
//! [engine]
//! energy_tick_ms = 120000
//! happiness_tick_ms = 240000
//!
//! [logging]
//! level = "info"
//! ```
//!
//! The `[kennel]` and `[engine]` sections may be omitted entirely; any missing
//! engine field falls back to its default.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

use crate::kennel::breeds::DEFAULT_BREED_ID;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub kennel: KennelConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KennelConfig {
    pub name: String,
    /// Breed used when `create` is called without one
    #[serde(default = "default_breed")]
    pub default_breed: String,
    /// Name given to a puppy auto-created on first view
    #[serde(default = "default_puppy_name")]
    pub default_puppy_name: String,
    /// Name given to puppies synthesized for an empty pool
    #[serde(default = "default_pool_puppy_name")]
    pub pool_puppy_name: String,
}

fn default_breed() -> String {
    DEFAULT_BREED_ID.to_string()
}

fn default_puppy_name() -> String {
    "My Puppy".to_string()
}

fn default_pool_puppy_name() -> String {
    "Lonely Puppy".to_string()
}

impl Default for KennelConfig {
    fn default() -> Self {
        Self {
            name: "Puppy House".to_string(),
            default_breed: default_breed(),
            default_puppy_name: default_puppy_name(),
            pool_puppy_name: default_pool_puppy_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    /// Explicit sled directory; defaults to `<data_dir>/kennel`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<String>,
}

impl StorageConfig {
    pub fn kennel_db_path(&self) -> PathBuf {
        match &self.db_path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.data_dir).join("kennel"),
        }
    }
}

/// Timing and capacity rules for the puppy engine. All durations are milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// One point of energy decay per tick (before breed reduction)
    pub energy_tick_ms: u64,
    pub happiness_tick_ms: u64,
    /// Length of one cosmetic day for age display
    pub ms_per_day: u64,
    pub message_log_cap: usize,
    pub activity_log_cap: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            energy_tick_ms: 2 * 60 * 1000,
            happiness_tick_ms: 4 * 60 * 1000,
            ms_per_day: 5 * 60 * 1000,
            message_log_cap: 20,
            activity_log_cap: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
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

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            kennel: KennelConfig::default(),
            storage: StorageConfig {
                data_dir: "./data".to_string(),
                db_path: None,
            },
            engine: EngineConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("puppyhouse.log".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_defaults() {
        let engine = EngineConfig::default();
        assert_eq!(engine.energy_tick_ms, 120_000);
        assert_eq!(engine.happiness_tick_ms, 240_000);
        assert_eq!(engine.ms_per_day, 300_000);
        assert_eq!(engine.message_log_cap, 20);
        assert_eq!(engine.activity_log_cap, 50);
    }

    #[test]
    fn test_minimal_config_fills_defaults() {
        let toml_src = r#"
            [storage]
            data_dir = "/tmp/pups"

            [logging]
            level = "debug"

            [engine]
            energy_tick_ms = 1000
        "#;
        let config: Config = toml::from_str(toml_src).unwrap();
        assert_eq!(config.engine.energy_tick_ms, 1000);
        assert_eq!(config.engine.happiness_tick_ms, 240_000);
        assert_eq!(config.kennel.default_breed, "labrador");
        assert_eq!(config.kennel.pool_puppy_name, "Lonely Puppy");
        assert_eq!(
            config.storage.kennel_db_path(),
            PathBuf::from("/tmp/pups").join("kennel")
        );
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_explicit_db_path_wins() {
        let storage = StorageConfig {
            data_dir: "./data".into(),
            db_path: Some("/var/lib/pups".into()),
        };
        assert_eq!(storage.kennel_db_path(), PathBuf::from("/var/lib/pups"));
    }

    #[test]
    fn test_default_config_serializes_to_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(text.contains("[engine]"));
        assert!(text.contains("energy_tick_ms = 120000"));
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.engine, EngineConfig::default());
        assert_eq!(back.kennel.name, "Puppy House");
    }
}
