//! Configuration infrastructure
//!
//! Loading and persistence for the backend's settings. The config file
//! is plain JSON under the platform config directory; missing files
//! are replaced with defaults and written back so operators always
//! have a file to edit.

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tracing::info;

const CONFIG_DIR_NAME: &str = "auction-lister";
const CONFIG_FILE_NAME: &str = "settings.json";
const DATABASE_FILE_NAME: &str = "catalog.db";

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Explicit sqlite URL; when absent the platform data directory is
    /// used.
    pub url: Option<String>,

    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Hard cap on rows returned by one search request.
    pub max_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing filter directive, e.g. "info" or "auction_lister=debug"
    pub level: String,

    /// Also write log records to a file under the log directory
    pub file_output: bool,

    pub file_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            search: SearchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { max_results: 200 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_output: false,
            file_name: "auction-lister.log".to_string(),
        }
    }
}

impl AppConfig {
    /// Resolved database URL: the configured one, or a sqlite file in
    /// the platform data directory.
    pub fn database_url(&self) -> Result<String> {
        if let Some(url) = &self.database.url {
            return Ok(url.clone());
        }
        let data_dir = dirs::data_local_dir()
            .context("could not determine local data directory")?
            .join(CONFIG_DIR_NAME)
            .join("data");
        Ok(format!(
            "sqlite:{}",
            data_dir.join(DATABASE_FILE_NAME).display()
        ))
    }
}

/// Loads and saves the JSON config file.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .context("could not determine config directory")?
            .join(CONFIG_DIR_NAME);
        Ok(Self {
            config_path: config_dir.join(CONFIG_FILE_NAME),
        })
    }

    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub async fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            let config = AppConfig::default();
            self.save_config(&config).await?;
            info!(path = %self.config_path.display(), "config file created with defaults");
            return Ok(config);
        }

        let raw = fs::read_to_string(&self.config_path)
            .await
            .with_context(|| format!("failed to read {}", self.config_path.display()))?;
        let config: AppConfig = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", self.config_path.display()))?;
        Ok(config)
    }

    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let raw = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, raw)
            .await
            .with_context(|| format!("failed to write {}", self.config_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn missing_config_file_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("settings.json"));

        let config = manager.load_config().await.unwrap();
        assert_eq!(config.search.max_results, 200);
        assert!(dir.path().join("settings.json").exists());
    }

    #[tokio::test]
    async fn config_round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("settings.json"));

        let mut config = AppConfig::default();
        config.search.max_results = 50;
        config.database.url = Some("sqlite::memory:".to_string());
        manager.save_config(&config).await.unwrap();

        let loaded = manager.load_config().await.unwrap();
        assert_eq!(loaded.search.max_results, 50);
        assert_eq!(loaded.database_url().unwrap(), "sqlite::memory:");
    }
}
