//! Configuration system for wikidex
//!
//! Supports loading configuration from:
//! 1. CLI --config argument
//! 2. ~/.config/wikidex/config.{WIKIDEX_ENV}.json
//! 3. Default values
//!
//! Where WIKIDEX_ENV can be: production (default), development, test
//!
//! # Examples
//!
//! ```
//! use wikidex::config::AppConfig;
//! use wikidex::cluster::LinkageMethod;
//!
//! let mut config = AppConfig::default();
//! config.linkage = LinkageMethod::Average;
//! config.index_level = 0;
//! config.validate().unwrap();
//! ```
//!
//! ## Environment Variables
//!
//! Environment variables override config file values:
//! - WIKIDEX_FEATURES_PATH
//! - WIKIDEX_INDEX_LEVEL
//! - WIKIDEX_LINKAGE

use crate::cluster::{ClusterOptions, LinkageMethod};
use crate::index::RenderOptions;
use crate::vectorizer::DEFAULT_FEATURES_FILE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the feature snapshot is written and read
    #[serde(default = "default_features_path")]
    pub features_path: PathBuf,

    /// Distance thresholds, one cluster level each
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<f64>,

    /// Level rendered into the index
    #[serde(default = "default_index_level")]
    pub index_level: usize,

    #[serde(default)]
    pub linkage: LinkageMethod,

    /// Clusters smaller than this become outliers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_cluster_size: Option<usize>,

    #[serde(default = "default_index_title")]
    pub index_title: String,

    #[serde(default = "default_index_subtitle")]
    pub index_subtitle: String,

    /// Enable debug logging
    #[serde(default)]
    pub debug: bool,
}

fn default_features_path() -> PathBuf {
    PathBuf::from(DEFAULT_FEATURES_FILE)
}

fn default_thresholds() -> Vec<f64> {
    ClusterOptions::default().thresholds
}

fn default_index_level() -> usize {
    3
}

fn default_index_title() -> String {
    RenderOptions::default().title
}

fn default_index_subtitle() -> String {
    RenderOptions::default().subtitle
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            features_path: default_features_path(),
            thresholds: default_thresholds(),
            index_level: default_index_level(),
            linkage: LinkageMethod::default(),
            min_cluster_size: None,
            index_title: default_index_title(),
            index_subtitle: default_index_subtitle(),
            debug: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: AppConfig = serde_json::from_str(&content)?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration with standard priority:
    /// 1. Explicit path
    /// 2. ~/.config/wikidex/config.{WIKIDEX_ENV}.json
    /// 3. Defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit_path {
            if path.exists() {
                tracing::info!("Loading config from: {:?}", path);
                return Self::from_file(path);
            } else {
                return Err(ConfigError::ValidationError(format!(
                    "Config file not found: {:?}",
                    path
                )));
            }
        }

        let env = std::env::var("WIKIDEX_ENV").unwrap_or_else(|_| "production".to_string());

        if let Some(config_dir) = Self::config_dir() {
            let config_path = config_dir.join(format!("config.{}.json", env));
            if config_path.exists() {
                tracing::info!("Loading config from: {:?}", config_path);
                return Self::from_file(&config_path);
            }
        }

        tracing::debug!("Using default configuration with environment overrides");
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(path) = std::env::var("WIKIDEX_FEATURES_PATH") {
            self.features_path = PathBuf::from(path);
        }

        if let Ok(level) = std::env::var("WIKIDEX_INDEX_LEVEL") {
            self.index_level = level.parse().map_err(|_| {
                ConfigError::ValidationError(format!("WIKIDEX_INDEX_LEVEL is not a number: {}", level))
            })?;
        }

        if let Ok(method) = std::env::var("WIKIDEX_LINKAGE") {
            self.linkage = method.parse().map_err(ConfigError::ValidationError)?;
        }

        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thresholds.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one threshold is required".to_string(),
            ));
        }

        if let Some(t) = self.thresholds.iter().find(|t| !t.is_finite() || **t < 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "thresholds must be finite and non-negative, got {}",
                t
            )));
        }

        if self.index_level >= self.thresholds.len() {
            return Err(ConfigError::ValidationError(format!(
                "index_level {} out of range for {} thresholds",
                self.index_level,
                self.thresholds.len()
            )));
        }

        if self.min_cluster_size == Some(0) {
            return Err(ConfigError::ValidationError(
                "min_cluster_size must be greater than 0".to_string(),
            ));
        }

        if self.features_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "features_path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn cluster_options(&self) -> ClusterOptions {
        ClusterOptions {
            method: self.linkage,
            thresholds: self.thresholds.clone(),
            min_cluster_size: self.min_cluster_size,
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            title: self.index_title.clone(),
            subtitle: self.index_subtitle.clone(),
        }
    }

    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("wikidex"))
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.thresholds.len(), 9);
        assert_eq!(config.index_level, 3);
        assert_eq!(config.linkage, LinkageMethod::Ward);
        assert_eq!(config.features_path, PathBuf::from("featurized_text.tsv"));
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.index_level = 9;
        assert!(config.validate().is_err());

        config.index_level = 0;
        config.thresholds = vec![-1.0];
        assert!(config.validate().is_err());

        config.thresholds = vec![];
        assert!(config.validate().is_err());

        config.thresholds = vec![1.0];
        config.min_cluster_size = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "linkage": "complete", "index_level": 1 }"#).unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.linkage, LinkageMethod::Complete);
        assert_eq!(config.index_level, 1);
        assert_eq!(config.thresholds, default_thresholds());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        let mut config = AppConfig::default();
        config.min_cluster_size = Some(2);
        config.save_to_file(&path).unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.min_cluster_size, Some(2));
        assert_eq!(parsed.index_title, config.index_title);
    }

    #[test]
    fn test_missing_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.json");
        assert!(matches!(
            AppConfig::load(Some(&missing)),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
