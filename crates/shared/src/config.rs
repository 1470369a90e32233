//! Configuration management for the anime dashboard.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::Level;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    pub data: DataConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Jikan API settings
    pub jikan: JikanConfig,

    /// Autosuggest cache settings
    #[serde(default)]
    pub suggestions: SuggestionConfig,

    /// View defaults and export settings
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Jikan API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanConfig {
    /// Jikan API base URL
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Rate limiting settings
    pub rate_limit: RateLimitConfig,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests in any trailing one-second window
    pub requests_per_second: u32,

    /// Maximum requests in any trailing sixty-second window
    pub requests_per_minute: u32,
}

/// Suggestion cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    /// How long a cached suggestion list stays valid
    pub ttl_seconds: u64,

    /// Number of suggestions requested per lookup
    pub limit: u32,
}

/// Dashboard view configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Default minimum score for the search view
    pub search_min_score: f64,

    /// Default minimum score for the rankings view
    pub top_min_score: f64,

    /// Episode length used when a record carries no parsable duration
    pub average_episode_minutes: u32,

    /// CSV export directory (relative to data directory or absolute)
    pub export_dir: String,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            limit: 5,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            search_min_score: 5.0,
            top_min_score: 7.0,
            average_episode_minutes: 23,
            export_dir: "exports".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                root_dir: "data".to_string(),
            },
            logging: LoggingConfig {
                log_dir: "logs".to_string(),
                default_level: "info".to_string(),
                console: true,
                file: false,
                json_format: false,
            },
            jikan: JikanConfig {
                base_url: "https://api.jikan.moe/v4".to_string(),
                timeout_seconds: 30,
                user_agent: "anime-dashboard/0.1.0".to_string(),
                rate_limit: RateLimitConfig {
                    requests_per_second: 3,
                    requests_per_minute: 60,
                },
            },
            suggestions: SuggestionConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Parse the configured default log level
    pub fn log_level(&self) -> Result<Level> {
        self.logging
            .default_level
            .parse::<Level>()
            .map_err(|_| anyhow!("Invalid log level: {}", self.logging.default_level))
    }

    /// Get the path for the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the absolute path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        self.resolve(&self.logging.log_dir)
    }

    /// Get the absolute path for the export directory
    pub fn export_dir(&self) -> PathBuf {
        self.resolve(&self.dashboard.export_dir)
    }

    fn resolve(&self, dir: &str) -> PathBuf {
        let path = Path::new(dir);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir().join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.root_dir, "data");
        assert_eq!(config.jikan.rate_limit.requests_per_second, 3);
        assert_eq!(config.jikan.rate_limit.requests_per_minute, 60);
        assert_eq!(config.suggestions.ttl_seconds, 300);
        assert_eq!(config.dashboard.average_episode_minutes, 23);
    }

    #[test]
    fn test_save_and_load_config() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");

        let mut saved_config = Config::default();
        saved_config.suggestions.ttl_seconds = 60;
        saved_config.save(&config_path)?;

        assert!(config_path.exists());

        let loaded_config = Config::from_file(&config_path)?;
        assert_eq!(loaded_config.data.root_dir, saved_config.data.root_dir);
        assert_eq!(loaded_config.jikan.base_url, saved_config.jikan.base_url);
        assert_eq!(loaded_config.suggestions.ttl_seconds, 60);

        Ok(())
    }

    #[test]
    fn test_optional_sections_default() -> Result<()> {
        let toml_str = r#"
            [data]
            root_dir = "/tmp/anime"

            [logging]
            log_dir = "logs"
            default_level = "debug"
            console = true
            file = false
            json_format = false

            [jikan]
            base_url = "http://localhost:9000/v4"
            timeout_seconds = 5
            user_agent = "test"

            [jikan.rate_limit]
            requests_per_second = 1
            requests_per_minute = 10
        "#;

        let config: Config = toml::from_str(toml_str)?;
        assert_eq!(config.jikan.rate_limit.requests_per_minute, 10);
        assert_eq!(config.suggestions.limit, 5);
        assert_eq!(config.dashboard.top_min_score, 7.0);
        assert_eq!(config.log_level()?, Level::DEBUG);

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        // Should return default config without error
        assert_eq!(config.data.root_dir, "data");
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.default_level = "loud".to_string();
        assert!(config.log_level().is_err());
    }

    #[test]
    fn test_path_resolution() {
        let mut config = Config::default();

        assert!(config.log_dir().ends_with("data/logs"));
        assert!(config.export_dir().ends_with("data/exports"));

        config.dashboard.export_dir = "/srv/exports".to_string();
        assert_eq!(config.export_dir(), PathBuf::from("/srv/exports"));
    }
}
