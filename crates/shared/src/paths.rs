//! File path utilities for logs and CSV exports.

use crate::config::Config;
use std::path::{Path, PathBuf};

/// File path manager for data files
#[derive(Debug, Clone)]
pub struct DataPaths {
    logs: PathBuf,
    exports: PathBuf,
}

impl DataPaths {
    /// Create a new DataPaths with the default layout under `root`
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            logs: root.join("logs"),
            exports: root.join("exports"),
        }
    }

    /// Create DataPaths honoring the directories set in the configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            logs: config.log_dir(),
            exports: config.export_dir(),
        }
    }

    /// Get logs directory
    pub fn logs_dir(&self) -> &Path {
        &self.logs
    }

    /// Get the path of an export file
    pub fn export_file(&self, file_name: &str) -> PathBuf {
        self.exports.join(file_name)
    }

    /// Create a filename-safe slug from an anime title
    pub fn title_to_slug(title: &str) -> String {
        title
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
            .collect::<String>()
            .split_whitespace()
            .take(3)
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase()
    }
}
