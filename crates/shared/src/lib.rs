//! Shared library for the anime dashboard workspace.
//!
//! This crate provides common functionality used by the dashboard crate:
//! - Configuration management
//! - Domain models (anime summaries, types, ranking filters)
//! - File path utilities
//! - Logging infrastructure

pub mod config;
pub mod logging;
pub mod models;
pub mod paths;

// Re-export commonly used types
pub use config::Config;
pub use logging::LogConfig;
pub use models::*;
pub use paths::DataPaths;

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
