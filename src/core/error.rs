//! Error types for core module
//!
//! Provides custom error types for configuration loading. Asset and placement
//! errors live next to the code that raises them (`assets::error`,
//! `rendering::pieces::placement`).

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the viewer configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file I/O error
    #[error("Config I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config deserialization error
    #[error("Config parse error at {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A value that parsed but cannot be used
    #[error("Invalid config value `{field}`: {message}")]
    InvalidValue { field: &'static str, message: String },
}

/// Result type alias for core operations
pub type ConfigResult<T> = Result<T, ConfigError>;
