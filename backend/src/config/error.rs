//! Error types for rule-table loading and validation.

use std::path::PathBuf;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Fatal configuration problems, surfaced before any planning run starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing config file: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("Failed to read config file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {table}: {message}")]
    Parse { table: String, message: String },

    #[error("Dependency rule '{rule_id}' references unknown field path '{path}'")]
    UnknownFieldPath { rule_id: String, path: String },

    #[error("{table} references platform '{platform}' which has no formats configured")]
    UnknownPlatform { table: String, platform: String },

    #[error("{table} references format '{format}' which is not configured for platform '{platform}'")]
    UnknownFormat {
        table: String,
        platform: String,
        format: String,
    },

    #[error("Invalid reference UTC offset '{0}' (expected e.g. +01:00)")]
    InvalidOffset(String),

    #[error("horizon_days must be between 0 and {max}, got {days}")]
    InvalidHorizon { days: i64, max: i64 },
}

impl ConfigError {
    pub fn parse(table: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            table: table.into(),
            message: err.to_string(),
        }
    }
}
