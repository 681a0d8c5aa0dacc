//! # Herald Core Errors
//!
//! Defines [`HeraldError`], the error type for everything around the
//! dispatcher that can fail: loading and parsing configuration files,
//! validating scenarios and installing logging. The dispatch engine itself
//! is total and never returns these.
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HeraldError {
    #[error("I/O error during '{operation}' on path '{}': {source}", path.display())]
    ConfigIo {
        operation: &'static str, // e.g. "read", "write"
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown or unsupported config format for path: {}", path.display())]
    UnsupportedConfigFormat { path: PathBuf },

    #[error("Failed to deserialize from {format}: {reason}")]
    ConfigDeserialize {
        format: &'static str,
        reason: String,
    },

    #[error("Failed to serialize to {format}: {reason}")]
    ConfigSerialize {
        format: &'static str,
        reason: String,
    },

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Logging initialization failed: {0}")]
    LoggingInit(String),
}

/// Result type used across herald
pub type Result<T> = StdResult<T, HeraldError>;
