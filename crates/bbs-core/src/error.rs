//! Domain-level error types.

use thiserror::Error;

/// Storage-level errors, surfaced unmodified to the caller.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Storage connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Malformed item: {0}")]
    Malformed(String),
}

/// Access gate rejections.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Forbidden")]
    Forbidden,
}

/// Configuration errors detected at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Expected origin header value is missing or empty outside development mode")]
    MissingOriginSecret,

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
