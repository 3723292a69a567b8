//! Error types for Shikshak Saathi
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Shikshak Saathi operations
///
/// Covers configuration loading, AI provider calls, local persistence,
/// request validation and the HTTP plumbing shared by the server and the
/// offline client.
#[derive(Error, Debug)]
pub enum SaathiError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (API calls, quota, malformed payloads)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Local store errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Input rejected before any work was done
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transport failures or non-success responses from the coaching API
    #[error("Network error: {0}")]
    Network(String),

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Shikshak Saathi operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
