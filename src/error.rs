//! Error types for Maguai
//!
//! This module defines the crate-wide error type, using `thiserror` for
//! ergonomic error handling. Adapter and session-level outcomes have their own
//! narrower enums next to the code that produces them.

use crate::providers::UpstreamFault;
use thiserror::Error;

/// Main error type for Maguai operations
///
/// Covers configuration loading, catalog lookups, provider interactions and
/// the I/O and (de)serialization plumbing around them.
#[derive(Error, Debug)]
pub enum MaguaiError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors that are not upstream faults (client setup, lock failures)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Fault reported by the upstream generative API
    #[error("Upstream fault: {0}")]
    Upstream(UpstreamFault),

    /// Unknown model identifier
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Maguai operations
///
/// Uses `anyhow::Error` so callers can attach context and downcast to
/// [`MaguaiError`] where the variant matters.
pub type Result<T> = anyhow::Result<T>;
