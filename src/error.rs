//! Error types for InterMAX
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for InterMAX operations
///
/// This enum encompasses all possible errors that can occur during
/// storage access, session handling, chat round-trips, and admin
/// aggregation. Chat-send failures are surfaced to the caller and
/// rendered inline in the transcript; nothing here is process-fatal.
#[derive(Error, Debug)]
pub enum IntermaxError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Durable store inaccessible or failed an operation
    #[error("Storage error: {0}")]
    Storage(String),

    /// Malformed or incomplete persisted records
    #[error("Invalid persisted data: {0}")]
    InvalidData(String),

    /// Transport-level failure reaching the inference endpoint
    #[error("Network error: {0}")]
    Network(String),

    /// Provider reported an exhausted API quota
    #[error("API quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Provider rejected the configured API credential
    #[error("Invalid API credential: {0}")]
    InvalidCredential(String),

    /// Requested model is unknown to the provider
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Prompt plus context exceeded the model's window
    #[error("Context too large: {0}")]
    ContextTooLarge(String),

    /// Any other provider-reported error, carrying the provider message
    #[error("Provider error: {0}")]
    Provider(String),

    /// Login credentials did not match
    #[error("Authentication failed: {0}")]
    InvalidLogin(String),

    /// No valid session for the requested operation
    #[error("Session expired or missing: {0}")]
    SessionExpired(String),

    /// Operation refused because it would break a structural invariant
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for InterMAX operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
