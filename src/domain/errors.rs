//! Domain error types
//!
//! This module defines the error hierarchy for idfactor. Every failure in the
//! factoring engine is unrecoverable: errors propagate as values up to the CLI
//! boundary, which decides how to terminate.

use thiserror::Error;

/// Main idfactor error type
#[derive(Debug, Error)]
pub enum IdFactorError {
    /// A record's field count does not match the active schema
    #[error("Schema violation: record '{record_id}' has {actual} fields, expected {expected}")]
    SchemaViolation {
        record_id: String,
        expected: usize,
        actual: usize,
    },

    /// Two records share the same record identifier
    #[error("Duplicate record id: {record_id}")]
    DuplicateRecordId { record_id: String },

    /// Shuffle requested for an empty row set
    #[error("Invalid shuffle size: {0} (must be at least 1)")]
    InvalidShuffleSize(usize),

    /// The secure entropy source could not supply bytes
    #[error("Secure random source failure: {0}")]
    RandomSourceFailure(String),

    /// Writing a header, a row, or flushing a sink failed
    #[error("Sink failure for '{kind}': {message}")]
    SinkFailure { kind: String, message: String },

    /// A fragment-writer task failed or panicked
    #[error("Task failure for '{kind}': {message}")]
    TaskFailure { kind: String, message: String },

    /// A fragment kind name is not declared by the active schema
    #[error("Unknown fragment kind: {0}")]
    UnknownFragmentKind(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed or unreadable input
    #[error("Input error: {0}")]
    Input(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors outside of fragment sinks
    #[error("I/O error: {0}")]
    Io(String),
}

impl IdFactorError {
    /// Builds a [`IdFactorError::SinkFailure`] for the given fragment kind
    pub fn sink(kind: impl Into<String>, err: impl std::fmt::Display) -> Self {
        IdFactorError::SinkFailure {
            kind: kind.into(),
            message: err.to_string(),
        }
    }

    /// Whether the error was caused by the input table rather than the run
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            IdFactorError::SchemaViolation { .. }
                | IdFactorError::DuplicateRecordId { .. }
                | IdFactorError::InvalidShuffleSize(_)
                | IdFactorError::Input(_)
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for IdFactorError {
    fn from(err: std::io::Error) -> Self {
        IdFactorError::Io(err.to_string())
    }
}

// Conversion from csv parse errors
impl From<csv::Error> for IdFactorError {
    fn from(err: csv::Error) -> Self {
        IdFactorError::Input(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for IdFactorError {
    fn from(err: toml::de::Error) -> Self {
        IdFactorError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from entropy source errors
impl From<rand::Error> for IdFactorError {
    fn from(err: rand::Error) -> Self {
        IdFactorError::RandomSourceFailure(err.to_string())
    }
}
