//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Human-readable console output on stderr
//! - JSON-formatted local file logs with rotation
//!
//! Log events carry counts, kinds and timings only. Field values and record
//! ids never appear in logs.
//!
//! # Example
//!
//! ```no_run
//! use idfactor::logging::init_logging;
//! use idfactor::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(records = 42, "Factoring records");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log a fragment store that was written
///
/// # Example
///
/// ```no_run
/// use idfactor::log_fragment_written;
///
/// log_fragment_written!("ssn", 10, 2);
/// ```
#[macro_export]
macro_rules! log_fragment_written {
    ($kind:expr, $written:expr, $suppressed:expr) => {
        tracing::info!(
            kind = %$kind,
            written = $written,
            suppressed = $suppressed,
            "Fragment store written"
        );
    };
}

/// Log the completion of a factoring run
///
/// # Example
///
/// ```no_run
/// use idfactor::log_factor_complete;
/// use std::time::Duration;
///
/// log_factor_complete!(42, Duration::from_millis(120));
/// ```
#[macro_export]
macro_rules! log_factor_complete {
    ($records:expr, $duration:expr) => {
        tracing::info!(
            records = $records,
            duration_ms = $duration.as_millis() as u64,
            "Factoring completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use idfactor::log_error_with_context;
/// use idfactor::domain::IdFactorError;
///
/// let error = IdFactorError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
