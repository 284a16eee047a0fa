//! Configuration management for idfactor.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! idfactor reads an optional TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `IDFACTOR_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load, including fragment kind names
//!
//! Command-line flags take precedence over both.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use idfactor::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("idfactor.toml")?;
//!
//! println!("Output directory: {}", config.output.directory);
//! println!("Record layout: {}", config.input.variant);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run mode
//! - [`InputConfig`] - Input delimiter, header row and record layout
//! - [`OutputConfig`] - Output directory, format, fragment selection and map file
//! - [`LoggingConfig`] - Optional rolling file logs
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [input]
//! delimiter = "|"
//! variant = "plain"
//!
//! [output]
//! directory = "${IDFACTOR_OUT}"
//! fragments = ["name_dob", "ssn", "email"]
//! map_file = "identity_map.psv"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default};
pub use schema::{ApplicationConfig, IdFactorConfig, InputConfig, LoggingConfig, OutputConfig};
