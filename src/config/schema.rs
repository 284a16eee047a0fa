//! Configuration schema types
//!
//! This module defines the configuration structure for idfactor. Every
//! section is optional; an empty file is a valid configuration.

use crate::adapters::delimited::InputFormat;
use crate::core::format::{parse_delimiter, DelimitedFormat, LineTerminator};
use crate::domain::Result;
use crate::schema::{FragmentSpec, RecordSchema, SchemaVariant};
use serde::{Deserialize, Serialize};

/// Main idfactor configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdFactorConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Input layout
    #[serde(default)]
    pub input: InputConfig,

    /// Output artifacts
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl IdFactorConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.application.validate()?;
        self.input.validate()?;
        self.output.validate()?;
        self.logging.validate()?;

        // Fragment names depend on the record layout
        let specs = self.fragment_specs().map_err(|e| e.to_string())?;

        // The map is persisted last and would replace a store of the same name
        if let Some(ref map_file) = self.output.map_file {
            if let Some(spec) = specs
                .iter()
                .find(|spec| spec.file_name(&self.output.extension) == *map_file)
            {
                return Err(format!(
                    "output.map_file '{}' collides with the '{}' fragment store",
                    map_file,
                    spec.kind()
                ));
            }
        }
        Ok(())
    }

    /// Record schema for the configured input variant
    pub fn schema(&self) -> RecordSchema {
        RecordSchema::for_variant(self.input.variant)
    }

    /// Fragment specs selected by `output.fragments`, in schema order
    pub fn fragment_specs(&self) -> Result<Vec<FragmentSpec>> {
        self.schema().select(&self.output.fragments)
    }
}

/// Application-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (render every store, write nothing)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Input layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Single-character field delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Record layout (plain or compromised)
    #[serde(default)]
    pub variant: SchemaVariant,

    /// Whether the first line is a header row
    #[serde(default = "default_true")]
    pub has_header: bool,
}

impl InputConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        parse_delimiter(&self.delimiter).map_err(|e| format!("input.delimiter: {e}"))?;
        Ok(())
    }

    /// Parsed input format
    pub fn format(&self) -> Result<InputFormat> {
        Ok(InputFormat {
            delimiter: parse_delimiter(&self.delimiter)?,
            has_header: self.has_header,
        })
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            variant: SchemaVariant::default(),
            has_header: true,
        }
    }
}

/// Output artifact configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the fragment stores and the identity map
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Single-character field delimiter of every artifact
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// File extension of fragment stores
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Line terminator (platform, lf, crlf)
    #[serde(default)]
    pub line_terminator: LineTerminator,

    /// Identity map file name, relative to `directory`; no map when unset
    #[serde(default)]
    pub map_file: Option<String>,

    /// Fragment kinds to produce; all kinds when empty
    #[serde(default)]
    pub fragments: Vec<String>,
}

impl OutputConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        parse_delimiter(&self.delimiter).map_err(|e| format!("output.delimiter: {e}"))?;

        if self.directory.is_empty() {
            return Err("output.directory cannot be empty".to_string());
        }

        if self.extension.is_empty() || self.extension.contains(['/', '\\', '.']) {
            return Err(format!(
                "Invalid output.extension '{}'. Must be non-empty without '.' or path separators",
                self.extension
            ));
        }

        if let Some(ref map_file) = self.map_file {
            if map_file.trim().is_empty() {
                return Err("output.map_file cannot be empty when set".to_string());
            }
        }

        Ok(())
    }

    /// Parsed output format
    pub fn format(&self) -> Result<DelimitedFormat> {
        DelimitedFormat::new(parse_delimiter(&self.delimiter)?, self.line_terminator)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            delimiter: default_delimiter(),
            extension: default_extension(),
            line_terminator: LineTerminator::default(),
            map_file: None,
            fragments: Vec::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err(
                "logging.local_path cannot be empty when local logging is enabled".to_string(),
            );
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_delimiter() -> String {
    "|".to_string()
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_extension() -> String {
    "psv".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
