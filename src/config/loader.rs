//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::IdFactorConfig;
use crate::domain::errors::IdFactorError;
use crate::domain::result::Result;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;

/// Prefix of environment variables overriding configuration values
pub const ENV_PREFIX: &str = "IDFACTOR";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into IdFactorConfig
/// 4. Applies environment variable overrides (IDFACTOR_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`IdFactorError::Configuration`] if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use idfactor::config::loader::load_config;
///
/// let config = load_config("idfactor.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<IdFactorConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(IdFactorError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        IdFactorError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let config = parse_config(&contents)?;
    finish(config)
}

/// Loads configuration from `path`, or starts from defaults when no file is
/// given
///
/// Environment overrides and validation apply either way.
pub fn load_config_or_default(path: Option<&Path>) -> Result<IdFactorConfig> {
    match path {
        Some(path) => load_config(path),
        None => finish(IdFactorConfig::default()),
    }
}

/// Parses configuration text after environment variable substitution
///
/// Overrides and validation are not applied.
pub fn parse_config(contents: &str) -> Result<IdFactorConfig> {
    let contents = substitute_env_vars(contents)?;
    Ok(toml::from_str(&contents)?)
}

fn finish(mut config: IdFactorConfig) -> Result<IdFactorConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        IdFactorError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
        .map_err(|e| IdFactorError::Configuration(e.to_string()))?;
    let mut missing_vars: Vec<String> = Vec::new();

    let lines: Vec<String> = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                return line.to_string();
            }
            re.replace_all(line, |caps: &Captures| match std::env::var(&caps[1]) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == &caps[1]) {
                        missing_vars.push(caps[1].to_string());
                    }
                    caps[0].to_string()
                }
            })
            .into_owned()
        })
        .collect();

    if !missing_vars.is_empty() {
        return Err(IdFactorError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using IDFACTOR_* prefix
///
/// Environment variables follow the pattern: IDFACTOR_<SECTION>_<KEY>
/// For example: IDFACTOR_OUTPUT_DIRECTORY, IDFACTOR_INPUT_VARIANT
fn apply_env_overrides(config: &mut IdFactorConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = env("APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Input overrides
    if let Some(val) = env("INPUT_DELIMITER") {
        config.input.delimiter = val;
    }
    if let Some(val) = env("INPUT_VARIANT") {
        config.input.variant = val.parse()?;
    }
    if let Some(val) = env("INPUT_HAS_HEADER") {
        config.input.has_header = val.parse().unwrap_or(true);
    }

    // Output overrides
    if let Some(val) = env("OUTPUT_DIRECTORY") {
        config.output.directory = val;
    }
    if let Some(val) = env("OUTPUT_DELIMITER") {
        config.output.delimiter = val;
    }
    if let Some(val) = env("OUTPUT_EXTENSION") {
        config.output.extension = val;
    }
    if let Some(val) = env("OUTPUT_LINE_TERMINATOR") {
        config.output.line_terminator = val.parse()?;
    }
    if let Some(val) = env("OUTPUT_MAP_FILE") {
        config.output.map_file = Some(val).filter(|v| !v.is_empty());
    }
    if let Some(val) = env("OUTPUT_FRAGMENTS") {
        config.output.fragments = split_list(&val);
    }

    // Logging overrides
    if let Some(val) = env("LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Some(val) = env("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env("LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

fn env(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{key}")).ok()
}

/// Splits a comma-separated list, dropping blank entries
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
