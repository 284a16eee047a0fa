//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for idfactor using clap.

pub mod commands;

use crate::domain::IdFactorError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Successful run
pub const EXIT_SUCCESS: i32 = 0;
/// Invalid or unreadable configuration
pub const EXIT_CONFIG_ERROR: i32 = 2;
/// Unreadable, malformed or empty input
pub const EXIT_INPUT_ERROR: i32 = 3;
/// Any other failure (entropy, sinks, tasks)
pub const EXIT_FATAL_ERROR: i32 = 5;

/// idfactor - split identity records into unlinkable fragment stores
#[derive(Parser, Debug)]
#[command(name = "idfactor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file; built-in defaults when omitted
    #[arg(long, env = "IDFACTOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "IDFACTOR_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split identity records into shuffled fragment stores
    Factor(commands::factor::FactorArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Maps an error to the process exit code
pub fn exit_code(err: &IdFactorError) -> i32 {
    match err {
        IdFactorError::Configuration(_) | IdFactorError::UnknownFragmentKind(_) => {
            EXIT_CONFIG_ERROR
        }
        e if e.is_input_error() => EXIT_INPUT_ERROR,
        _ => EXIT_FATAL_ERROR,
    }
}
