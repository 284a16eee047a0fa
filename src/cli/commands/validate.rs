//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the idfactor configuration file.

use crate::cli::{EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::config::{load_config_or_default, IdFactorConfig};
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        let source = config_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in defaults".to_string());
        tracing::info!(config = %source, "Validating configuration");

        println!("🔍 Validating configuration: {source}");
        println!();

        // Loading applies overrides and validates
        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        print_config_summary(&config);
        Ok(EXIT_SUCCESS)
    }
}

fn print_config_summary(config: &IdFactorConfig) {
    let kinds: Vec<String> = config
        .fragment_specs()
        .map(|specs| specs.iter().map(|s| s.kind().to_string()).collect())
        .unwrap_or_default();

    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Dry Run: {}", config.application.dry_run);
    println!("  Record Layout: {}", config.input.variant);
    println!("  Input Delimiter: {:?}", config.input.delimiter);
    println!("  Input Header: {}", config.input.has_header);
    println!("  Output Directory: {}", config.output.directory);
    println!("  Output Delimiter: {:?}", config.output.delimiter);
    println!("  Line Terminator: {:?}", config.output.line_terminator);
    println!("  Fragment Kinds: {}", kinds.join(", "));
    println!(
        "  Identity Map: {}",
        config.output.map_file.as_deref().unwrap_or("(not written)")
    );
    if config.logging.local_enabled {
        println!(
            "  Log Files: {} ({})",
            config.logging.local_path, config.logging.local_rotation
        );
    }
    println!();
}
