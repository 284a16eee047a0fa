// idfactor - Identity record factoring tool
// Copyright (c) 2025 idfactor Contributors
// Licensed under the MIT License

use clap::Parser;
use idfactor::cli::{Cli, Commands, EXIT_CONFIG_ERROR, EXIT_FATAL_ERROR};
use idfactor::config::{load_config_or_default, LoggingConfig};
use idfactor::logging::{init_logging, LoggingGuard};
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    // This is optional - if .env doesn't exist, it's silently ignored
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL_ERROR
        }
    };

    process::exit(exit_code);
}

/// Execute the CLI command
///
/// The factor command loads its configuration before logging starts so the
/// configured level and file layer apply to the whole run.
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    let config_path = cli.config.as_deref();

    match &cli.command {
        Commands::Factor(args) => {
            let config = match load_config_or_default(config_path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Failed to load configuration: {e}");
                    return Ok(EXIT_CONFIG_ERROR);
                }
            };
            let level = cli
                .log_level
                .clone()
                .unwrap_or_else(|| config.application.log_level.clone());
            let _guard = match start_logging(&level, &config.logging) {
                Some(guard) => guard,
                None => return Ok(EXIT_CONFIG_ERROR),
            };
            args.execute(config).await
        }
        Commands::ValidateConfig(args) => {
            let _guard = console_logging(cli);
            args.execute(config_path).await
        }
        Commands::Init(args) => {
            let _guard = console_logging(cli);
            args.execute().await
        }
    }
}

/// Console-only logging for commands that run without a loaded configuration
fn console_logging(cli: &Cli) -> Option<LoggingGuard> {
    let level = cli.log_level.as_deref().unwrap_or("info");
    start_logging(level, &LoggingConfig::default())
}

fn start_logging(level: &str, config: &LoggingConfig) -> Option<LoggingGuard> {
    match init_logging(level, config) {
        Ok(guard) => {
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                "idfactor - Identity record factoring tool"
            );
            Some(guard)
        }
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    }
}
