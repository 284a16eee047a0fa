//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG_ERROR, EXIT_FATAL_ERROR, EXIT_SUCCESS};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "idfactor.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing idfactor configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!(
                    "  2. Validate configuration: idfactor --config {} validate-config",
                    self.output
                );
                println!(
                    "  3. Factor records: idfactor --config {} factor identities.psv",
                    self.output
                );
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL_ERROR)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# idfactor Configuration File

[application]
log_level = "info"
dry_run = false

[input]
delimiter = "|"
variant = "plain"
has_header = true

[output]
directory = "."
delimiter = "|"
extension = "psv"
line_terminator = "platform"
fragments = []
# map_file = "identity_map.psv"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# idfactor Configuration File
# Splits identity records into shuffled, unlinkable fragment stores
#
# Every setting is optional. Values may reference environment variables
# with ${VAR_NAME}, and IDFACTOR_<SECTION>_<KEY> variables override the
# file (for example IDFACTOR_OUTPUT_DIRECTORY). Command-line flags win
# over both.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode (render every store, write nothing)
dry_run = false

# ============================================================================
# Input Layout
# ============================================================================
[input]
# Single-character field delimiter
delimiter = "|"

# Record layout: "plain" (14 fields) or "compromised" (15 fields, with a
# breach_id after the record id)
variant = "plain"

# Whether the first line is a header row
has_header = true

# ============================================================================
# Output Artifacts
# ============================================================================
[output]
# Directory receiving the fragment stores (created when missing)
directory = "./factored"

# Single-character field delimiter of every output file
delimiter = "|"

# File extension of fragment stores
extension = "psv"

# Line terminator: platform | lf | crlf
line_terminator = "platform"

# Fragment kinds to produce; empty means all of them:
#   name_dob, ssn, address, phone, email, name_address, name_phone
fragments = ["name_dob", "ssn", "address", "phone", "email"]

# Identity map linking each record to its fragment ids. This file
# re-links every fragment store; keep it apart from them.
# map_file = "identity_map.psv"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false

# Local log directory
local_path = "./logs"

# Log rotation (daily, hourly, never)
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "idfactor.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "idfactor.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generated_configs_parse_and_validate() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config = parse_config(&content).unwrap();
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_generate_config_with_examples() {
        let config = InitArgs::generate_config_with_examples();
        assert!(config.contains("# idfactor Configuration File"));
        assert!(config.contains("fragments"));
        assert!(config.contains("map_file"));
    }

    #[tokio::test]
    async fn test_existing_file_needs_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("idfactor.toml");
        fs::write(&path, "keep").unwrap();

        let mut args = InitArgs {
            output: path.display().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_CONFIG_ERROR);
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep");

        args.force = true;
        assert_eq!(args.execute().await.unwrap(), EXIT_SUCCESS);
        assert!(fs::read_to_string(&path).unwrap().contains("[output]"));
    }
}
