//! Factor command implementation
//!
//! This module implements the `factor` command: read identity records,
//! write one shuffled fragment store per fragment kind and, on request, the
//! identity map.

use crate::adapters::delimited::read_records;
use crate::adapters::staging::{persist_all, StagedFile};
use crate::cli::{exit_code, EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::config::loader::split_list;
use crate::config::IdFactorConfig;
use crate::core::mapping::{persist, IdentityMap};
use crate::core::orchestrator::Factorer;
use crate::core::summary::FactorSummary;
use crate::core::writer::{Assignments, FragmentWriter, RenderedStore};
use crate::domain::{IdFactorError, RecordTable, Result};
use crate::schema::{FragmentSpec, SchemaVariant};
use chrono::Utc;
use clap::Args;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Arguments for the factor command
#[derive(Args, Debug, Default)]
pub struct FactorArgs {
    /// Use the compromised record layout (breach id after the record id)
    #[arg(short, long)]
    pub compromised: bool,

    /// Field delimiter of the input file
    #[arg(short, long, value_name = "DELIMITER")]
    pub delimiter: Option<String>,

    /// Write an identity map to the named file inside the output directory
    #[arg(short, long, value_name = "FILE")]
    pub map_file: Option<String>,

    /// Directory receiving the fragment stores
    #[arg(short, long, value_name = "DIRECTORY")]
    pub output_dir: Option<String>,

    /// Fragment kinds to produce (comma-separated); all kinds by default
    #[arg(long, value_name = "KINDS")]
    pub fragments: Option<String>,

    /// Render every store and report counts without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub summary_json: bool,

    /// Input file; standard input when omitted
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

impl FactorArgs {
    /// Applies command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut IdFactorConfig) {
        if self.compromised {
            config.input.variant = SchemaVariant::Compromised;
        }
        if let Some(ref delimiter) = self.delimiter {
            config.input.delimiter = delimiter.clone();
        }
        if let Some(ref map_file) = self.map_file {
            config.output.map_file = Some(map_file.clone());
        }
        if let Some(ref dir) = self.output_dir {
            config.output.directory = dir.clone();
        }
        if let Some(ref fragments) = self.fragments {
            let kinds = split_list(fragments);
            tracing::info!(fragments = ?kinds, "Overriding fragment selection from CLI");
            config.output.fragments = kinds;
        }
        if self.dry_run {
            config.application.dry_run = true;
        }
    }

    /// Execute the factor command
    pub async fn execute(&self, mut config: IdFactorConfig) -> anyhow::Result<i32> {
        tracing::info!("Starting factor command");

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG_ERROR);
        }

        match self.run(&config).await {
            Ok(summary) => {
                summary.log_summary();
                if self.summary_json {
                    println!("{}", summary.to_json()?);
                } else {
                    print_summary(&summary, &config);
                }
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Factoring failed");
                eprintln!("Error: {e}");
                Ok(exit_code(&e))
            }
        }
    }

    async fn run(&self, config: &IdFactorConfig) -> Result<FactorSummary> {
        let started_at = Utc::now();
        let started = Instant::now();

        let specs = config.fragment_specs()?;
        let writer = FragmentWriter::new(config.output.format()?);

        let table = Arc::new(self.read_table(config)?);
        if table.is_empty() {
            return Err(IdFactorError::Input("input contains no records".to_string()));
        }

        let factorer = Factorer::new(writer);
        let dry_run = config.application.dry_run;

        let (identity_map, map_written) = if dry_run {
            tracing::info!("Dry run mode enabled - no files will be written");
            let stores = factorer.render_all(Arc::clone(&table), &specs).await?;
            (assemble(&table, &specs, stores)?, false)
        } else {
            write_outputs(&factorer, &table, &specs, config).await?
        };

        Ok(FactorSummary::from_map(
            started_at,
            config.input.variant,
            &specs,
            &identity_map,
        )
        .with_map_written(map_written)
        .with_dry_run(dry_run)
        .with_duration(started.elapsed()))
    }

    fn read_table(&self, config: &IdFactorConfig) -> Result<RecordTable> {
        let format = config.input.format()?;
        let reader: Box<dyn Read> = match self.file {
            Some(ref path) => {
                tracing::info!(path = %path.display(), "Reading input file");
                Box::new(File::open(path).map_err(|e| {
                    IdFactorError::Input(format!("error opening {}: {e}", path.display()))
                })?)
            }
            None => {
                tracing::info!("Reading input from stdin");
                Box::new(io::stdin().lock())
            }
        };
        read_records(reader, &format, config.schema())
    }
}

/// Writes every fragment store and the optional identity map through staged
/// files, persisting them only once everything has been written
async fn write_outputs(
    factorer: &Factorer,
    table: &Arc<RecordTable>,
    specs: &[FragmentSpec],
    config: &IdFactorConfig,
) -> Result<(IdentityMap, bool)> {
    let dir = Path::new(&config.output.directory);
    fs::create_dir_all(dir)
        .map_err(|e| IdFactorError::Io(format!("failed to create {}: {e}", dir.display())))?;

    let staged = specs
        .iter()
        .map(|spec| StagedFile::create(dir.join(spec.file_name(&config.output.extension))))
        .collect::<Result<Vec<_>>>()?;

    let factored = factorer.factor(Arc::clone(table), specs, staged).await?;
    let mut files = factored.sinks;

    let map_written = match config.output.map_file {
        Some(ref name) => {
            let mut map_file = StagedFile::create(dir.join(name))?;
            persist(&factored.identity_map, &mut map_file, &config.output.format()?)?;
            files.push(map_file);
            true
        }
        None => false,
    };

    let paths = persist_all(files)?;
    tracing::info!(files = paths.len(), directory = %dir.display(), "Outputs persisted");

    Ok((factored.identity_map, map_written))
}

fn assemble(
    table: &RecordTable,
    specs: &[FragmentSpec],
    stores: Vec<RenderedStore>,
) -> Result<IdentityMap> {
    let assignments: Vec<Assignments> = stores
        .into_iter()
        .map(RenderedStore::into_assignments)
        .collect();
    IdentityMap::assemble(table, specs, &assignments)
}

fn print_summary(summary: &FactorSummary, config: &IdFactorConfig) {
    if summary.dry_run {
        println!("🔍 DRY RUN - no files were written");
    }
    println!(
        "✅ Factored {} {} records into {} fragment stores",
        summary.records,
        summary.variant,
        summary.fragments.len()
    );
    for fragment in &summary.fragments {
        println!(
            "  {}: {} written, {} suppressed",
            fragment.kind, fragment.written, fragment.suppressed
        );
    }
    if !summary.dry_run {
        println!("  Output directory: {}", config.output.directory);
    }
    if summary.map_written {
        if let Some(ref map_file) = config.output.map_file {
            println!("  Identity map: {map_file}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::EXIT_INPUT_ERROR;

    #[test]
    fn test_overrides_win_over_config() {
        let args = FactorArgs {
            compromised: true,
            delimiter: Some(",".to_string()),
            map_file: Some("map.psv".to_string()),
            output_dir: Some("out".to_string()),
            fragments: Some("ssn, email".to_string()),
            dry_run: true,
            ..Default::default()
        };
        let mut config = IdFactorConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.input.variant, SchemaVariant::Compromised);
        assert_eq!(config.input.delimiter, ",");
        assert_eq!(config.output.map_file.as_deref(), Some("map.psv"));
        assert_eq!(config.output.directory, "out");
        assert_eq!(config.output.fragments, vec!["ssn", "email"]);
        assert!(config.application.dry_run);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let mut config = IdFactorConfig::default();
        config.output.map_file = Some("keep.psv".to_string());
        FactorArgs::default().apply_overrides(&mut config);
        assert_eq!(config.output.map_file.as_deref(), Some("keep.psv"));
        assert_eq!(config.input.variant, SchemaVariant::Plain);
    }

    #[tokio::test]
    async fn test_invalid_override_is_config_error() {
        let args = FactorArgs {
            delimiter: Some("::".to_string()),
            ..Default::default()
        };
        let code = args.execute(IdFactorConfig::default()).await.unwrap();
        assert_eq!(code, EXIT_CONFIG_ERROR);
    }

    #[tokio::test]
    async fn test_missing_input_file_is_input_error() {
        let args = FactorArgs {
            file: Some(PathBuf::from("/nonexistent/ids.psv")),
            dry_run: true,
            ..Default::default()
        };
        let code = args.execute(IdFactorConfig::default()).await.unwrap();
        assert_eq!(code, EXIT_INPUT_ERROR);
    }
}
