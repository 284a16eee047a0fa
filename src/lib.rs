// idfactor - Identity record factoring tool
// Copyright (c) 2025 idfactor Contributors
// Licensed under the MIT License

//! # idfactor - Identity record factoring
//!
//! idfactor splits composite identity records into separate fragment stores
//! (name and date of birth, SSN, address, phone, email, and composite
//! groupings). Every store is written in its own secure random row order with
//! a fresh random surrogate id per fragment, so rows of one store cannot be
//! matched to rows of another by position or by identifier.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Factoring engine (shuffle, surrogate ids, extraction, writers,
//!   orchestration, identity map)
//! - [`schema`] - Record layouts and fragment definitions
//! - [`adapters`] - Delimited input and staged output files
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use idfactor::core::format::DelimitedFormat;
//! use idfactor::core::mapping::persist;
//! use idfactor::core::orchestrator::Factorer;
//! use idfactor::core::writer::FragmentWriter;
//! use idfactor::domain::RecordTable;
//! use idfactor::schema::RecordSchema;
//! use std::sync::Arc;
//!
//! # async fn example(table: RecordTable) -> Result<(), Box<dyn std::error::Error>> {
//! let table = Arc::new(table);
//! let specs = RecordSchema::plain().fragments().to_vec();
//! let sinks = specs.iter().map(|_| Vec::<u8>::new()).collect();
//!
//! let factorer = Factorer::new(FragmentWriter::new(DelimitedFormat::default()));
//! let factored = factorer.factor(table, &specs, sinks).await?;
//!
//! let mut map = Vec::new();
//! persist(&factored.identity_map, &mut map, &DelimitedFormat::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## No Partial Output
//!
//! Every fragment store is rendered in memory before any sink receives a
//! byte. A malformed record, an entropy failure or a failed task aborts the
//! run with nothing written. The CLI additionally writes through staged
//! temporary files that become visible only once every artifact is complete.
//!
//! ## Error Handling
//!
//! idfactor uses the [`domain::IdFactorError`] type for all errors:
//!
//! ```rust,no_run
//! use idfactor::domain::IdFactorError;
//!
//! fn example() -> Result<(), IdFactorError> {
//!     let config = idfactor::config::load_config("idfactor.toml")?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod schema;
