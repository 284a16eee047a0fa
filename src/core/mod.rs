//! Core factoring engine.
//!
//! # Modules
//!
//! - [`entropy`] - Fallible cryptographically secure randomness
//! - [`shuffle`] - Unbiased, unpredictable row permutations
//! - [`surrogate`] - Version 4 surrogate identifiers
//! - [`extract`] - Schema-driven fragment extraction
//! - [`format`] - Delimiter and line terminator of output artifacts
//! - [`writer`] - Rendering and committing one fragment store
//! - [`orchestrator`] - Concurrent fan-out over all fragment kinds
//! - [`mapping`] - Identity map assembly and persistence
//! - [`summary`] - Run summary
//!
//! # Factoring Workflow
//!
//! 1. **Load**: build a validated [`RecordTable`](crate::domain::RecordTable)
//! 2. **Render**: one writer per fragment kind shuffles the table, extracts
//!    fragments and assigns surrogate ids, all in memory
//! 3. **Commit**: rendered stores are written to their sinks
//! 4. **Assemble**: the identity map joins every writer's assignments
//! 5. **Persist** (optional): the identity map is written out
//!
//! # Example
//!
//! ```rust
//! use idfactor::core::orchestrator::Factorer;
//! use idfactor::domain::RecordTable;
//! use idfactor::schema::RecordSchema;
//! use std::sync::Arc;
//!
//! # async fn example() -> idfactor::domain::Result<()> {
//! let schema = RecordSchema::plain();
//! let specs = schema.fragments().to_vec();
//! let mut row = vec![""; 14];
//! row[0] = "1";
//! row[6] = "111-22-3333";
//! let table = Arc::new(RecordTable::from_rows(schema, vec![row])?);
//!
//! let sinks = vec![Vec::<u8>::new(); specs.len()];
//! let factored = Factorer::default().factor(table, &specs, sinks).await?;
//! assert_eq!(factored.identity_map.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod entropy;
pub mod extract;
pub mod format;
pub mod mapping;
pub mod orchestrator;
pub mod shuffle;
pub mod summary;
pub mod surrogate;
pub mod writer;
