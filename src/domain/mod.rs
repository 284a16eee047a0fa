//! Domain models and types for idfactor.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Identity records** ([`IdentityRecord`], [`RecordTable`])
//! - **Strongly-typed identifiers** ([`SurrogateId`])
//! - **Error types** ([`IdFactorError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, IdFactorError>`]:
//!
//! ```rust
//! use idfactor::domain::{RecordTable, Result};
//! use idfactor::schema::RecordSchema;
//!
//! fn load() -> Result<RecordTable> {
//!     let rows: Vec<Vec<String>> = Vec::new();
//!     RecordTable::from_rows(RecordSchema::plain(), rows)
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::IdFactorError;
pub use ids::SurrogateId;
pub use record::{IdentityRecord, RecordTable, RECORD_ID_FIELD};
pub use result::Result;
