//! External I/O for idfactor.
//!
//! - [`delimited`] - Reading identity records from delimited text
//! - [`staging`] - Output files that appear only after a successful run
//!
//! The core engine only sees [`std::io::Read`] and [`std::io::Write`]; these
//! adapters connect it to files and standard streams.
//!
//! ```rust,no_run
//! use idfactor::adapters::delimited::{read_records, InputFormat};
//! use idfactor::adapters::staging::StagedFile;
//! use idfactor::schema::RecordSchema;
//! use std::fs::File;
//!
//! # fn example() -> idfactor::domain::Result<()> {
//! let table = read_records(File::open("ids.psv")?, &InputFormat::default(), RecordSchema::plain())?;
//! let staged = StagedFile::create("out/ssn_elements.psv")?;
//! # Ok(())
//! # }
//! ```

pub mod delimited;
pub mod staging;
