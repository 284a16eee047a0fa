//! Delimited text input
//!
//! Reads identity records from a delimited text source (one record per line,
//! single-byte delimiter, RFC 4180 quoting) into a validated
//! [`RecordTable`].

use crate::core::format::delimiter_byte;
use crate::domain::{IdentityRecord, RecordTable, Result};
use crate::schema::RecordSchema;
use std::io::Read;

/// How an input source is laid out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFormat {
    /// Field delimiter
    pub delimiter: char,

    /// Whether the first line is a header row to skip
    pub has_header: bool,
}

impl Default for InputFormat {
    fn default() -> Self {
        Self {
            delimiter: '|',
            has_header: true,
        }
    }
}

/// Reads every record from `reader` and validates it against `schema`
///
/// The header row, when present, is discarded without being checked.
///
/// # Errors
///
/// - [`IdFactorError::Configuration`](crate::domain::IdFactorError::Configuration)
///   for an unusable delimiter
/// - [`IdFactorError::Input`](crate::domain::IdFactorError::Input) for
///   unreadable or malformed text
/// - [`IdFactorError::SchemaViolation`](crate::domain::IdFactorError::SchemaViolation)
///   for a record with the wrong number of fields
/// - [`IdFactorError::DuplicateRecordId`](crate::domain::IdFactorError::DuplicateRecordId)
///   when two records share an id
///
/// # Examples
///
/// ```
/// use idfactor::adapters::delimited::{read_records, InputFormat};
/// use idfactor::schema::RecordSchema;
///
/// let header = "id|first|last|mi|sfx|dob|ssn|a1|a2|city|st|zip|phone|email\n";
/// let text = format!("{header}1|Ann|Lee||||||||||555-0100|\n");
/// let table = read_records(text.as_bytes(), &InputFormat::default(), RecordSchema::plain()).unwrap();
/// assert_eq!(table.len(), 1);
/// ```
pub fn read_records<R: Read>(
    reader: R,
    format: &InputFormat,
    schema: RecordSchema,
) -> Result<RecordTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte(format.delimiter)?)
        .has_headers(format.has_header)
        // Field counts are checked against the schema, which knows the record id.
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        records.push(row.iter().collect::<IdentityRecord>());
    }

    tracing::debug!(
        records = records.len(),
        variant = %schema.variant(),
        "Read input records"
    );

    RecordTable::new(schema, records)
}
