//! Identity records and the validated record table

use crate::domain::{IdFactorError, Result};
use crate::schema::RecordSchema;
use std::collections::HashSet;
use std::ops::Index;

/// Position of the record identifier in every schema variant
pub const RECORD_ID_FIELD: usize = 0;

/// One input row describing a single person's identity attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    fields: Vec<String>,
}

impl IdentityRecord {
    /// Wraps raw field values
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// The record's unique identifier (first field)
    pub fn id(&self) -> &str {
        self.fields
            .get(RECORD_ID_FIELD)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Field value at `position`, if present
    pub fn field(&self, position: usize) -> Option<&str> {
        self.fields.get(position).map(String::as_str)
    }

    /// Number of fields in the record
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for IdentityRecord {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Immutable table of identity records validated against a schema
///
/// Loaded once per run and never mutated; fragment writers share it
/// read-only.
#[derive(Debug, Clone)]
pub struct RecordTable {
    schema: RecordSchema,
    records: Vec<IdentityRecord>,
}

impl RecordTable {
    /// Builds a table, checking every record's field count and the
    /// uniqueness of record ids
    ///
    /// # Errors
    ///
    /// - [`IdFactorError::SchemaViolation`] for the first record whose length
    ///   differs from the schema's record length
    /// - [`IdFactorError::DuplicateRecordId`] when two records share an id
    pub fn new(schema: RecordSchema, records: Vec<IdentityRecord>) -> Result<Self> {
        validate_records(&schema, &records)?;
        Ok(Self { schema, records })
    }

    /// Convenience constructor from raw rows
    pub fn from_rows<R, S>(schema: RecordSchema, rows: R) -> Result<Self>
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let records = rows.into_iter().map(IdentityRecord::from_iter).collect();
        Self::new(schema, records)
    }

    /// The schema every record was validated against
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Records in input order
    pub fn records(&self) -> &[IdentityRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn validate_records(schema: &RecordSchema, records: &[IdentityRecord]) -> Result<()> {
    let expected = schema.record_length();
    let mut seen = HashSet::with_capacity(records.len());

    for record in records {
        if record.len() != expected {
            return Err(IdFactorError::SchemaViolation {
                record_id: record.id().to_string(),
                expected,
                actual: record.len(),
            });
        }
        if !seen.insert(record.id()) {
            return Err(IdFactorError::DuplicateRecordId {
                record_id: record.id().to_string(),
            });
        }
    }
    Ok(())
}

impl Index<usize> for RecordTable {
    type Output = IdentityRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}
