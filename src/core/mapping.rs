//! Identity map assembly and persistence
//!
//! The identity map is the only artifact that links fragments back to the
//! records they came from: one row per input record, in input order, holding
//! the surrogate id each fragment kind assigned (or an empty marker when the
//! fragment was suppressed). Anyone holding it can rejoin every store, so it
//! is written only when explicitly requested.

use crate::core::format::DelimitedFormat;
use crate::core::writer::Assignments;
use crate::domain::{IdFactorError, RecordTable, Result, SurrogateId, RECORD_ID_FIELD};
use crate::schema::FragmentSpec;
use std::io::Write;

/// Sink name used in errors raised while persisting the map
pub const IDENTITY_MAP_SINK: &str = "identity_map";

/// One identity map row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry {
    record_id: String,
    surrogate_ids: Vec<Option<SurrogateId>>,
}

impl MapEntry {
    /// The original record id
    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    /// Surrogate ids in map column order; `None` for suppressed fragments
    pub fn surrogate_ids(&self) -> &[Option<SurrogateId>] {
        &self.surrogate_ids
    }
}

/// Record id to surrogate id mapping for every fragment kind of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityMap {
    record_id_column: String,
    columns: Vec<String>,
    entries: Vec<MapEntry>,
}

impl IdentityMap {
    /// Joins writer assignments into a map
    ///
    /// `assignments` must line up one-to-one with `specs`, and each must cover
    /// every row of `table`.
    ///
    /// # Errors
    ///
    /// Returns [`IdFactorError::Validation`] if the inputs do not line up.
    pub fn assemble(
        table: &RecordTable,
        specs: &[FragmentSpec],
        assignments: &[Assignments],
    ) -> Result<Self> {
        if specs.len() != assignments.len() {
            return Err(IdFactorError::Validation(format!(
                "{} fragment specs but {} assignment sets",
                specs.len(),
                assignments.len()
            )));
        }
        for (spec, set) in specs.iter().zip(assignments) {
            if spec.kind() != set.kind() || set.len() != table.len() {
                return Err(IdFactorError::Validation(format!(
                    "assignments for '{}' do not match fragment '{}' over {} records",
                    set.kind(),
                    spec.kind(),
                    table.len()
                )));
            }
        }

        let entries = table
            .records()
            .iter()
            .enumerate()
            .map(|(row, record)| MapEntry {
                record_id: record.id().to_string(),
                surrogate_ids: assignments.iter().map(|set| set.get(row)).collect(),
            })
            .collect();

        let record_id_column = table
            .schema()
            .field_names()
            .get(RECORD_ID_FIELD)
            .cloned()
            .unwrap_or_default();

        Ok(Self {
            record_id_column,
            columns: specs.iter().map(|s| s.id_column().to_string()).collect(),
            entries,
        })
    }

    /// Surrogate id column names, one per fragment kind
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Header row: record id column followed by the surrogate id columns
    pub fn header(&self) -> Vec<&str> {
        std::iter::once(self.record_id_column.as_str())
            .chain(self.columns.iter().map(String::as_str))
            .collect()
    }

    /// Entries in input order
    pub fn entries(&self) -> &[MapEntry] {
        &self.entries
    }

    /// Entry for `record_id`, if present
    pub fn entry(&self, record_id: &str) -> Option<&MapEntry> {
        self.entries.iter().find(|e| e.record_id == record_id)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of emitted fragments in the given column
    pub fn emitted(&self, column: usize) -> usize {
        self.entries
            .iter()
            .filter(|e| e.surrogate_ids.get(column).copied().flatten().is_some())
            .count()
    }
}

/// Serializes `map` to `sink`: header then one row per entry
///
/// # Errors
///
/// Returns [`IdFactorError::SinkFailure`] with kind `identity_map` if any write
/// or the final flush fails.
pub fn persist<W: Write>(map: &IdentityMap, sink: W, format: &DelimitedFormat) -> Result<()> {
    let sink_error = |e: csv::Error| IdFactorError::sink(IDENTITY_MAP_SINK, e);
    let mut wtr = format.writer(sink);

    wtr.write_record(map.header()).map_err(sink_error)?;
    for entry in map.entries() {
        let ids = entry
            .surrogate_ids
            .iter()
            .map(|id| id.map(|id| id.to_string()).unwrap_or_default());
        let row: Vec<String> = std::iter::once(entry.record_id.clone()).chain(ids).collect();
        wtr.write_record(&row).map_err(sink_error)?;
    }
    wtr.flush()
        .map_err(|e| IdFactorError::sink(IDENTITY_MAP_SINK, e))?;

    tracing::debug!(entries = map.len(), "Persisted identity map");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::format::LineTerminator;
    use crate::core::writer::FragmentWriter;
    use crate::schema::RecordSchema;

    fn small_table() -> RecordTable {
        let mut first = vec![String::new(); 14];
        first[0] = "1".to_string();
        first[6] = "111-22-3333".to_string();
        first[13] = "a@x".to_string();
        let mut second = vec![String::new(); 14];
        second[0] = "2".to_string();
        second[13] = "b@x".to_string();
        RecordTable::from_rows(RecordSchema::plain(), vec![first, second]).unwrap()
    }

    fn assembled() -> (RecordTable, IdentityMap) {
        let table = small_table();
        let specs = table.schema().select(&["ssn", "email"]).unwrap();
        let writer = FragmentWriter::default();
        let assignments: Vec<_> = specs
            .iter()
            .map(|spec| writer.render(&table, spec).unwrap().into_assignments())
            .collect();
        let map = IdentityMap::assemble(&table, &specs, &assignments).unwrap();
        (table, map)
    }

    #[test]
    fn test_assemble_keeps_input_order() {
        let (_, map) = assembled();
        let ids: Vec<_> = map.entries().iter().map(MapEntry::record_id).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(map.header(), vec!["record_id", "ssn_id", "email_id"]);
    }

    #[test]
    fn test_suppressed_fragment_is_absent() {
        let (_, map) = assembled();
        let second = map.entry("2").unwrap();
        assert!(second.surrogate_ids()[0].is_none());
        assert!(second.surrogate_ids()[1].is_some());
        assert_eq!(map.emitted(0), 1);
        assert_eq!(map.emitted(1), 2);
    }

    #[test]
    fn test_mismatched_assignments_rejected() {
        let table = small_table();
        let specs = table.schema().select(&["ssn", "email"]).unwrap();
        let err = IdentityMap::assemble(&table, &specs, &[]).unwrap_err();
        assert!(matches!(err, IdFactorError::Validation(_)));
    }

    #[test]
    fn test_persist_writes_empty_marker() {
        let (_, map) = assembled();
        let format = DelimitedFormat::new('|', LineTerminator::Lf).unwrap();
        let mut out = Vec::new();
        persist(&map, &mut out, &format).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "record_id|ssn_id|email_id");

        let second: Vec<&str> = lines[2].split('|').collect();
        assert_eq!(second[0], "2");
        assert_eq!(second[1], "");
        assert_eq!(second[2], map.entry("2").unwrap().surrogate_ids()[1].unwrap().to_string());
    }

    #[test]
    fn test_persist_failure_names_identity_map() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "read-only"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "read-only"))
            }
        }

        let (_, map) = assembled();
        let err = persist(&map, Broken, &DelimitedFormat::default()).unwrap_err();
        assert!(
            matches!(err, IdFactorError::SinkFailure { ref kind, .. } if kind == IDENTITY_MAP_SINK)
        );
    }
}
