//! Fragment writer
//!
//! Produces one fragment store: a header row, then one row per
//! non-suppressed record in a freshly shuffled order, each under a fresh
//! surrogate id. Rendering goes to an in-memory buffer first so that a
//! failure anywhere in a run leaves every sink untouched; the caller commits
//! the buffer once all stores have rendered.

use crate::core::entropy::SecureRng;
use crate::core::extract::extract;
use crate::core::format::DelimitedFormat;
use crate::core::shuffle::shuffle_with;
use crate::core::surrogate::new_id_with;
use crate::domain::{IdFactorError, RecordTable, Result, SurrogateId};
use crate::schema::FragmentSpec;
use rand::{CryptoRng, RngCore};
use std::io::Write;
use std::sync::Arc;

/// Surrogate ids assigned by one writer, indexed by input row
///
/// `None` marks a suppressed fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignments {
    kind: String,
    ids: Vec<Option<SurrogateId>>,
}

impl Assignments {
    /// Fragment kind the ids belong to
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Surrogate id assigned to the record at input position `row`
    pub fn get(&self, row: usize) -> Option<SurrogateId> {
        self.ids.get(row).copied().flatten()
    }

    /// Number of input rows covered
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no rows are covered
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of emitted (non-suppressed) fragments
    pub fn emitted(&self) -> usize {
        self.ids.iter().filter(|id| id.is_some()).count()
    }

    /// `(record id, surrogate id)` pairs for emitted fragments, in input order
    pub fn iter<'t>(
        &'t self,
        table: &'t RecordTable,
    ) -> impl Iterator<Item = (&'t str, SurrogateId)> + 't {
        table
            .records()
            .iter()
            .zip(&self.ids)
            .filter_map(|(record, id)| id.map(|id| (record.id(), id)))
    }
}

/// A fully rendered fragment store waiting to be committed
#[derive(Debug, Clone)]
pub struct RenderedStore {
    kind: String,
    bytes: Arc<[u8]>,
    assignments: Assignments,
}

impl RenderedStore {
    /// Fragment kind
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Serialized store, header included
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..]
    }

    /// Surrogate id assignments made while rendering
    pub fn assignments(&self) -> &Assignments {
        &self.assignments
    }

    /// Data rows written, header excluded
    pub fn rows_written(&self) -> usize {
        self.assignments.emitted()
    }

    /// Records whose fragment was suppressed
    pub fn rows_suppressed(&self) -> usize {
        self.assignments.len() - self.assignments.emitted()
    }

    /// Writes the buffer to `sink` and flushes it
    ///
    /// # Errors
    ///
    /// Returns [`IdFactorError::SinkFailure`] if the write or the flush fails.
    pub fn commit<W: Write>(&self, sink: &mut W) -> Result<()> {
        sink.write_all(&self.bytes)
            .and_then(|()| sink.flush())
            .map_err(|e| IdFactorError::sink(&self.kind, e))
    }

    /// Consumes the store, keeping only the assignments
    pub fn into_assignments(self) -> Assignments {
        self.assignments
    }
}

/// Renders fragment stores in a given delimited format
#[derive(Debug, Clone, Copy, Default)]
pub struct FragmentWriter {
    format: DelimitedFormat,
}

impl FragmentWriter {
    /// Creates a writer for the given output format
    pub fn new(format: DelimitedFormat) -> Self {
        Self { format }
    }

    /// Output format
    pub fn format(&self) -> DelimitedFormat {
        self.format
    }

    /// Renders the store for `spec` using OS entropy
    ///
    /// # Errors
    ///
    /// - [`IdFactorError::InvalidShuffleSize`] for an empty table
    /// - [`IdFactorError::RandomSourceFailure`] if entropy cannot be read
    /// - [`IdFactorError::SchemaViolation`] for a record of the wrong length
    /// - [`IdFactorError::SinkFailure`] if serialization fails
    pub fn render(&self, table: &RecordTable, spec: &FragmentSpec) -> Result<RenderedStore> {
        self.render_with_rng(table, spec, &mut SecureRng::os())
    }

    /// Renders the store for `spec` drawing from `rng`
    pub fn render_with_rng<R: RngCore + CryptoRng>(
        &self,
        table: &RecordTable,
        spec: &FragmentSpec,
        rng: &mut SecureRng<R>,
    ) -> Result<RenderedStore> {
        let kind = spec.kind();
        let record_length = table.schema().record_length();
        let order = shuffle_with(table.len(), rng)?;

        let mut wtr = self.format.writer(Vec::new());
        wtr.write_record(spec.header())
            .map_err(|e| IdFactorError::sink(kind, e))?;

        let mut ids = vec![None; table.len()];
        for index in order {
            let surrogate_id = new_id_with(rng)?;
            if let Some(fragment) = extract(&table[index], record_length, spec, surrogate_id)? {
                wtr.write_record(fragment.to_row())
                    .map_err(|e| IdFactorError::sink(kind, e))?;
                ids[index] = Some(surrogate_id);
            }
        }

        let bytes = wtr
            .into_inner()
            .map_err(|e| IdFactorError::sink(kind, e.error()))?;

        let assignments = Assignments {
            kind: kind.to_string(),
            ids,
        };

        tracing::debug!(
            kind = kind,
            written = assignments.emitted(),
            suppressed = assignments.len() - assignments.emitted(),
            "Rendered fragment store"
        );

        Ok(RenderedStore {
            kind: kind.to_string(),
            bytes: bytes.into(),
            assignments,
        })
    }

    /// Renders the store for `spec` and writes it to `sink`
    ///
    /// Nothing reaches `sink` unless rendering succeeds completely.
    ///
    /// # Examples
    ///
    /// ```
    /// use idfactor::core::format::{DelimitedFormat, LineTerminator};
    /// use idfactor::core::writer::FragmentWriter;
    /// use idfactor::domain::RecordTable;
    /// use idfactor::schema::RecordSchema;
    ///
    /// let schema = RecordSchema::plain();
    /// let spec = schema.fragment("email").unwrap().clone();
    /// let mut row = vec![""; 14];
    /// row[0] = "1";
    /// row[13] = "ann@example.com";
    /// let table = RecordTable::from_rows(schema, vec![row]).unwrap();
    ///
    /// let format = DelimitedFormat::new('|', LineTerminator::Lf).unwrap();
    /// let mut out = Vec::new();
    /// let assignments = FragmentWriter::new(format).write(&table, &spec, &mut out).unwrap();
    ///
    /// let text = String::from_utf8(out).unwrap();
    /// let id = assignments.get(0).unwrap();
    /// assert_eq!(text, format!("email_id|email\n{id}|ann@example.com\n"));
    /// ```
    pub fn write<W: Write>(
        &self,
        table: &RecordTable,
        spec: &FragmentSpec,
        sink: &mut W,
    ) -> Result<Assignments> {
        let store = self.render(table, spec)?;
        store.commit(sink)?;
        Ok(store.into_assignments())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entropy::testing::ExhaustedSource;
    use crate::core::format::LineTerminator;
    use crate::schema::RecordSchema;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::io;

    fn lf_writer() -> FragmentWriter {
        FragmentWriter::new(DelimitedFormat::new('|', LineTerminator::Lf).unwrap())
    }

    fn table(rows: &[&[(&str, &str)]]) -> RecordTable {
        let schema = RecordSchema::plain();
        let records: Vec<Vec<String>> = rows
            .iter()
            .enumerate()
            .map(|(i, fields)| {
                let mut values = vec![String::new(); schema.record_length()];
                values[0] = (i + 1).to_string();
                for (name, value) in fields.iter() {
                    values[schema.position(name).unwrap()] = value.to_string();
                }
                values
            })
            .collect();
        RecordTable::from_rows(schema, records).unwrap()
    }

    fn lines(bytes: &[u8]) -> Vec<String> {
        String::from_utf8(bytes.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_header_then_only_non_suppressed_rows() {
        let table = table(&[
            &[("ssn", "111-22-3333")],
            &[("email", "x@y.z")],
            &[("ssn", "444-55-6666")],
        ]);
        let spec = table.schema().fragment("ssn").unwrap().clone();
        let store = lf_writer().render(&table, &spec).unwrap();

        let lines = lines(store.bytes());
        assert_eq!(lines[0], "ssn_id|ssn");
        assert_eq!(lines.len(), 3);
        assert_eq!(store.rows_written(), 2);
        assert_eq!(store.rows_suppressed(), 1);

        let values: HashSet<&str> = lines[1..]
            .iter()
            .map(|l| l.split('|').nth(1).unwrap())
            .collect();
        assert_eq!(values, HashSet::from(["111-22-3333", "444-55-6666"]));
    }

    #[test]
    fn test_assignments_match_rows() {
        let table = table(&[&[("phone", "555-0001")], &[("phone", "555-0002")], &[]]);
        let spec = table.schema().fragment("phone").unwrap().clone();
        let store = lf_writer().render(&table, &spec).unwrap();

        let assignments = store.assignments();
        assert_eq!(assignments.kind(), "phone");
        assert_eq!(assignments.len(), 3);
        assert!(assignments.get(2).is_none());

        let text = String::from_utf8(store.bytes().to_vec()).unwrap();
        for (record_id, surrogate_id) in assignments.iter(&table) {
            let expected = if record_id == "1" { "555-0001" } else { "555-0002" };
            assert!(text.contains(&format!("{surrogate_id}|{expected}\n")));
        }
        assert_eq!(assignments.iter(&table).count(), 2);
    }

    #[test]
    fn test_all_suppressed_gives_header_only() {
        let table = table(&[&[("ssn", "1")], &[("ssn", "2")]]);
        let spec = table.schema().fragment("email").unwrap().clone();
        let store = lf_writer().render(&table, &spec).unwrap();
        assert_eq!(store.bytes(), b"email_id|email\n");
        assert_eq!(store.rows_written(), 0);
    }

    #[test]
    fn test_empty_table_is_invalid_shuffle_size() {
        let table = RecordTable::new(RecordSchema::plain(), Vec::new()).unwrap();
        let spec = table.schema().fragment("ssn").unwrap().clone();
        let err = lf_writer().render(&table, &spec).unwrap_err();
        assert!(matches!(err, IdFactorError::InvalidShuffleSize(0)));
    }

    #[test]
    fn test_entropy_failure_is_fatal() {
        let table = table(&[&[("ssn", "1")], &[("ssn", "2")]]);
        let spec = table.schema().fragment("ssn").unwrap().clone();
        let mut rng = SecureRng::from_rng(ExhaustedSource);
        let err = lf_writer()
            .render_with_rng(&table, &spec, &mut rng)
            .unwrap_err();
        assert!(matches!(err, IdFactorError::RandomSourceFailure(_)));
    }

    #[test]
    fn test_seeded_render_is_reproducible() {
        let table = table(&[&[("email", "a@x")], &[("email", "b@x")], &[("email", "c@x")]]);
        let spec = table.schema().fragment("email").unwrap().clone();
        let render = |seed| {
            let mut rng = SecureRng::from_rng(StdRng::seed_from_u64(seed));
            lf_writer()
                .render_with_rng(&table, &spec, &mut rng)
                .unwrap()
                .bytes()
                .to_vec()
        };
        assert_eq!(render(7), render(7));
    }

    #[test]
    fn test_write_failure_is_sink_failure() {
        let table = table(&[&[("ssn", "1")]]);
        let spec = table.schema().fragment("ssn").unwrap().clone();
        let err = lf_writer()
            .write(&table, &spec, &mut FailingSink)
            .unwrap_err();
        assert!(matches!(err, IdFactorError::SinkFailure { ref kind, .. } if kind == "ssn"));
    }

    #[test]
    fn test_address_rows_carry_blank_zip4() {
        let table = table(&[&[("city", "Springfield"), ("zip", "62701")]]);
        let spec = table.schema().fragment("address").unwrap().clone();
        let store = lf_writer().render(&table, &spec).unwrap();
        let lines = lines(store.bytes());
        assert_eq!(
            lines[0],
            "address_id|address_line_1|address_line_2|city|state|zip|zip4"
        );
        assert!(lines[1].ends_with("|||Springfield||62701|"));
    }
}
