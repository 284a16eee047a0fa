//! Fragment extraction
//!
//! [`extract`] is the single, schema-parameterized routine that turns one
//! record into one fragment of a given kind. It is pure: it keeps no state and
//! does not depend on call order, so each fragment kind can walk the table in
//! its own shuffled order.

use crate::domain::{IdFactorError, IdentityRecord, Result, SurrogateId};
use crate::schema::{ColumnSource, FragmentSpec};

/// The subset of one record's fields belonging to one fragment kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment<'a> {
    surrogate_id: SurrogateId,
    breach_id: Option<&'a str>,
    values: Vec<&'a str>,
}

impl<'a> Fragment<'a> {
    /// Surrogate id standing in for the record id
    pub fn surrogate_id(&self) -> SurrogateId {
        self.surrogate_id
    }

    /// Breach id, for compromised schemas
    pub fn breach_id(&self) -> Option<&'a str> {
        self.breach_id
    }

    /// Column values in the fragment spec's declared order
    pub fn values(&self) -> &[&'a str] {
        &self.values
    }

    /// Full output row: `[breach_id,] surrogate_id, values...`
    pub fn to_row(&self) -> Vec<String> {
        self.breach_id
            .into_iter()
            .map(str::to_string)
            .chain(std::iter::once(self.surrogate_id.to_string()))
            .chain(self.values.iter().map(|v| v.to_string()))
            .collect()
    }
}

/// Extracts the fragment described by `spec` from `record`
///
/// Returns `Ok(None)` (suppressed) when every source field of the fragment spec is
/// empty. Blank padding columns never count towards suppression.
///
/// # Errors
///
/// Returns [`IdFactorError::SchemaViolation`] if the record does not have
/// exactly `record_length` fields; a truncated row must never yield a partial
/// fragment.
///
/// # Examples
///
/// ```
/// use idfactor::core::extract::extract;
/// use idfactor::domain::{IdentityRecord, SurrogateId};
/// use idfactor::schema::RecordSchema;
///
/// let schema = RecordSchema::plain();
/// let ssn = schema.fragment("ssn").unwrap();
/// let mut fields = vec![""; 14];
/// fields[0] = "1";
/// let record: IdentityRecord = fields.into_iter().collect();
///
/// let id = SurrogateId::from_random_bytes([7; 16]);
/// assert!(extract(&record, schema.record_length(), ssn, id).unwrap().is_none());
/// ```
pub fn extract<'a>(
    record: &'a IdentityRecord,
    record_length: usize,
    spec: &FragmentSpec,
    surrogate_id: SurrogateId,
) -> Result<Option<Fragment<'a>>> {
    if record.len() != record_length {
        return Err(IdFactorError::SchemaViolation {
            record_id: record.id().to_string(),
            expected: record_length,
            actual: record.len(),
        });
    }

    let value_at = move |position: usize| record.field(position).unwrap_or("");

    if spec.source_fields().all(|position| value_at(position).is_empty()) {
        return Ok(None);
    }

    let values = spec
        .columns()
        .iter()
        .map(|column| match column.source() {
            ColumnSource::Field(position) => value_at(position),
            ColumnSource::Blank => "",
        })
        .collect();

    Ok(Some(Fragment {
        surrogate_id,
        breach_id: spec.breach_id().map(value_at),
        values,
    }))
}
