//! Record schemas and fragment kinds
//!
//! A [`RecordSchema`] declares the positional field layout of an identity
//! record variant and the [`FragmentSpec`]s that partition it. Two variants are
//! built in:
//!
//! - **plain**: `record_id` followed by name, dob, ssn, address, phone and
//!   email fields (14 fields)
//! - **compromised**: the same with a `breach_id` after the record id
//!   (15 fields); every fragment row then starts with the breach id
//!
//! # Example
//!
//! ```
//! use idfactor::schema::RecordSchema;
//!
//! let schema = RecordSchema::plain();
//! assert_eq!(schema.record_length(), 14);
//!
//! let selected = schema.select(&["ssn", "email"]).unwrap();
//! assert_eq!(selected[0].header(), vec!["ssn_id", "ssn"]);
//! ```

pub mod fragment;
mod standard;

pub use fragment::{ColumnSource, FragmentColumn, FragmentSpec, BREACH_ID_COLUMN};

use crate::domain::{IdFactorError, Result, RECORD_ID_FIELD};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Identity record layout variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// Identity record without breach information
    #[default]
    Plain,
    /// Identity record carrying the breach it was exposed in
    Compromised,
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVariant::Plain => write!(f, "plain"),
            SchemaVariant::Compromised => write!(f, "compromised"),
        }
    }
}

impl FromStr for SchemaVariant {
    type Err = IdFactorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "plain" | "atrisk" | "at_risk" => Ok(SchemaVariant::Plain),
            "compromised" => Ok(SchemaVariant::Compromised),
            _ => Err(IdFactorError::Configuration(format!(
                "Invalid schema variant '{s}'. Must be one of: plain, compromised"
            ))),
        }
    }
}

/// Field layout and fragment kinds for one record variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    variant: SchemaVariant,
    fields: Vec<String>,
    fragments: Vec<FragmentSpec>,
}

impl RecordSchema {
    /// Builds a schema from explicit fields and fragment specs
    ///
    /// # Errors
    ///
    /// Returns [`IdFactorError::Validation`] if there are no fields, a fragment
    /// kind is declared twice, a fragment has no source field, or a fragment
    /// reads past the end of the record.
    pub fn new(
        variant: SchemaVariant,
        fields: Vec<String>,
        fragments: Vec<FragmentSpec>,
    ) -> Result<Self> {
        if fields.is_empty() {
            return Err(IdFactorError::Validation(
                "schema must declare at least the record id field".to_string(),
            ));
        }

        let mut kinds = HashSet::new();
        for spec in &fragments {
            if !kinds.insert(spec.kind()) {
                return Err(IdFactorError::Validation(format!(
                    "fragment kind '{}' declared more than once",
                    spec.kind()
                )));
            }
            if spec.source_fields().next().is_none() {
                return Err(IdFactorError::Validation(format!(
                    "fragment kind '{}' has no source fields",
                    spec.kind()
                )));
            }
            if let Some(max) = spec.max_position() {
                if max >= fields.len() {
                    return Err(IdFactorError::Validation(format!(
                        "fragment kind '{}' reads field {} but records have {} fields",
                        spec.kind(),
                        max,
                        fields.len()
                    )));
                }
            }
        }

        Ok(Self {
            variant,
            fields,
            fragments,
        })
    }

    /// The plain identity record schema
    pub fn plain() -> Self {
        Self::standard(SchemaVariant::Plain)
    }

    /// The compromised identity record schema
    pub fn compromised() -> Self {
        Self::standard(SchemaVariant::Compromised)
    }

    /// The built-in schema for `variant`
    pub fn for_variant(variant: SchemaVariant) -> Self {
        Self::standard(variant)
    }

    fn standard(variant: SchemaVariant) -> Self {
        let fields = standard::field_names(variant == SchemaVariant::Compromised);
        let fragments = standard::fragment_specs(&fields);
        Self {
            variant,
            fields,
            fragments,
        }
    }

    /// Layout variant
    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    /// Number of fields every record must have
    pub fn record_length(&self) -> usize {
        self.fields.len()
    }

    /// Ordered field names
    pub fn field_names(&self) -> &[String] {
        &self.fields
    }

    /// Position of the named field
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    /// Name of the record id column
    pub fn record_id_column(&self) -> &str {
        &self.fields[RECORD_ID_FIELD]
    }

    /// All fragment kinds, in their fixed order
    pub fn fragments(&self) -> &[FragmentSpec] {
        &self.fragments
    }

    /// Looks up a fragment kind by name
    pub fn fragment(&self, kind: &str) -> Option<&FragmentSpec> {
        self.fragments.iter().find(|f| f.kind() == kind)
    }

    /// Selects fragment kinds by name, keeping the schema's fixed order
    ///
    /// An empty selection means every kind.
    ///
    /// # Errors
    ///
    /// Returns [`IdFactorError::UnknownFragmentKind`] for a name the schema
    /// does not declare.
    pub fn select<S: AsRef<str>>(&self, kinds: &[S]) -> Result<Vec<FragmentSpec>> {
        if kinds.is_empty() {
            return Ok(self.fragments.clone());
        }

        for kind in kinds {
            if self.fragment(kind.as_ref()).is_none() {
                return Err(IdFactorError::UnknownFragmentKind(kind.as_ref().to_string()));
            }
        }

        Ok(self
            .fragments
            .iter()
            .filter(|f| kinds.iter().any(|k| k.as_ref() == f.kind()))
            .cloned()
            .collect())
    }
}
