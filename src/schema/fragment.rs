//! Fragment specifications
//!
//! A [`FragmentSpec`] is plain data: the kind name, the surrogate id column, an
//! optional breach id column and the ordered list of columns it draws from the
//! record. One shared extraction routine interprets every spec.

use serde::Serialize;

/// Header name of the breach identifier column in compromised stores
pub const BREACH_ID_COLUMN: &str = "breach_id";

/// Where a fragment column's value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSource {
    /// Copied from the record field at this position
    Field(usize),
    /// Always written empty (e.g. `zip4`, which the input never carries)
    Blank,
}

/// One output column of a fragment store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentColumn {
    name: String,
    source: ColumnSource,
}

impl FragmentColumn {
    /// Column copied from the record field at `position`
    pub fn field(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            source: ColumnSource::Field(position),
        }
    }

    /// Column that is always empty
    pub fn blank(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: ColumnSource::Blank,
        }
    }

    /// Header name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value source
    pub fn source(&self) -> ColumnSource {
        self.source
    }
}

/// Declares one fragment kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentSpec {
    kind: String,
    id_column: String,
    breach_id: Option<usize>,
    columns: Vec<FragmentColumn>,
}

impl FragmentSpec {
    /// Creates a spec without a breach id column
    pub fn new(
        kind: impl Into<String>,
        id_column: impl Into<String>,
        columns: Vec<FragmentColumn>,
    ) -> Self {
        Self {
            kind: kind.into(),
            id_column: id_column.into(),
            breach_id: None,
            columns,
        }
    }

    /// Prepends the breach id (read from record field `position`) to every row
    pub fn with_breach_id(mut self, position: usize) -> Self {
        self.breach_id = Some(position);
        self
    }

    /// Fragment kind name (e.g. `name_dob`)
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Name of the surrogate id column, also used as the identity map column
    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    /// Record position of the breach id, for compromised schemas
    pub fn breach_id(&self) -> Option<usize> {
        self.breach_id
    }

    /// Ordered data columns
    pub fn columns(&self) -> &[FragmentColumn] {
        &self.columns
    }

    /// Record positions that decide suppression, in column order
    pub fn source_fields(&self) -> impl Iterator<Item = usize> + '_ {
        self.columns.iter().filter_map(|c| match c.source {
            ColumnSource::Field(position) => Some(position),
            ColumnSource::Blank => None,
        })
    }

    /// Output header: `[breach_id,] <id_column>, <columns...>`
    pub fn header(&self) -> Vec<&str> {
        let mut header = Vec::with_capacity(self.columns.len() + 2);
        if self.breach_id.is_some() {
            header.push(BREACH_ID_COLUMN);
        }
        header.push(self.id_column.as_str());
        header.extend(self.columns.iter().map(FragmentColumn::name));
        header
    }

    /// File name for this kind's store
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}_elements.{}", self.kind, extension)
    }

    /// Highest record position the fragment spec reads, if any
    pub(crate) fn max_position(&self) -> Option<usize> {
        self.source_fields().chain(self.breach_id).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address_spec() -> FragmentSpec {
        FragmentSpec::new(
            "address",
            "address_id",
            vec![
                FragmentColumn::field("address_line_1", 7),
                FragmentColumn::field("city", 9),
                FragmentColumn::blank("zip4"),
            ],
        )
    }

    #[test]
    fn test_header_without_breach() {
        assert_eq!(
            address_spec().header(),
            vec!["address_id", "address_line_1", "city", "zip4"]
        );
    }

    #[test]
    fn test_header_with_breach() {
        let spec = address_spec().with_breach_id(1);
        assert_eq!(spec.header()[0], "breach_id");
        assert_eq!(spec.header()[1], "address_id");
        assert_eq!(spec.max_position(), Some(9));
    }

    #[test]
    fn test_source_fields_skip_blanks() {
        let fields: Vec<usize> = address_spec().source_fields().collect();
        assert_eq!(fields, vec![7, 9]);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(address_spec().file_name("psv"), "address_elements.psv");
    }
}
