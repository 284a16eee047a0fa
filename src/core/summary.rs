//! Run summary and reporting
//!
//! Counts only: a summary never carries field values or record ids.

use crate::core::mapping::IdentityMap;
use crate::domain::{IdFactorError, Result};
use crate::schema::{FragmentSpec, SchemaVariant};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Per-kind fragment counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentCount {
    /// Fragment kind
    pub kind: String,

    /// Data rows written to the store
    pub written: usize,

    /// Records whose fragment was suppressed
    pub suppressed: usize,
}

/// Summary of a factoring run
#[derive(Debug, Clone, Serialize)]
pub struct FactorSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Record layout of the input
    pub variant: SchemaVariant,

    /// Records read from the input
    pub records: usize,

    /// Counts per fragment kind, in output order
    pub fragments: Vec<FragmentCount>,

    /// Whether the identity map was written
    pub map_written: bool,

    /// Whether the run rendered without writing anything
    pub dry_run: bool,

    /// Wall-clock duration of the run
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

impl FactorSummary {
    /// Builds a summary from the identity map of a run
    pub fn from_map(
        started_at: DateTime<Utc>,
        variant: SchemaVariant,
        specs: &[FragmentSpec],
        map: &IdentityMap,
    ) -> Self {
        let fragments = specs
            .iter()
            .enumerate()
            .map(|(column, spec)| {
                let written = map.emitted(column);
                FragmentCount {
                    kind: spec.kind().to_string(),
                    written,
                    suppressed: map.len() - written,
                }
            })
            .collect();

        Self {
            started_at,
            variant,
            records: map.len(),
            fragments,
            map_written: false,
            dry_run: false,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Mark whether the identity map was persisted
    pub fn with_map_written(mut self, written: bool) -> Self {
        self.map_written = written;
        self
    }

    /// Mark the run as a dry run
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Total data rows across all stores
    pub fn total_written(&self) -> usize {
        self.fragments.iter().map(|f| f.written).sum()
    }

    /// Serializes the summary as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| IdFactorError::Io(format!("failed to serialize summary: {e}")))
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            variant = %self.variant,
            records = self.records,
            fragments = self.fragments.len(),
            total_written = self.total_written(),
            map_written = self.map_written,
            dry_run = self.dry_run,
            duration_ms = self.duration.as_millis() as u64,
            "Run completed"
        );

        for fragment in &self.fragments {
            tracing::info!(
                kind = %fragment.kind,
                written = fragment.written,
                suppressed = fragment.suppressed,
                "Fragment summary"
            );
        }
    }
}

fn as_millis<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::writer::FragmentWriter;
    use crate::domain::RecordTable;
    use crate::schema::RecordSchema;

    fn summary() -> FactorSummary {
        let mut first = vec![String::new(); 14];
        first[0] = "1".to_string();
        first[12] = "555-0100".to_string();
        let mut second = vec![String::new(); 14];
        second[0] = "2".to_string();
        let table = RecordTable::from_rows(RecordSchema::plain(), vec![first, second]).unwrap();
        let specs = table.schema().select(&["phone", "email"]).unwrap();
        let writer = FragmentWriter::default();
        let assignments: Vec<_> = specs
            .iter()
            .map(|s| writer.render(&table, s).unwrap().into_assignments())
            .collect();
        let map = IdentityMap::assemble(&table, &specs, &assignments).unwrap();
        FactorSummary::from_map(Utc::now(), SchemaVariant::Plain, &specs, &map)
    }

    #[test]
    fn test_counts_per_kind() {
        let summary = summary();
        assert_eq!(summary.records, 2);
        assert_eq!(
            summary.fragments,
            vec![
                FragmentCount {
                    kind: "phone".to_string(),
                    written: 1,
                    suppressed: 1
                },
                FragmentCount {
                    kind: "email".to_string(),
                    written: 0,
                    suppressed: 2
                },
            ]
        );
        assert_eq!(summary.total_written(), 1);
    }

    #[test]
    fn test_json_shape() {
        let summary = summary()
            .with_duration(Duration::from_millis(1500))
            .with_dry_run(true);
        let value: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(value["duration_ms"], 1500);
        assert_eq!(value["variant"], "plain");
        assert_eq!(value["dry_run"], true);
        assert_eq!(value["map_written"], false);
        assert_eq!(value["fragments"][0]["kind"], "phone");
        assert!(value["started_at"].is_string());
    }
}
