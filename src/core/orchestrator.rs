//! Factoring orchestrator
//!
//! Fans one fragment writer out per fragment kind, joins them and assembles
//! the identity map. A run is all or nothing:
//!
//! 1. **Render**: every store is rendered concurrently on the blocking pool.
//!    Any failure here (including a panicked task) ends the run before a
//!    single byte reaches a sink.
//! 2. **Commit**: each rendered store is written to its own sink,
//!    concurrently.
//! 3. **Assemble**: the identity map is built single-threaded, in input
//!    order, from the writers' assignments.
//!
//! The record table is shared read-only through an [`Arc`]; tasks share
//! nothing else.

use crate::core::mapping::IdentityMap;
use crate::core::writer::{Assignments, FragmentWriter, RenderedStore};
use crate::domain::{IdFactorError, RecordTable, Result};
use crate::schema::FragmentSpec;
use futures::future::try_join_all;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinError;

/// Outcome of a factoring run
#[derive(Debug)]
pub struct Factored<S> {
    /// Identity map of the run
    pub identity_map: IdentityMap,
    /// Sinks handed back in spec order, fully written and flushed
    pub sinks: Vec<S>,
}

/// Concurrent multi-fragment factoring
#[derive(Debug, Clone, Copy, Default)]
pub struct Factorer {
    writer: FragmentWriter,
}

impl Factorer {
    /// Creates an orchestrator around `writer`
    pub fn new(writer: FragmentWriter) -> Self {
        Self { writer }
    }

    /// Renders every spec's store concurrently
    ///
    /// Stores come back in the order of `specs`.
    ///
    /// # Errors
    ///
    /// Returns the first writer error, or [`IdFactorError::TaskFailure`] if a
    /// render task panicked or was cancelled.
    pub async fn render_all(
        &self,
        table: Arc<RecordTable>,
        specs: &[FragmentSpec],
    ) -> Result<Vec<RenderedStore>> {
        let tasks = specs.iter().cloned().map(|spec| {
            let table = Arc::clone(&table);
            let writer = self.writer;
            let kind = spec.kind().to_string();
            let handle = tokio::task::spawn_blocking(move || writer.render(&table, &spec));
            async move { handle.await.map_err(|e| task_failure(&kind, e))? }
        });

        try_join_all(tasks).await
    }

    /// Commits rendered stores to their sinks concurrently
    ///
    /// `stores` and `sinks` pair up by position. Sinks are returned in the
    /// same order.
    ///
    /// # Errors
    ///
    /// - [`IdFactorError::Validation`] if the counts differ
    /// - [`IdFactorError::SinkFailure`] if a write or flush fails
    /// - [`IdFactorError::TaskFailure`] if a commit task panicked
    pub async fn commit_all<S>(
        stores: &[RenderedStore],
        sinks: Vec<S>,
    ) -> Result<Vec<S>>
    where
        S: Write + Send + 'static,
    {
        check_sink_count(stores.len(), sinks.len())?;

        let tasks = stores.iter().zip(sinks).map(|(store, mut sink)| {
            // Cloning shares the rendered buffer; stores stay with the caller.
            let store = store.clone();
            let kind = store.kind().to_string();
            let handle = tokio::task::spawn_blocking(move || {
                store.commit(&mut sink)?;
                Ok::<_, IdFactorError>(sink)
            });
            async move { handle.await.map_err(|e| task_failure(&kind, e))? }
        });

        try_join_all(tasks).await
    }

    /// Factors `table` into one store per spec, writing each to the sink at
    /// the same position
    ///
    /// # Errors
    ///
    /// Any error aborts the whole run. Errors raised before the commit phase
    /// leave every sink untouched.
    pub async fn factor<S>(
        &self,
        table: Arc<RecordTable>,
        specs: &[FragmentSpec],
        sinks: Vec<S>,
    ) -> Result<Factored<S>>
    where
        S: Write + Send + 'static,
    {
        check_sink_count(specs.len(), sinks.len())?;
        let started = Instant::now();

        tracing::info!(
            records = table.len(),
            fragments = specs.len(),
            "Factoring records"
        );

        let stores = self.render_all(Arc::clone(&table), specs).await?;
        let sinks = Self::commit_all(&stores, sinks).await?;

        for store in &stores {
            crate::log_fragment_written!(store.kind(), store.rows_written(), store.rows_suppressed());
        }

        let assignments: Vec<Assignments> =
            stores.into_iter().map(RenderedStore::into_assignments).collect();
        let identity_map = IdentityMap::assemble(&table, specs, &assignments)?;

        crate::log_factor_complete!(identity_map.len(), started.elapsed());

        Ok(Factored {
            identity_map,
            sinks,
        })
    }
}

fn check_sink_count(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(IdFactorError::Validation(format!(
            "expected {expected} sinks, got {actual}"
        )));
    }
    Ok(())
}

fn task_failure(kind: &str, err: JoinError) -> IdFactorError {
    let message = if err.is_panic() {
        format!("task panicked: {err}")
    } else {
        err.to_string()
    };
    tracing::error!(kind = kind, error = %message, "Fragment task failed");
    IdFactorError::TaskFailure {
        kind: kind.to_string(),
        message,
    }
}
