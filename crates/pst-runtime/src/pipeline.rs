//! The single-threaded pipeline pass.

use crate::RunError;
use pst_config::Routing;
use pst_dispatch::{dispatch_reports, DispatchSummary, Transport};
use pst_engine::{aggregate, diff, partition, AggregatedReport, TableSpec};
use pst_snapshot::SnapshotStore;
use pst_source::StatementSource;
use tracing::info;

/// One run's collaborators, injected so every boundary is mockable.
pub struct Pipeline<'a> {
    pub source: &'a dyn StatementSource,
    pub store: &'a SnapshotStore,
    pub transport: &'a dyn Transport,
    pub routing: &'a Routing,
    pub spec: TableSpec,
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub new_entries: usize,
    pub groups: usize,
    pub dispatch: DispatchSummary,
    /// Always true on success; named so call sites read correctly.
    pub rotated: bool,
}

/// Result of a dry pass: everything computed, nothing sent or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOutcome {
    pub new_entries: usize,
    pub reports: Vec<AggregatedReport>,
}

impl Pipeline<'_> {
    /// Execute one full run: fetch, snapshot, diff, partition,
    /// aggregate, dispatch, rotate.
    ///
    /// Rotation is the final step and happens only when every dispatch
    /// has succeeded; on any error the previous snapshot is left
    /// untouched and the next scheduled run re-diffs against it.
    pub async fn run(&self, query: &str, since: &str) -> Result<RunOutcome, RunError> {
        // Fail fast on a missing previous snapshot before touching the
        // upstream database.
        let previous = self.store.read_previous()?;

        info!(source = self.source.name(), since, "fetching statement feed");
        let current = self.source.fetch(query, since).await?;
        self.store.write_current(&current)?;

        let entries = diff(&previous, &current, &self.spec)?;
        info!(
            current_rows = current.rows.len(),
            new_entries = entries.len(),
            "snapshot diff complete"
        );

        let parts = partition(entries, &self.spec);
        let mut reports = Vec::with_capacity(parts.len());
        for group in parts.groups() {
            reports.push(aggregate(group, &self.spec)?);
        }

        let dispatch =
            dispatch_reports(&current.header, &self.spec, &reports, self.routing, self.transport)
                .await?;

        self.store.rotate()?;
        info!(groups = reports.len(), "run complete; snapshot window rotated");

        Ok(RunOutcome {
            new_entries: parts.groups().iter().map(|g| g.entries.len()).sum(),
            groups: parts.len(),
            dispatch,
            rotated: true,
        })
    }

    /// Compute everything a run would report without dispatching,
    /// writing the current snapshot, or rotating.
    pub async fn preview(&self, query: &str, since: &str) -> Result<PreviewOutcome, RunError> {
        let previous = self.store.read_previous()?;
        let current = self.source.fetch(query, since).await?;

        let entries = diff(&previous, &current, &self.spec)?;
        let new_entries = entries.len();

        let parts = partition(entries, &self.spec);
        let mut reports = Vec::with_capacity(parts.len());
        for group in parts.groups() {
            reports.push(aggregate(group, &self.spec)?);
        }

        Ok(PreviewOutcome {
            new_entries,
            reports,
        })
    }
}
