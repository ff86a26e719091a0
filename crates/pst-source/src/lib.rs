//! pst-source
//!
//! Data-source boundary for the statements feed.
//!
//! This crate owns the collaborator trait and the SQL implementation.
//! It does **not** persist snapshots or run the diff; callers hand the
//! fetched [`Snapshot`] to the snapshot store and engine.

mod sql;

pub use sql::SqlSource;

use async_trait::async_trait;
use pst_engine::Snapshot;
use std::fmt;

/// Errors a [`StatementSource`] implementation may return. All fatal;
/// the pipeline performs no retries.
#[derive(Debug)]
pub enum SourceError {
    /// Could not reach or authenticate to the upstream database.
    Connect(String),
    /// The query failed upstream.
    Query(String),
    /// A result cell could not be decoded as text.
    Decode { row: usize, column: String },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Connect(msg) => write!(f, "source connect error: {msg}"),
            SourceError::Query(msg) => write!(f, "source query error: {msg}"),
            SourceError::Decode { row, column } => {
                write!(f, "source row {row}: cannot decode column '{column}' as text")
            }
        }
    }
}

impl std::error::Error for SourceError {}

/// Upstream statements-feed contract.
///
/// One parameterized query, one lower-bound date parameter, one fully
/// materialized ordered result. Implementations must be object-safe so
/// the pipeline can hold a `&dyn StatementSource`.
#[async_trait]
pub trait StatementSource: Send + Sync {
    /// Human-readable name identifying this source (e.g. `"postgres"`).
    fn name(&self) -> &'static str;

    /// Execute `query` with `since` bound as its single lower-bound
    /// date parameter; return header and rows in upstream order.
    async fn fetch(&self, query: &str, since: &str) -> Result<Snapshot, SourceError>;
}
