//! Run-level error taxonomy.

use pst_config::ConfigError;
use pst_dispatch::DispatchError;
use pst_engine::{AggregateError, DiffError};
use pst_snapshot::SnapshotError;
use pst_source::SourceError;
use std::fmt;

/// Every way a run can fail, tagged by pipeline stage.
///
/// All variants are fatal and all abort before rotation; the tag
/// exists so the run log and exit path can say *which* collaborator
/// failed without string-matching messages.
#[derive(Debug)]
pub enum RunError {
    Config(ConfigError),
    Upstream(SourceError),
    Snapshot(SnapshotError),
    Integrity(DiffError),
    Aggregate(AggregateError),
    Dispatch(DispatchError),
}

impl RunError {
    /// Short stable tag for log entries.
    pub fn kind(&self) -> &'static str {
        match self {
            RunError::Config(_) => "configuration",
            RunError::Upstream(_) => "upstream",
            RunError::Snapshot(_) => "snapshot",
            RunError::Integrity(_) => "data-integrity",
            RunError::Aggregate(_) => "aggregation",
            RunError::Dispatch(_) => "dispatch",
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Config(e) => write!(f, "{e}"),
            RunError::Upstream(e) => write!(f, "{e}"),
            RunError::Snapshot(e) => write!(f, "{e}"),
            RunError::Integrity(e) => write!(f, "{e}"),
            RunError::Aggregate(e) => write!(f, "{e}"),
            RunError::Dispatch(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Config(e) => Some(e),
            RunError::Upstream(e) => Some(e),
            RunError::Snapshot(e) => Some(e),
            RunError::Integrity(e) => Some(e),
            RunError::Aggregate(e) => Some(e),
            RunError::Dispatch(e) => Some(e),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        RunError::Config(e)
    }
}

impl From<SourceError> for RunError {
    fn from(e: SourceError) -> Self {
        RunError::Upstream(e)
    }
}

impl From<SnapshotError> for RunError {
    fn from(e: SnapshotError) -> Self {
        RunError::Snapshot(e)
    }
}

impl From<DiffError> for RunError {
    fn from(e: DiffError) -> Self {
        RunError::Integrity(e)
    }
}

impl From<AggregateError> for RunError {
    fn from(e: AggregateError) -> Self {
        RunError::Aggregate(e)
    }
}

impl From<DispatchError> for RunError {
    fn from(e: DispatchError) -> Self {
        RunError::Dispatch(e)
    }
}
