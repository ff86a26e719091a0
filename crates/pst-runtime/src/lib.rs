//! pst-runtime
//!
//! Run orchestration: wires the source, snapshot store, engine, and
//! transport into one single-threaded pipeline pass, and owns the
//! persistent run log.
//!
//! Architectural decisions:
//! - Any error anywhere aborts the whole run **before** snapshot
//!   rotation, so a failed run is retried wholesale against the same
//!   previous snapshot
//! - The error kind is tagged at the top level; the orchestrator, not
//!   the collaborators, decides what a failure means for rotation
//! - One consolidated run-log entry per run, newest first

mod error;
mod pipeline;
mod runlog;

pub use error::RunError;
pub use pipeline::{Pipeline, PreviewOutcome, RunOutcome};
pub use runlog::RunLog;
