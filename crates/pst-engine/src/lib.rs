//! pst-engine
//!
//! Snapshot-diff, grouping, and subtotal-insertion engine for the
//! paid-statements pipeline.
//!
//! Architectural decisions:
//! - New-entry detection compares raw textual tuples; amounts are parsed
//!   exactly once, after membership testing
//! - Money is integer cents end to end; no float arithmetic
//! - Group iteration order is first occurrence in the current snapshot
//! - Subtotals are built by an appending builder with explicit run state,
//!   never by in-place index arithmetic
//!
//! Deterministic, pure logic. No IO. No clock. No transport.

mod amount;
mod diff;
mod partition;
mod subtotal;
mod table;
mod types;

pub use amount::Cents;
pub use diff::{diff, DiffError};
pub use partition::{partition, Group, Partition};
pub use subtotal::{aggregate, AggregateError, AggregatedReport, ReportRow};
pub use table::TableSpec;
pub use types::{GroupKey, NewEntry, Snapshot};
