//! New-entry detection between the previous and current snapshots.

use crate::amount::Cents;
use crate::table::TableSpec;
use crate::types::{NewEntry, Snapshot};
use std::collections::HashSet;
use std::fmt;

/// Errors produced while diffing snapshots.
///
/// Both variants are data-integrity failures: the run must abort before
/// any report is composed, and before the snapshot window rotates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffError {
    /// The two snapshots disagree on column names; diffing rows across
    /// different layouts would produce nonsense reports.
    HeaderMismatch {
        previous: Vec<String>,
        current: Vec<String>,
    },
    /// A new entry is missing one of the configured aggregation columns.
    MissingColumn { row: usize, column: usize },
    /// An aggregation column could not be parsed as a formatted decimal.
    BadAmount {
        row: usize,
        column: usize,
        raw: String,
    },
}

impl fmt::Display for DiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffError::HeaderMismatch { previous, current } => write!(
                f,
                "snapshot header mismatch: previous has {} columns, current has {}",
                previous.len(),
                current.len()
            ),
            DiffError::MissingColumn { row, column } => {
                write!(f, "current row {row}: missing aggregation column {column}")
            }
            DiffError::BadAmount { row, column, raw } => write!(
                f,
                "current row {row}: cannot parse amount column {column} from value '{raw}'"
            ),
        }
    }
}

impl std::error::Error for DiffError {}

/// Compute the ordered list of new entries: rows present in `current`
/// but absent from `previous`, by full raw-tuple equality.
///
/// Membership testing uses the untouched textual form — two rows that
/// differ only in numeric formatting are different rows. Amounts are
/// parsed exactly once, after membership testing, so normalization can
/// never cause a false match.
///
/// Row numbers in errors are 1-based data-row positions within the
/// current snapshot (the header row is not counted).
///
/// An empty previous snapshot (first seeded run) matches nothing, so
/// every current row is new.
pub fn diff(
    previous: &Snapshot,
    current: &Snapshot,
    spec: &TableSpec,
) -> Result<Vec<NewEntry>, DiffError> {
    // A freshly seeded previous snapshot has no header to agree on.
    if !previous.is_empty() && previous.header != current.header {
        return Err(DiffError::HeaderMismatch {
            previous: previous.header.clone(),
            current: current.header.clone(),
        });
    }

    let seen: HashSet<&[String]> = previous.rows.iter().map(|r| r.as_slice()).collect();

    let mut entries = Vec::new();
    for (idx, row) in current.rows.iter().enumerate() {
        if seen.contains(row.as_slice()) {
            continue;
        }

        let row_num = idx + 1;
        let mut amounts = Vec::with_capacity(spec.amount_columns.len());
        for &column in &spec.amount_columns {
            let raw = row.get(column).ok_or(DiffError::MissingColumn {
                row: row_num,
                column,
            })?;
            let cents = Cents::parse(raw).ok_or_else(|| DiffError::BadAmount {
                row: row_num,
                column,
                raw: raw.clone(),
            })?;
            amounts.push(cents);
        }

        entries.push(NewEntry {
            fields: row.clone(),
            amounts,
        });
    }

    Ok(entries)
}
