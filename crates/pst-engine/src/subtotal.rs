//! Subtotal insertion at leading-key run boundaries.
//!
//! Built as an appending builder with explicit run state (run key +
//! running sums) rather than in-place insertion with shifted indices.
//! The builder has two states — accumulating a run, and just closed a
//! run — with the transition triggered by a leading-key change between
//! consecutive original data rows.

use crate::amount::Cents;
use crate::partition::Group;
use crate::table::TableSpec;
use crate::types::{GroupKey, NewEntry};
use std::fmt;

/// One row of an aggregated report, in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportRow {
    /// An original data row.
    Data(NewEntry),
    /// Sums of each aggregation column over the run this row closes,
    /// in `TableSpec::amount_columns` order.
    Subtotal(Vec<Cents>),
    /// Visual break after a subtotal. Never trails the final subtotal.
    Separator,
}

/// A group's rows with subtotal and separator rows interleaved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedReport {
    pub key: GroupKey,
    pub rows: Vec<ReportRow>,
}

impl AggregatedReport {
    /// Number of subtotal rows (equals the number of maximal
    /// contiguous runs of equal leading key).
    pub fn subtotal_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r, ReportRow::Subtotal(_)))
            .count()
    }
}

/// Contract violation: the partitioner guarantees non-empty groups, so
/// an empty one means a caller bug, not bad data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateError {
    pub key: GroupKey,
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "group '{}' has no rows; partitioner contract guarantees non-empty groups",
            self.key
        )
    }
}

impl std::error::Error for AggregateError {}

/// Running aggregation state for the run currently being accumulated.
struct RunState {
    key: String,
    sums: Vec<Cents>,
}

impl RunState {
    fn open(key: &str, amounts: &[Cents]) -> RunState {
        RunState {
            key: key.to_string(),
            sums: amounts.to_vec(),
        }
    }

    fn accumulate(&mut self, amounts: &[Cents]) {
        for (sum, amount) in self.sums.iter_mut().zip(amounts) {
            *sum += *amount;
        }
    }
}

/// Produce the aggregated report for one group.
///
/// A `Subtotal` + `Separator` pair closes every run except the last,
/// which is closed by a `Subtotal` alone. Each subtotal sums exactly
/// the data rows of its own run — half-open ranges, no double
/// counting.
pub fn aggregate(group: &Group, spec: &TableSpec) -> Result<AggregatedReport, AggregateError> {
    if group.entries.is_empty() {
        return Err(AggregateError {
            key: group.key.clone(),
        });
    }

    let mut rows: Vec<ReportRow> = Vec::with_capacity(group.entries.len() * 2);
    let mut run: Option<RunState> = None;

    for entry in &group.entries {
        let key = entry.leading_key(spec);
        match run.as_mut() {
            Some(state) if state.key == key => state.accumulate(&entry.amounts),
            Some(state) => {
                // Key changed: close the accumulated run before this row.
                rows.push(ReportRow::Subtotal(state.sums.clone()));
                rows.push(ReportRow::Separator);
                *state = RunState::open(key, &entry.amounts);
            }
            None => run = Some(RunState::open(key, &entry.amounts)),
        }
        rows.push(ReportRow::Data(entry.clone()));
    }

    // Close the final run; no trailing separator.
    if let Some(state) = run {
        rows.push(ReportRow::Subtotal(state.sums));
    }

    Ok(AggregatedReport {
        key: group.key.clone(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(sale: &str, cents: i64) -> NewEntry {
        NewEntry {
            fields: vec![sale.to_string(), Cents(cents).format()],
            amounts: vec![Cents(cents)],
        }
    }

    fn spec() -> TableSpec {
        TableSpec {
            key_column: 0,
            prefix_len: 2,
            amount_columns: vec![1],
        }
    }

    fn group(entries: Vec<NewEntry>) -> Group {
        Group {
            key: GroupKey::extract(entries[0].fields[0].as_str(), 2),
            entries,
        }
    }

    #[test]
    fn two_runs_two_subtotals_one_separator() {
        // Leading keys [X, X, Y], amounts [10, 20, 5] => subtotals 30 and 5,
        // separator after the first subtotal only.
        let g = group(vec![
            entry("X1", 1_000),
            entry("X1", 2_000),
            entry("X2", 500),
        ]);
        // Same two-char prefix, distinct sale numbers -> runs split on the
        // full leading key, not the group key.
        let report = aggregate(&g, &spec()).unwrap();

        let expected = vec![
            ReportRow::Data(entry("X1", 1_000)),
            ReportRow::Data(entry("X1", 2_000)),
            ReportRow::Subtotal(vec![Cents(3_000)]),
            ReportRow::Separator,
            ReportRow::Data(entry("X2", 500)),
            ReportRow::Subtotal(vec![Cents(500)]),
        ];
        assert_eq!(report.rows, expected);
        assert_eq!(report.subtotal_count(), 2);
    }

    #[test]
    fn single_run_gets_one_trailing_subtotal_no_separator() {
        let g = group(vec![entry("PM001", 10_000), entry("PM001", 5_000)]);
        let report = aggregate(&g, &spec()).unwrap();

        assert_eq!(
            report.rows.last(),
            Some(&ReportRow::Subtotal(vec![Cents(15_000)]))
        );
        assert!(!report.rows.contains(&ReportRow::Separator));
    }

    #[test]
    fn non_contiguous_equal_keys_are_separate_runs() {
        // A, B, A: the second A run does not merge with the first.
        let g = group(vec![
            entry("PM001", 100),
            entry("PM002", 200),
            entry("PM001", 300),
        ]);
        let report = aggregate(&g, &spec()).unwrap();

        assert_eq!(report.subtotal_count(), 3);
        let subtotals: Vec<&Vec<Cents>> = report
            .rows
            .iter()
            .filter_map(|r| match r {
                ReportRow::Subtotal(s) => Some(s),
                _ => None,
            })
            .collect();
        assert_eq!(
            subtotals,
            vec![&vec![Cents(100)], &vec![Cents(200)], &vec![Cents(300)]]
        );
    }

    #[test]
    fn subtotals_sum_every_aggregation_column() {
        let spec = TableSpec {
            key_column: 0,
            prefix_len: 2,
            amount_columns: vec![1, 2],
        };
        let e = |sale: &str, a: i64, b: i64| NewEntry {
            fields: vec![sale.to_string(), Cents(a).format(), Cents(b).format()],
            amounts: vec![Cents(a), Cents(b)],
        };
        let g = Group {
            key: GroupKey::extract("PM", 2),
            entries: vec![e("PM001", 100, 7), e("PM001", 200, 8)],
        };

        let report = aggregate(&g, &spec).unwrap();
        assert_eq!(
            report.rows.last(),
            Some(&ReportRow::Subtotal(vec![Cents(300), Cents(15)]))
        );
    }

    #[test]
    fn data_rows_are_never_reordered() {
        let g = group(vec![
            entry("PM002", 1),
            entry("PM001", 2),
            entry("PM002", 3),
        ]);
        let report = aggregate(&g, &spec()).unwrap();

        let data: Vec<&NewEntry> = report
            .rows
            .iter()
            .filter_map(|r| match r {
                ReportRow::Data(e) => Some(e),
                _ => None,
            })
            .collect();
        assert_eq!(data.len(), 3);
        assert_eq!(data[0].fields[0], "PM002");
        assert_eq!(data[1].fields[0], "PM001");
        assert_eq!(data[2].fields[0], "PM002");
    }

    #[test]
    fn empty_group_fails_fast() {
        let g = Group {
            key: GroupKey::extract("PM", 2),
            entries: vec![],
        };
        let err = aggregate(&g, &spec()).unwrap_err();
        assert_eq!(err.key.as_str(), "PM");
    }
}
