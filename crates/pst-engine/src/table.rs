//! Column layout contract for the statement feed.

use serde::{Deserialize, Serialize};

/// Designated columns of the feed, by position.
///
/// The upstream contract is positional: the query projects a fixed
/// column order, so the engine addresses columns by index rather than
/// by name. Lifting the indices into configuration means a feed change
/// is a config edit, not a code edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Index of the leading key column (sale/document number).
    pub key_column: usize,
    /// Number of leading characters of the key column that form the
    /// group key (report category).
    pub prefix_len: usize,
    /// Indices of the currency columns that are summed into subtotals.
    pub amount_columns: Vec<usize>,
}

impl Default for TableSpec {
    /// Layout of the production statement feed: sale number first,
    /// currency columns at 7, 8, 10 and 12, two-character sale-type
    /// prefix.
    fn default() -> Self {
        TableSpec {
            key_column: 0,
            prefix_len: 2,
            amount_columns: vec![7, 8, 10, 12],
        }
    }
}
