//! Tabular artifact rendering.
//!
//! Turns an [`AggregatedReport`] into concrete CSV rows: amounts
//! re-rendered with grouping separators and two decimals, subtotal rows
//! labelled in the leading column with blanks elsewhere, separator rows
//! as repeated sentinel fillers.

use crate::DispatchError;
use pst_engine::{AggregatedReport, ReportRow, TableSpec};

/// Literal label in the leading column of a subtotal row.
pub const SUBTOTAL_LABEL: &str = "Subtotal:";
/// Filler of the separator row between sale runs inside one group.
pub const RUN_SEPARATOR_FILLER: &str = "-";
/// Filler of the separator row between groups in the master report.
/// Visually distinct from the intra-group one.
pub const GROUP_SEPARATOR_FILLER: &str = "~~~~~~";

/// Artifact width: the header defines the table, but a spec whose
/// designated columns run past the header must still render them.
pub(crate) fn artifact_width(header: &[String], spec: &TableSpec) -> usize {
    let amount_extent = spec.amount_columns.iter().map(|c| c + 1).max().unwrap_or(0);
    header.len().max(amount_extent).max(spec.key_column + 1)
}

/// A separator row of the given filler.
pub(crate) fn separator_row(filler: &str, width: usize) -> Vec<String> {
    vec![filler.to_string(); width]
}

/// Materialize one group's report as string rows (header excluded).
pub fn render_report(
    header: &[String],
    report: &AggregatedReport,
    spec: &TableSpec,
) -> Vec<Vec<String>> {
    let width = artifact_width(header, spec);
    let mut out = Vec::with_capacity(report.rows.len());

    for row in &report.rows {
        match row {
            ReportRow::Data(entry) => {
                let mut fields = entry.fields.clone();
                for (slot, &column) in spec.amount_columns.iter().enumerate() {
                    if let (Some(field), Some(amount)) =
                        (fields.get_mut(column), entry.amounts.get(slot))
                    {
                        *field = amount.format();
                    }
                }
                out.push(fields);
            }
            ReportRow::Subtotal(sums) => {
                let mut fields = vec![String::new(); width];
                fields[spec.key_column] = SUBTOTAL_LABEL.to_string();
                for (slot, &column) in spec.amount_columns.iter().enumerate() {
                    if let Some(sum) = sums.get(slot) {
                        fields[column] = sum.format();
                    }
                }
                out.push(fields);
            }
            ReportRow::Separator => out.push(separator_row(RUN_SEPARATOR_FILLER, width)),
        }
    }

    out
}

/// Serialize header + rendered rows as a UTF-8 CSV artifact.
pub fn report_to_csv(header: &[String], rows: &[Vec<String>]) -> Result<Vec<u8>, DispatchError> {
    // Flexible: subtotal/separator rows may be wider than the header
    // when the spec's designated columns run past it.
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    let render_err = |e: csv::Error| DispatchError::Render(e.to_string());

    writer.write_record(header).map_err(render_err)?;
    for row in rows {
        writer.write_record(row).map_err(render_err)?;
    }

    writer
        .into_inner()
        .map_err(|e| DispatchError::Render(e.to_string()))
}
