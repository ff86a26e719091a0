//! Per-group dispatch and master-report accumulation.

use crate::render::{
    artifact_width, render_report, report_to_csv, separator_row, GROUP_SEPARATOR_FILLER,
};
use crate::transport::Transport;
use crate::DispatchError;
use pst_config::{Routing, UnroutedPolicy};
use pst_engine::{AggregatedReport, TableSpec};
use tracing::{info, warn};

/// Subject of the combined master report.
const MASTER_SUBJECT: &str = "All Payments Raised Yesterday";

/// What a completed dispatch pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Group artifacts sent (excludes the master).
    pub group_artifacts: usize,
    /// Total rows in the master artifact, separators included.
    pub master_rows: usize,
}

/// Dispatch every group's artifact in partition order, then the master.
///
/// Each group resolves its destination under the routing policy before
/// its artifact is sent; an unrouted key under the reject policy aborts
/// before anything else goes out for that group. The master report is
/// the concatenation of all group reports with a distinct separator row
/// between groups, dispatched last to the reserved master destination.
pub async fn dispatch_reports(
    header: &[String],
    spec: &TableSpec,
    reports: &[AggregatedReport],
    routing: &Routing,
    transport: &dyn Transport,
) -> Result<DispatchSummary, DispatchError> {
    let width = artifact_width(header, spec);
    let mut master_rows: Vec<Vec<String>> = Vec::new();

    for report in reports {
        let recipients = resolve_recipients(routing, report.key.as_str())?;
        let rendered = render_report(header, report, spec);
        let artifact = report_to_csv(header, &rendered)?;
        let subject = format!("{} Payments Raised Yesterday", report.key);

        info!(
            group = %report.key,
            rows = rendered.len(),
            recipients = recipients.len(),
            transport = transport.name(),
            "dispatching group report"
        );
        transport.send(&artifact, recipients, &subject).await?;

        if !master_rows.is_empty() {
            master_rows.push(separator_row(GROUP_SEPARATOR_FILLER, width));
        }
        master_rows.extend(rendered);
    }

    let master_artifact = report_to_csv(header, &master_rows)?;
    info!(
        rows = master_rows.len(),
        recipients = routing.master().len(),
        "dispatching master report"
    );
    transport
        .send(&master_artifact, routing.master(), MASTER_SUBJECT)
        .await?;

    Ok(DispatchSummary {
        group_artifacts: reports.len(),
        master_rows: master_rows.len(),
    })
}

fn resolve_recipients<'a>(
    routing: &'a Routing,
    key: &str,
) -> Result<&'a [String], DispatchError> {
    match routing.recipients_for(key) {
        Some(recipients) => Ok(recipients),
        None => match routing.policy() {
            UnroutedPolicy::Reject => Err(DispatchError::UnroutedGroup {
                key: key.to_string(),
            }),
            UnroutedPolicy::CatchAll => {
                warn!(group = key, "no route for group; using catch-all recipients");
                Ok(routing.catch_all())
            }
        },
    }
}
