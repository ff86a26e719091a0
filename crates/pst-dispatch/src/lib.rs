//! pst-dispatch
//!
//! Report composition and delivery: renders each group's aggregated
//! report as a CSV artifact, resolves its destination under the
//! configured routing policy, hands it to the transport, and sends the
//! combined master report last.
//!
//! No retries anywhere: a failed send aborts the remaining dispatches
//! and the run, so the unrotated snapshot window makes the next run
//! re-report everything.

mod compose;
mod render;
mod transport;

pub use compose::{dispatch_reports, DispatchSummary};
pub use render::{
    render_report, report_to_csv, GROUP_SEPARATOR_FILLER, RUN_SEPARATOR_FILLER, SUBTOTAL_LABEL,
};
pub use transport::{SmtpSender, Transport, ATTACHMENT_NAME, MESSAGE_BODY};

use std::fmt;

/// Delivery failures. All fatal.
#[derive(Debug)]
pub enum DispatchError {
    /// A group key has no route and the policy is reject.
    UnroutedGroup { key: String },
    /// A configured sender or recipient address does not parse.
    BadAddress { address: String, message: String },
    /// CSV serialization of an artifact failed.
    Render(String),
    /// The transport refused or failed the send.
    Transport(String),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::UnroutedGroup { key } => write!(
                f,
                "group '{key}' has no configured recipients and policy is reject"
            ),
            DispatchError::BadAddress { address, message } => {
                write!(f, "malformed address '{address}': {message}")
            }
            DispatchError::Render(msg) => write!(f, "artifact render error: {msg}"),
            DispatchError::Transport(msg) => write!(f, "transport error: {msg}"),
        }
    }
}

impl std::error::Error for DispatchError {}
