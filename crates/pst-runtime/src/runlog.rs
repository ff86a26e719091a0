//! Persistent, human-readable run log.
//!
//! One consolidated entry per run, prepended so the newest outcome is
//! at the top of the file (operators read it over a share; tail-first
//! order is what they have always had).

use crate::RunError;
use chrono::Utc;
use std::fs;
use std::io;
use std::path::PathBuf;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writer for the prepend-style run log.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RunLog { path: path.into() }
    }

    /// Record a successful run.
    pub fn record_success(&self) -> io::Result<()> {
        let ts = Utc::now().format(TIMESTAMP_FORMAT);
        self.prepend(&format!("[{ts}] SUCCESS: run completed.\n"))
    }

    /// Record a failed run: the stage tag, the error, and its full
    /// cause chain.
    pub fn record_failure(&self, error: &RunError) -> io::Result<()> {
        let ts = Utc::now().format(TIMESTAMP_FORMAT);
        let mut entry = format!("[{ts}] ERROR ({}): {error}\n", error.kind());

        let mut cause = std::error::Error::source(error);
        while let Some(e) = cause {
            entry.push_str(&format!("  caused by: {e}\n"));
            cause = e.source();
        }

        self.prepend(&entry)
    }

    fn prepend(&self, entry: &str) -> io::Result<()> {
        let existing = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e),
        };

        let rule = "-".repeat(80);
        fs::write(&self.path, format!("{entry}{rule}\n{existing}"))
    }
}
