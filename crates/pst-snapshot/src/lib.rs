//! pst-snapshot
//!
//! CSV persistence for the two snapshot artifacts the pipeline keeps
//! between runs: `previous.csv` (last successfully dispatched dump) and
//! `current.csv` (this run's dump).
//!
//! Architectural decisions:
//! - Snapshots are immutable once written; the store only ever replaces
//!   whole files
//! - Rotation is delete-previous then rename-current, exactly as the
//!   job has always behaved; see [`SnapshotStore::rotate`] for the
//!   crash-safety caveat
//! - A zero-byte file reads back as the empty snapshot (seeded first run)

use pst_engine::Snapshot;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const PREVIOUS_FILE: &str = "previous.csv";
pub const CURRENT_FILE: &str = "current.csv";

/// Errors reading, writing, or rotating snapshot artifacts.
///
/// All of these are fatal environment errors: the run aborts and the
/// snapshot window is left where it was.
#[derive(Debug)]
pub enum SnapshotError {
    /// The artifact does not exist. For the previous snapshot this
    /// usually means the store was never seeded (`pst init`).
    Missing { path: PathBuf },
    /// Filesystem failure reading or writing an artifact.
    Io { path: PathBuf, message: String },
    /// The artifact exists but is not parseable CSV.
    Malformed { path: PathBuf, message: String },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Missing { path } => {
                write!(f, "snapshot missing: {}", path.display())
            }
            SnapshotError::Io { path, message } => {
                write!(f, "snapshot io error at {}: {message}", path.display())
            }
            SnapshotError::Malformed { path, message } => {
                write!(f, "snapshot malformed at {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

/// Filesystem-backed store for the previous/current snapshot pair.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SnapshotStore { dir: dir.into() }
    }

    pub fn previous_path(&self) -> PathBuf {
        self.dir.join(PREVIOUS_FILE)
    }

    pub fn current_path(&self) -> PathBuf {
        self.dir.join(CURRENT_FILE)
    }

    pub fn read_previous(&self) -> Result<Snapshot, SnapshotError> {
        read_snapshot(&self.previous_path())
    }

    pub fn read_current(&self) -> Result<Snapshot, SnapshotError> {
        read_snapshot(&self.current_path())
    }

    /// Write this run's dump as `current.csv`, overwriting any stale
    /// current snapshot left by a previously aborted run.
    pub fn write_current(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        write_snapshot(&self.current_path(), snapshot)
    }

    /// Seed an empty previous snapshot so the first scheduled run can
    /// proceed. Returns `false` (and leaves the file alone) if a
    /// previous snapshot already exists.
    pub fn seed_previous(&self) -> Result<bool, SnapshotError> {
        let path = self.previous_path();
        if path.exists() {
            return Ok(false);
        }
        if !self.dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.dir).map_err(|e| SnapshotError::Io {
                path: self.dir.clone(),
                message: e.to_string(),
            })?;
        }
        fs::write(&path, "").map_err(|e| SnapshotError::Io {
            path,
            message: e.to_string(),
        })?;
        Ok(true)
    }

    /// Advance the snapshot window: delete `previous.csv`, rename
    /// `current.csv` to `previous.csv`.
    ///
    /// Call only after the whole run has succeeded. Not atomic across
    /// process crashes: a crash between the delete and the rename loses
    /// the previous snapshot, and the next run will fail on the missing
    /// artifact rather than silently re-reporting. Kept as-is pending a
    /// confirmed durability requirement (see DESIGN.md).
    pub fn rotate(&self) -> Result<(), SnapshotError> {
        let current = self.current_path();
        if !current.exists() {
            return Err(SnapshotError::Missing { path: current });
        }

        let previous = self.previous_path();
        if previous.exists() {
            fs::remove_file(&previous).map_err(|e| SnapshotError::Io {
                path: previous.clone(),
                message: e.to_string(),
            })?;
        }

        fs::rename(&current, &previous).map_err(|e| SnapshotError::Io {
            path: current,
            message: e.to_string(),
        })
    }
}

fn read_snapshot(path: &Path) -> Result<Snapshot, SnapshotError> {
    if !path.exists() {
        return Err(SnapshotError::Missing {
            path: path.to_path_buf(),
        });
    }

    // Header handling is manual: the first record is the header, and a
    // zero-byte file is the valid empty snapshot.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| SnapshotError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut header: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| SnapshotError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let fields: Vec<String> = record.iter().map(str::to_string).collect();
        if i == 0 {
            header = fields;
        } else {
            rows.push(fields);
        }
    }

    Ok(Snapshot::new(header, rows))
}

fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| SnapshotError::Io {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
    }

    // A fully empty snapshot is just a zero-byte file.
    if snapshot.is_empty() {
        return fs::write(path, "").map_err(|e| SnapshotError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        });
    }

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| SnapshotError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let io_err = |e: csv::Error| SnapshotError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    writer.write_record(&snapshot.header).map_err(io_err)?;
    for row in &snapshot.rows {
        writer.write_record(row).map_err(io_err)?;
    }
    writer.flush().map_err(|e| SnapshotError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn snapshot() -> Snapshot {
        Snapshot::new(
            vec!["sale".to_string(), "amount".to_string()],
            vec![
                vec!["PM001".to_string(), "1,234.50".to_string()],
                vec!["CV002".to_string(), "30.00".to_string()],
            ],
        )
    }

    #[test]
    fn write_then_read_preserves_raw_fields() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        store.write_current(&snapshot()).unwrap();
        let read = store.read_current().unwrap();
        assert_eq!(read, snapshot());
        // Grouping commas survive the CSV round trip untouched.
        assert_eq!(read.rows[0][1], "1,234.50");
    }

    #[test]
    fn missing_previous_is_a_distinct_error() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        let err = store.read_previous().unwrap_err();
        assert!(matches!(err, SnapshotError::Missing { .. }));
    }

    #[test]
    fn seeded_previous_reads_as_empty_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        assert!(store.seed_previous().unwrap());
        let read = store.read_previous().unwrap();
        assert!(read.is_empty());
    }

    #[test]
    fn seed_never_clobbers_an_existing_previous() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        store.write_current(&snapshot()).unwrap();
        store.rotate().unwrap();

        assert!(!store.seed_previous().unwrap());
        assert_eq!(store.read_previous().unwrap(), snapshot());
    }

    #[test]
    fn rotate_replaces_previous_with_current() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        store.seed_previous().unwrap();
        store.write_current(&snapshot()).unwrap();
        store.rotate().unwrap();

        assert_eq!(store.read_previous().unwrap(), snapshot());
        assert!(!store.current_path().exists());
    }

    #[test]
    fn rotate_without_current_fails() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        let err = store.rotate().unwrap_err();
        assert!(matches!(err, SnapshotError::Missing { .. }));
    }
}
