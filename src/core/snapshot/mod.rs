//! Encounter snapshot persistence
//!
//! The snapshot is the point-in-time record of what the current location run
//! intends to do: the fetched patient -> encounters map, written durably to
//! disk before any processing side effect. The processing loop is driven by
//! the read-back copy, never the in-memory fetch result, so after a crash the
//! file on disk is authoritative regardless of what the process had in memory.

use crate::domain::{MedsyncError, Result, UnitMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes and reads back the per-run encounter snapshot
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    /// Create a snapshot writer backed by the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Durably write the unit map, replacing any previous snapshot
    pub fn write(&self, units: &UnitMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    MedsyncError::Snapshot(format!(
                        "Failed to create snapshot directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let contents = serde_json::to_string_pretty(units)
            .map_err(|e| MedsyncError::Snapshot(format!("Failed to encode snapshot: {e}")))?;

        let mut file = fs::File::create(&self.path).map_err(|e| {
            MedsyncError::Snapshot(format!(
                "Failed to create snapshot {}: {}",
                self.path.display(),
                e
            ))
        })?;
        file.write_all(contents.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| {
                MedsyncError::Snapshot(format!(
                    "Failed to write snapshot {}: {}",
                    self.path.display(),
                    e
                ))
            })
    }

    /// Read the snapshot back from disk
    pub fn read_back(&self) -> Result<UnitMap> {
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            MedsyncError::Snapshot(format!(
                "Failed to read snapshot {}: {}",
                self.path.display(),
                e
            ))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            MedsyncError::Snapshot(format!(
                "Failed to parse snapshot {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Write the unit map and return the read-back copy
    ///
    /// The returned map is the durability boundary: callers must iterate it,
    /// not the map they passed in.
    pub fn commit(&self, units: &UnitMap) -> Result<UnitMap> {
        self.write(units)?;
        self.read_back()
    }
}
