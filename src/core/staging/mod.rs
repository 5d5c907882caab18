//! Staging area management
//!
//! The staging directory holds per-patient artifacts awaiting upload. Output
//! from a previous, possibly partial run must never leak into a new run's
//! upload batch, so the directory is cleared of regular files before each
//! location run begins. Subdirectories are left untouched. A file that cannot
//! be removed is fatal for the whole run: uploading from a directory whose
//! prior contents could not be guaranteed clean is worse than stopping.

use crate::domain::{MedsyncError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Working directory for per-patient artifacts awaiting upload
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    /// Create a staging area handle, creating the directory if absent
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            MedsyncError::Staging(format!(
                "Failed to create staging directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    /// Path of the staging directory
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Remove every regular file directly inside the staging directory
    ///
    /// Not recursive: subdirectories and their contents are untouched.
    /// Returns the number of files removed.
    ///
    /// # Errors
    ///
    /// The first failed deletion aborts with `MedsyncError::Staging`.
    pub fn clear(&self) -> Result<usize> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            MedsyncError::Staging(format!(
                "Failed to read staging directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let mut removed = 0usize;
        for entry in entries {
            let entry = entry.map_err(|e| {
                MedsyncError::Staging(format!(
                    "Failed to list staging directory {}: {}",
                    self.dir.display(),
                    e
                ))
            })?;
            let path = entry.path();

            let file_type = entry.file_type().map_err(|e| {
                MedsyncError::Staging(format!("Failed to stat {}: {}", path.display(), e))
            })?;
            if !file_type.is_file() {
                continue;
            }

            fs::remove_file(&path).map_err(|e| {
                MedsyncError::Staging(format!("Failed to delete {}: {}", path.display(), e))
            })?;
            removed += 1;
        }

        tracing::debug!(
            dir = %self.dir.display(),
            removed,
            "Cleared staging directory"
        );

        Ok(removed)
    }
}
