//! Progress store for crash-resumable sync runs
//!
//! The progress document maps each location to the ordered list of patient
//! IDs whose units have completed. `record` persists the whole document to
//! disk before returning, so a crash immediately afterwards still finds the
//! unit durably marked complete. The file is replaced atomically (temp file,
//! fsync, rename) so a crash mid-write never leaves a truncated document.

use crate::domain::ids::{LocationId, PatientId};
use crate::domain::{MedsyncError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Durable per-location completion record
///
/// Owned exclusively by the orchestrator; no other component mutates the
/// document. Entries are never deleted except by an explicit [`reset`].
///
/// [`reset`]: ProgressStore::reset
#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
    document: ProgressDocument,
}

/// On-disk shape: location ID -> ordered list of completed patient IDs
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
struct ProgressDocument {
    locations: BTreeMap<LocationId, Vec<PatientId>>,
}

impl ProgressStore {
    /// Open the store, loading the existing document if the file is present
    ///
    /// A missing file starts an empty document; it is created on the first
    /// `reset` or `record`.
    ///
    /// # Errors
    ///
    /// Returns `MedsyncError::Persistence` if an existing file cannot be read
    /// or parsed. A corrupt progress document is fatal rather than silently
    /// restarted from empty, because that would re-run completed work.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let document = if path.is_file() {
            let contents = fs::read_to_string(&path).map_err(|e| {
                MedsyncError::Persistence(format!(
                    "Failed to read progress document {}: {}",
                    path.display(),
                    e
                ))
            })?;
            serde_json::from_str(&contents).map_err(|e| {
                MedsyncError::Persistence(format!(
                    "Failed to parse progress document {}: {}",
                    path.display(),
                    e
                ))
            })?
        } else {
            ProgressDocument::default()
        };

        Ok(Self { path, document })
    }

    /// Completed patient list for a location
    ///
    /// `None` means the location has never been initialized; `Some` with an
    /// empty slice means it was seen but no unit has completed yet.
    pub fn get(&self, location: &LocationId) -> Option<&[PatientId]> {
        self.document
            .locations
            .get(location)
            .map(|patients| patients.as_slice())
    }

    /// Initialize a location's entry to an empty list
    ///
    /// Discards any prior completion history for the location. Persisted
    /// before returning.
    pub fn reset(&mut self, location: &LocationId) -> Result<()> {
        self.document
            .locations
            .insert(location.clone(), Vec::new());
        self.persist()
    }

    /// Mark a unit complete and persist the document before returning
    ///
    /// Idempotent: recording an already-present patient is a no-op, so the
    /// per-location list stays duplicate-free. A location never seen before
    /// gets its entry created.
    ///
    /// # Errors
    ///
    /// Returns `MedsyncError::Persistence` if the document cannot be written.
    /// The run must not continue with only in-memory progress.
    pub fn record(&mut self, location: &LocationId, patient: &PatientId) -> Result<()> {
        let patients = self
            .document
            .locations
            .entry(location.clone())
            .or_default();

        if patients.contains(patient) {
            tracing::debug!(
                location_id = %location,
                patient_id = %patient,
                "Unit already recorded, skipping duplicate"
            );
            return Ok(());
        }

        patients.push(patient.clone());
        self.persist()
    }

    /// Locations present in the document, with completed-unit counts
    pub fn location_counts(&self) -> impl Iterator<Item = (&LocationId, usize)> {
        self.document
            .locations
            .iter()
            .map(|(location, patients)| (location, patients.len()))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    MedsyncError::Persistence(format!(
                        "Failed to create progress directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let contents = serde_json::to_string_pretty(&self.document)
            .map_err(|e| MedsyncError::Persistence(format!("Failed to encode progress: {e}")))?;

        let tmp_path = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path).map_err(|e| {
            MedsyncError::Persistence(format!(
                "Failed to create {}: {}",
                tmp_path.display(),
                e
            ))
        })?;
        file.write_all(contents.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| {
                MedsyncError::Persistence(format!(
                    "Failed to write {}: {}",
                    tmp_path.display(),
                    e
                ))
            })?;

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            MedsyncError::Persistence(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn location(s: &str) -> LocationId {
        LocationId::from_str(s).unwrap()
    }

    fn patient(s: &str) -> PatientId {
        PatientId::from_str(s).unwrap()
    }

    fn store_in(dir: &TempDir) -> ProgressStore {
        ProgressStore::open(dir.path().join("progress.json")).unwrap()
    }

    #[test]
    fn test_unknown_location_is_none() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.get(&location("L1")).is_none());
    }

    #[test]
    fn test_reset_then_get_is_empty_not_none() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.reset(&location("L1")).unwrap();
        assert_eq!(store.get(&location("L1")), Some(&[][..]));
    }

    #[test]
    fn test_record_then_get_contains_patient() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.reset(&location("L1")).unwrap();
        store.record(&location("L1"), &patient("P1")).unwrap();

        assert_eq!(store.get(&location("L1")), Some(&[patient("P1")][..]));
    }

    #[test]
    fn test_record_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.record(&location("L1"), &patient("P1")).unwrap();
        store.record(&location("L1"), &patient("P1")).unwrap();
        store.record(&location("L1"), &patient("P2")).unwrap();

        assert_eq!(
            store.get(&location("L1")),
            Some(&[patient("P1"), patient("P2")][..])
        );
    }

    #[test]
    fn test_record_preserves_arrival_order() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.record(&location("L1"), &patient("P2")).unwrap();
        store.record(&location("L1"), &patient("P1")).unwrap();

        assert_eq!(
            store.get(&location("L1")),
            Some(&[patient("P2"), patient("P1")][..])
        );
    }

    #[test]
    fn test_record_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");

        {
            let mut store = ProgressStore::open(&path).unwrap();
            store.record(&location("L1"), &patient("P1")).unwrap();
        }

        let store = ProgressStore::open(&path).unwrap();
        assert_eq!(store.get(&location("L1")), Some(&[patient("P1")][..]));
    }

    #[test]
    fn test_reset_discards_history() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.record(&location("L1"), &patient("P1")).unwrap();
        store.reset(&location("L1")).unwrap();

        assert_eq!(store.get(&location("L1")), Some(&[][..]));
    }

    #[test]
    fn test_locations_are_isolated() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.record(&location("L1"), &patient("P1")).unwrap();
        store.record(&location("L2"), &patient("P2")).unwrap();

        assert_eq!(store.get(&location("L1")), Some(&[patient("P1")][..]));
        assert_eq!(store.get(&location("L2")), Some(&[patient("P2")][..]));
    }

    #[test]
    fn test_corrupt_document_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            ProgressStore::open(&path),
            Err(MedsyncError::Persistence(_))
        ));
    }

    #[test]
    fn test_document_shape_on_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");

        let mut store = ProgressStore::open(&path).unwrap();
        store.record(&location("L1"), &patient("P1")).unwrap();
        store.record(&location("L1"), &patient("P2")).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["L1"], serde_json::json!(["P1", "P2"]));
    }

    #[test]
    fn test_location_counts() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.record(&location("L1"), &patient("P1")).unwrap();
        store.record(&location("L1"), &patient("P2")).unwrap();
        store.reset(&location("L2")).unwrap();

        let counts: BTreeMap<String, usize> = store
            .location_counts()
            .map(|(l, n)| (l.as_str().to_string(), n))
            .collect();
        assert_eq!(counts["L1"], 2);
        assert_eq!(counts["L2"], 0);
    }
}
