//! Per-location sync orchestration
//!
//! One location run walks a fixed sequence of stages:
//!
//! ```text
//! staging clear -> progress load/init -> connect -> fetch
//!               -> snapshot write + read-back -> per-unit processing -> upload handoff
//! ```
//!
//! Each stage failure is wrapped with its location and stage
//! ([`MedsyncError::SyncStageFailed`]) and propagated; there is no retry or
//! partial recovery at this level. Processing iterates the snapshot read back
//! from disk, records each completed unit durably before moving on, and skips
//! units the progress document already holds, so an interrupted run resumes
//! where it stopped instead of redoing finished work.

use crate::adapters::traits::{SourceConnector, UnitProcessor, UploadHandler};
use crate::core::snapshot::SnapshotWriter;
use crate::core::staging::StagingArea;
use crate::core::state::ProgressStore;
use crate::core::sync::summary::SyncSummary;
use crate::domain::ids::{LocationId, PatientId};
use crate::domain::{MedsyncError, Result, SyncStage};
use std::collections::HashSet;
use std::sync::Arc;

/// Orchestrates the sync of a single location end to end
pub struct SyncOrchestrator {
    staging: StagingArea,
    snapshot: SnapshotWriter,
    source: Arc<dyn SourceConnector>,
    processor: Arc<dyn UnitProcessor>,
    uploader: Arc<dyn UploadHandler>,
    encounter_type_ids: Vec<String>,
}

impl SyncOrchestrator {
    /// Create a new orchestrator
    pub fn new(
        staging: StagingArea,
        snapshot: SnapshotWriter,
        source: Arc<dyn SourceConnector>,
        processor: Arc<dyn UnitProcessor>,
        uploader: Arc<dyn UploadHandler>,
        encounter_type_ids: Vec<String>,
    ) -> Self {
        Self {
            staging,
            snapshot,
            source,
            processor,
            uploader,
            encounter_type_ids,
        }
    }

    /// Synchronize one location
    ///
    /// # Errors
    ///
    /// Any stage failure is returned wrapped with the location and stage; the
    /// caller decides what it means for the rest of the batch (the batch
    /// driver aborts).
    pub async fn sync_location(
        &self,
        location: &LocationId,
        progress: &mut ProgressStore,
        summary: &mut SyncSummary,
    ) -> Result<()> {
        tracing::info!(location_id = %location, "Processing location");

        // Staging output from a previous, possibly partial run must not leak
        // into this run's upload batch.
        let removed = self
            .staging
            .clear()
            .map_err(|e| MedsyncError::at_stage(location, SyncStage::StagingClear, e))?;
        tracing::debug!(location_id = %location, removed, "Staging area cleared");

        let completed = self.load_resume_marker(location, progress)?;

        self.source
            .connect()
            .await
            .map_err(|e| MedsyncError::at_stage(location, SyncStage::Connect, e))?;
        tracing::info!(location_id = %location, "Connected to source store");

        let fetched = self
            .source
            .fetch_patient_encounters(location, &self.encounter_type_ids)
            .await
            .map_err(|e| MedsyncError::at_stage(location, SyncStage::Fetch, e))?
            .ok_or_else(|| {
                MedsyncError::at_stage(
                    location,
                    SyncStage::Fetch,
                    MedsyncError::Fetch(format!(
                        "Source returned no result for location {location}"
                    )),
                )
            })?;
        tracing::info!(
            location_id = %location,
            patients = fetched.len(),
            "Fetched patient encounters"
        );

        // Durability boundary: the loop below iterates the copy read back
        // from disk, never the in-memory fetch result.
        let units = self
            .snapshot
            .commit(&fetched)
            .map_err(|e| MedsyncError::at_stage(location, SyncStage::Snapshot, e))?;
        tracing::info!(
            location_id = %location,
            path = %self.snapshot.path().display(),
            patients = units.len(),
            "Snapshot committed"
        );

        for (patient, encounters) in units.iter() {
            if completed.contains(patient) {
                tracing::debug!(
                    location_id = %location,
                    patient_id = %patient,
                    "Unit already complete, skipping"
                );
                summary.units_skipped += 1;
                continue;
            }

            self.processor
                .process_unit(patient, encounters, location)
                .await
                .map_err(|e| MedsyncError::at_stage(location, SyncStage::Process, e))?;

            // Completion must be durable before the next unit starts.
            progress
                .record(location, patient)
                .map_err(|e| MedsyncError::at_stage(location, SyncStage::Process, e))?;

            summary.units_processed += 1;
            tracing::debug!(
                location_id = %location,
                patient_id = %patient,
                encounters = encounters.len(),
                "Unit processed and recorded"
            );
        }

        self.uploader
            .hand_off_for_upload()
            .await
            .map_err(|e| MedsyncError::at_stage(location, SyncStage::Upload, e))?;
        tracing::info!(location_id = %location, "Handed staged artifacts off for upload");

        Ok(())
    }

    /// Load or initialize the location's progress entry
    ///
    /// A first-time location gets an empty entry persisted immediately; a
    /// known location's completed list becomes the resume marker.
    fn load_resume_marker(
        &self,
        location: &LocationId,
        progress: &mut ProgressStore,
    ) -> Result<HashSet<PatientId>> {
        match progress.get(location) {
            Some(patients) => {
                tracing::info!(
                    location_id = %location,
                    completed = patients.len(),
                    "Location seen before, resuming"
                );
                Ok(patients.iter().cloned().collect())
            }
            None => {
                tracing::info!(location_id = %location, "New location, starting fresh");
                progress
                    .reset(location)
                    .map_err(|e| MedsyncError::at_stage(location, SyncStage::ProgressInit, e))?;
                Ok(HashSet::new())
            }
        }
    }
}
