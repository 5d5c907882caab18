//! Sync command implementation
//!
//! This module implements the `sync` command for syncing patient encounters
//! from OpenMRS to DHIS2 across every rostered location.

use crate::adapters::dhis2::Dhis2Client;
use crate::adapters::openmrs::OpenMrsClient;
use crate::adapters::staging::PatientFileWriter;
use crate::config::load_config;
use crate::core::snapshot::SnapshotWriter;
use crate::core::staging::StagingArea;
use crate::core::state::ProgressStore;
use crate::core::sync::{BatchDriver, SyncOrchestrator};
use crate::domain::{read_location_roster, MedsyncError};
use clap::Args;
use std::sync::Arc;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Override the location roster file
    #[arg(long)]
    pub roster: Option<String>,

    /// Override encounter type UUID(s) to fetch (comma-separated)
    #[arg(long)]
    pub encounter_type: Option<String>,
}

impl SyncArgs {
    /// Execute the sync command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting sync command");

        // Load configuration
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Error: {e}");
                return Ok(2);
            }
        };

        // Apply CLI overrides
        if let Some(roster) = &self.roster {
            tracing::info!(roster = %roster, "Overriding roster path from CLI");
            config.sync.roster_path = roster.clone().into();
        }

        if let Some(encounter_types) = &self.encounter_type {
            let ids: Vec<String> = encounter_types
                .split(',')
                .map(|s| s.trim().to_string())
                .collect();
            tracing::info!(encounter_type_ids = ?ids, "Overriding encounter types from CLI");
            config.openmrs.encounter_type_ids = ids;
        }

        match run_sync(&config).await {
            Ok(summary) => {
                println!("✅ Sync complete");
                println!("  Locations completed: {}", summary.locations_completed);
                println!("  Units processed:     {}", summary.units_processed);
                println!("  Units skipped:       {}", summary.units_skipped);
                println!("  Duration:            {:.2?}", summary.duration);
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Sync failed");
                eprintln!("Error: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}

/// Build the pipeline from configuration and run it over the roster.
async fn run_sync(
    config: &crate::config::MedsyncConfig,
) -> crate::domain::Result<crate::core::sync::SyncSummary> {
    let roster = read_location_roster(&config.sync.roster_path)?;
    tracing::info!(locations = roster.len(), "Loaded location roster");

    let mut progress = ProgressStore::open(&config.sync.progress_path)?;

    let staging = StagingArea::new(&config.sync.staging_dir)?;
    let snapshot = SnapshotWriter::new(&config.sync.snapshot_path);

    let source = Arc::new(OpenMrsClient::new(config.openmrs.clone())?);
    let processor = Arc::new(PatientFileWriter::new(&config.sync.staging_dir));
    let uploader = Arc::new(Dhis2Client::new(
        config.dhis2.clone(),
        &config.sync.staging_dir,
    )?);

    let orchestrator = SyncOrchestrator::new(
        staging,
        snapshot,
        source,
        processor,
        uploader,
        config.openmrs.encounter_type_ids.clone(),
    );

    BatchDriver::new(orchestrator)
        .run(&roster, &mut progress)
        .await
}

/// Map a sync failure to a process exit code.
///
/// Connectivity and fetch failures (code 4) are distinguished from other
/// fatal errors (code 5) so operators can retry them without inspecting logs.
pub fn exit_code_for(error: &MedsyncError) -> i32 {
    match error.root_cause() {
        MedsyncError::Configuration(_) => 2,
        MedsyncError::OpenMrs(_) | MedsyncError::Fetch(_) => 4,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dhis2Error, LocationId, OpenMrsError, SyncStage};

    #[test]
    fn test_exit_code_configuration() {
        let err = MedsyncError::Configuration("bad".to_string());
        assert_eq!(exit_code_for(&err), 2);
    }

    #[test]
    fn test_exit_code_connectivity() {
        let err = MedsyncError::OpenMrs(OpenMrsError::ConnectionFailed("refused".to_string()));
        assert_eq!(exit_code_for(&err), 4);

        let err = MedsyncError::Fetch("no encounters payload".to_string());
        assert_eq!(exit_code_for(&err), 4);
    }

    #[test]
    fn test_exit_code_unwraps_stage_wrapper() {
        let location = LocationId::new("L1").unwrap();
        let inner = MedsyncError::OpenMrs(OpenMrsError::Timeout("deadline".to_string()));
        let wrapped = MedsyncError::at_stage(&location, SyncStage::Connect, inner);
        assert_eq!(exit_code_for(&wrapped), 4);
    }

    #[test]
    fn test_exit_code_fatal_default() {
        let err = MedsyncError::Dhis2(Dhis2Error::UploadFailed {
            status: 409,
            message: "conflict".to_string(),
        });
        assert_eq!(exit_code_for(&err), 5);

        let err = MedsyncError::Staging("remove failed".to_string());
        assert_eq!(exit_code_for(&err), 5);
    }
}
