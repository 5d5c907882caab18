//! Staged patient-file processor
//!
//! The shipped [`UnitProcessor`] implementation: writes one JSON artifact per
//! patient into the staging directory, ready for the upload handoff. The
//! artifact carries the patient, its encounter list, and the location it was
//! fetched for.

use crate::adapters::traits::UnitProcessor;
use crate::domain::ids::{EncounterId, LocationId, PatientId};
use crate::domain::{MedsyncError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Writes per-patient JSON artifacts into the staging directory
pub struct PatientFileWriter {
    staging_dir: PathBuf,
}

/// On-disk artifact shape
#[derive(Debug, Serialize)]
struct PatientArtifact<'a> {
    patient_id: &'a PatientId,
    location_id: &'a LocationId,
    encounter_ids: &'a [EncounterId],
}

impl PatientFileWriter {
    /// Create a writer targeting the given staging directory
    pub fn new(staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            staging_dir: staging_dir.into(),
        }
    }
}

#[async_trait]
impl UnitProcessor for PatientFileWriter {
    async fn process_unit(
        &self,
        patient: &PatientId,
        encounters: &[EncounterId],
        location: &LocationId,
    ) -> Result<()> {
        let artifact = PatientArtifact {
            patient_id: patient,
            location_id: location,
            encounter_ids: encounters,
        };

        let contents = serde_json::to_string_pretty(&artifact)
            .map_err(|e| MedsyncError::Processing(format!("Failed to encode artifact: {e}")))?;

        let path = self.staging_dir.join(format!("{}.json", patient.as_str()));
        fs::write(&path, contents).map_err(|e| {
            MedsyncError::Processing(format!("Failed to stage {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            patient_id = %patient,
            file = %path.display(),
            "Staged patient artifact"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_process_unit_writes_artifact() {
        let dir = TempDir::new().unwrap();
        let writer = PatientFileWriter::new(dir.path());

        let patient = PatientId::from_str("P1").unwrap();
        let location = LocationId::from_str("L1").unwrap();
        let encounters = vec![
            EncounterId::from_str("E1").unwrap(),
            EncounterId::from_str("E2").unwrap(),
        ];

        writer
            .process_unit(&patient, &encounters, &location)
            .await
            .unwrap();

        let contents = fs::read_to_string(dir.path().join("P1.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["patient_id"], "P1");
        assert_eq!(value["location_id"], "L1");
        assert_eq!(value["encounter_ids"], serde_json::json!(["E1", "E2"]));
    }

    #[tokio::test]
    async fn test_process_unit_missing_directory_is_error() {
        let dir = TempDir::new().unwrap();
        let writer = PatientFileWriter::new(dir.path().join("does-not-exist"));

        let patient = PatientId::from_str("P1").unwrap();
        let location = LocationId::from_str("L1").unwrap();

        let err = writer
            .process_unit(&patient, &[], &location)
            .await
            .unwrap_err();
        assert!(matches!(err, MedsyncError::Processing(_)));
    }
}
