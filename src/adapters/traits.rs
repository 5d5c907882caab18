//! Collaborator traits consumed by the sync core
//!
//! The core drives three external collaborators through these seams: the
//! source store that serves encounters, the per-unit processor that stages
//! one patient's output, and the upload handler that ships staged artifacts.
//! Every call is awaited to completion before the next stage runs; none of
//! these traits implies concurrency. Retry and timeout policy, where wanted,
//! belongs to implementations, not to the core.

use crate::domain::ids::{EncounterId, LocationId, PatientId};
use crate::domain::{Result, UnitMap};
use async_trait::async_trait;

/// Source clinical-records store
#[async_trait]
pub trait SourceConnector: Send + Sync {
    /// Establish a connection to the source store
    ///
    /// # Errors
    ///
    /// A connection failure is fatal for the entire run.
    async fn connect(&self) -> Result<()>;

    /// Fetch the patient -> encounters map for a location
    ///
    /// `encounter_type_ids` filters by encounter type; empty means all types.
    ///
    /// # Returns
    ///
    /// `Ok(None)` signals the source could not produce a result for the
    /// location; the caller treats it as fatal, the same as an `Err`.
    async fn fetch_patient_encounters(
        &self,
        location: &LocationId,
        encounter_type_ids: &[String],
    ) -> Result<Option<UnitMap>>;
}

/// Per-unit transformation and staging
#[async_trait]
pub trait UnitProcessor: Send + Sync {
    /// Transform and stage one patient's encounters
    ///
    /// # Errors
    ///
    /// An error aborts the remaining units for the location and the batch;
    /// units already recorded complete stay complete.
    async fn process_unit(
        &self,
        patient: &PatientId,
        encounters: &[EncounterId],
        location: &LocationId,
    ) -> Result<()>;
}

/// Destination upload handoff
#[async_trait]
pub trait UploadHandler: Send + Sync {
    /// Ship everything currently staged to the destination system
    ///
    /// Invoked exactly once per location after all units are processed,
    /// without inspecting staging contents first.
    async fn hand_off_for_upload(&self) -> Result<()>;
}
