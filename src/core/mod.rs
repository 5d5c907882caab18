//! Core business logic for medsync.
//!
//! # Modules
//!
//! - [`sync`] - per-location orchestration and sequential batch driving
//! - [`state`] - durable progress tracking for crash resumption
//! - [`staging`] - staging directory lifecycle
//! - [`snapshot`] - point-in-time encounter snapshot persistence
//!
//! # Sync Workflow
//!
//! For each location in the roster, strictly in order:
//!
//! 1. **Clear staging**: remove prior run artifacts from the staging directory
//! 2. **Load progress**: read or initialize the location's completed-unit list
//! 3. **Connect and fetch**: pull the patient -> encounters map from OpenMRS
//! 4. **Snapshot**: write the map durably, then read it back to drive the loop
//! 5. **Process units**: stage each patient's output, recording completion
//!    durably after each unit; units already recorded are skipped
//! 6. **Hand off**: invoke the DHIS2 upload once for the location
//!
//! Any failure stops the batch; re-running the program resumes from the
//! progress document.

pub mod snapshot;
pub mod staging;
pub mod state;
pub mod sync;
