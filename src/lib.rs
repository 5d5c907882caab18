//! # Medsync - OpenMRS to DHIS2 encounter sync
//!
//! Medsync is a resumable sync tool that fetches patient encounters from an
//! OpenMRS server and hands them off to a DHIS2 instance, one health
//! facility (location) at a time.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Fetching** patient encounters from OpenMRS via REST, grouped per patient
//! - **Checkpointing** per-location progress so an interrupted run resumes
//!   without re-processing completed patients
//! - **Staging** one JSON artifact per patient for upload
//! - **Uploading** staged artifacts to DHIS2 as events
//!
//! ## Architecture
//!
//! Medsync follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (sync orchestration, progress state, staging, snapshots)
//! - [`adapters`] - External integrations (OpenMRS, DHIS2, staging files)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Resumability
//!
//! Progress is a JSON document mapping each location to the ordered list of
//! patients already processed for it. Every entry is flushed to disk before
//! the pipeline moves on, so the document never claims work that did not
//! finish:
//!
//! ```rust,no_run
//! use medsync::core::state::ProgressStore;
//! use medsync::domain::{LocationId, MedsyncError};
//!
//! # fn example() -> medsync::domain::Result<()> {
//! let mut progress = ProgressStore::open("logs/progress.json")?;
//! let location = LocationId::new("kigali-central").map_err(MedsyncError::Configuration)?;
//!
//! match progress.get(&location) {
//!     Some(done) => println!("{} patients already synced", done.len()),
//!     None => progress.reset(&location)?,
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Medsync uses the [`domain::MedsyncError`] type for all errors. Failures
//! inside the per-location pipeline are wrapped with the location and the
//! stage that failed:
//!
//! ```rust,no_run
//! use medsync::domain::MedsyncError;
//!
//! fn classify(error: &MedsyncError) -> &'static str {
//!     match error.root_cause() {
//!         MedsyncError::Configuration(_) => "config",
//!         MedsyncError::OpenMrs(_) => "source",
//!         _ => "fatal",
//!     }
//! }
//! ```
//!
//! ## Logging
//!
//! Medsync uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(location_id = "kigali-central", "Processing location");
//! warn!(patient_id = "a1b2", "Skipping already-synced patient");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
