//! Domain models and types for medsync.
//!
//! This module contains the core domain models, types, and business rules.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`LocationId`], [`PatientId`], [`EncounterId`])
//! - **The unit-of-work map** ([`UnitMap`]) with stable arrival order
//! - **Roster parsing** ([`roster::read_location_roster`])
//! - **Error types** ([`MedsyncError`], [`OpenMrsError`], [`Dhis2Error`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers use the newtype pattern so the compiler refuses to pass a
//! patient ID where a location ID is expected:
//!
//! ```rust
//! use medsync::domain::{LocationId, PatientId};
//!
//! # fn example() -> Result<(), String> {
//! let location = LocationId::new("loc-1")?;
//! let patient = PatientId::new("patient-1")?;
//! // let wrong: LocationId = patient;  // Compile error!
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod result;
pub mod roster;
pub mod units;

// Re-export commonly used types for convenience
pub use errors::{Dhis2Error, MedsyncError, OpenMrsError, SyncStage};
pub use ids::{EncounterId, LocationId, PatientId};
pub use result::Result;
pub use roster::{parse_roster, read_location_roster};
pub use units::UnitMap;
