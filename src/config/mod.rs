//! Configuration management for medsync.
//!
//! TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! medsync uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `MEDSYNC_*` environment variable overrides
//! - Default values for optional settings
//! - Validation on load
//! - Type-safe, immutable configuration structs
//!
//! # Example Configuration
//!
//! ```toml
//! [openmrs]
//! base_url = "https://openmrs.example.org/openmrs"
//! username = "sync"
//! password = "${MEDSYNC_OPENMRS_PASSWORD}"
//! encounter_type_ids = []
//!
//! [dhis2]
//! base_url = "https://dhis2.example.org"
//! username = "admin"
//! password = "${MEDSYNC_DHIS2_PASSWORD}"
//!
//! [sync]
//! roster_path = "locations.txt"
//! staging_dir = "patients_to_sync"
//! progress_path = "logs/progress.json"
//! snapshot_path = "encounters_to_process.json"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, Dhis2Config, LoggingConfig, MedsyncConfig, OpenMrsConfig, SyncConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
