//! Domain error types
//!
//! Error hierarchy for medsync. All errors are domain-specific and don't
//! expose third-party types. There is no local recovery anywhere in the core:
//! every fatal condition propagates to the process boundary, where it is
//! logged with its location and stage context before the process exits.

use crate::domain::ids::LocationId;
use std::fmt;
use thiserror::Error;

/// Main medsync error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum MedsyncError {
    /// Configuration-related errors (bad TOML, missing roster, empty roster)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// OpenMRS source-store errors
    #[error("OpenMRS error: {0}")]
    OpenMrs(#[from] OpenMrsError),

    /// DHIS2 destination errors
    #[error("DHIS2 error: {0}")]
    Dhis2(#[from] Dhis2Error),

    /// Staging directory could not be cleared
    #[error("Staging error: {0}")]
    Staging(String),

    /// Snapshot could not be written or read back
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Fetch produced no usable result
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Per-unit processing failed
    #[error("Processing error: {0}")]
    Processing(String),

    /// Progress document could not be persisted
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A stage of a location run failed
    ///
    /// Wraps the underlying error with the location and stage so the batch
    /// driver and the exit-code mapping can act on an explicit, typed value
    /// instead of an anonymous propagated exception.
    #[error("Sync failed for location {location} at stage {stage}: {source}")]
    SyncStageFailed {
        location: LocationId,
        stage: SyncStage,
        #[source]
        source: Box<MedsyncError>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl MedsyncError {
    /// Wrap an error with the location and stage it occurred in
    pub fn at_stage(location: &LocationId, stage: SyncStage, source: MedsyncError) -> Self {
        MedsyncError::SyncStageFailed {
            location: location.clone(),
            stage,
            source: Box::new(source),
        }
    }

    /// The innermost error, unwrapping any stage context
    pub fn root_cause(&self) -> &MedsyncError {
        match self {
            MedsyncError::SyncStageFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Stages of a single location run
///
/// Mirrors the orchestrator state machine; carried on [`MedsyncError`] so a
/// failure names exactly where in the run it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    /// Clearing the staging directory
    StagingClear,
    /// Loading or initializing the progress entry for the location
    ProgressInit,
    /// Connecting to the source store
    Connect,
    /// Fetching the location's patient encounters
    Fetch,
    /// Writing and reading back the encounter snapshot
    Snapshot,
    /// Per-unit processing and progress recording
    Process,
    /// Handing staged artifacts off for upload
    Upload,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStage::StagingClear => "staging-clear",
            SyncStage::ProgressInit => "progress-init",
            SyncStage::Connect => "connect",
            SyncStage::Fetch => "fetch",
            SyncStage::Snapshot => "snapshot",
            SyncStage::Process => "process",
            SyncStage::Upload => "upload",
        };
        write!(f, "{name}")
    }
}

/// OpenMRS-specific errors
///
/// Errors that occur when talking to the OpenMRS server. These don't expose
/// third-party HTTP client types.
#[derive(Debug, Error)]
pub enum OpenMrsError {
    /// Failed to connect to OpenMRS server
    #[error("Failed to connect to OpenMRS server: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid response from server
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Encounter query failed
    #[error("Encounter query failed: {0}")]
    QueryFailed(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

/// DHIS2-specific errors
///
/// Errors that occur when handing staged artifacts off to DHIS2.
#[derive(Debug, Error)]
pub enum Dhis2Error {
    /// Failed to connect to DHIS2 server
    #[error("Failed to connect to DHIS2 server: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Upload of a staged artifact was rejected
    #[error("Upload failed: {status} - {message}")]
    UploadFailed { status: u16, message: String },

    /// Staged artifact could not be read
    #[error("Staged file unreadable: {0}")]
    StagedFileUnreadable(String),

    /// Invalid response from server
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for MedsyncError {
    fn from(err: std::io::Error) -> Self {
        MedsyncError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for MedsyncError {
    fn from(err: serde_json::Error) -> Self {
        MedsyncError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for MedsyncError {
    fn from(err: toml::de::Error) -> Self {
        MedsyncError::Configuration(format!("TOML parse error: {err}"))
    }
}
