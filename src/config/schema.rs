//! Configuration schema types
//!
//! Defines the typed, immutable configuration structure for medsync. Built
//! once at startup from the TOML file and passed by reference into the
//! collaborators that need it.

use crate::config::SecretString;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main medsync configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedsyncConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// OpenMRS source-store configuration
    pub openmrs: OpenMrsConfig,

    /// DHIS2 destination configuration
    pub dhis2: Dhis2Config,

    /// Sync pipeline paths and settings
    #[serde(default)]
    pub sync: SyncConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MedsyncConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.openmrs.validate()?;
        self.dhis2.validate()?;
        self.sync.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// OpenMRS source-store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenMrsConfig {
    /// Base URL of the OpenMRS server, e.g. `https://openmrs.example.org/openmrs`
    pub base_url: String,

    /// Username for basic auth
    pub username: String,

    /// Password for basic auth
    pub password: SecretString,

    /// Encounter type UUIDs to fetch; empty means all types
    #[serde(default)]
    pub encounter_type_ids: Vec<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl OpenMrsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("openmrs.base_url must not be empty".to_string());
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "openmrs.base_url must start with http:// or https://, got '{}'",
                self.base_url
            ));
        }
        if self.username.is_empty() {
            return Err("openmrs.username must not be empty".to_string());
        }
        if self.password.expose_secret().is_empty() {
            return Err("openmrs.password must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("openmrs.timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// DHIS2 destination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dhis2Config {
    /// Base URL of the DHIS2 server, e.g. `https://dhis2.example.org`
    pub base_url: String,

    /// Username for basic auth
    pub username: String,

    /// Password for basic auth
    pub password: SecretString,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Dhis2Config {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("dhis2.base_url must not be empty".to_string());
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "dhis2.base_url must start with http:// or https://, got '{}'",
                self.base_url
            ));
        }
        if self.username.is_empty() {
            return Err("dhis2.username must not be empty".to_string());
        }
        if self.password.expose_secret().is_empty() {
            return Err("dhis2.password must not be empty".to_string());
        }
        Ok(())
    }
}

/// Sync pipeline paths and settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Location roster file, one location ID per line
    #[serde(default = "default_roster_path")]
    pub roster_path: PathBuf,

    /// Staging directory for per-patient artifacts awaiting upload
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// Durable progress document path
    #[serde(default = "default_progress_path")]
    pub progress_path: PathBuf,

    /// Durable encounter snapshot path
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            roster_path: default_roster_path(),
            staging_dir: default_staging_dir(),
            progress_path: default_progress_path(),
            snapshot_path: default_snapshot_path(),
        }
    }
}

impl SyncConfig {
    fn validate(&self) -> Result<(), String> {
        if self.roster_path.as_os_str().is_empty() {
            return Err("sync.roster_path must not be empty".to_string());
        }
        if self.staging_dir.as_os_str().is_empty() {
            return Err("sync.staging_dir must not be empty".to_string());
        }
        if self.progress_path.as_os_str().is_empty() {
            return Err("sync.progress_path must not be empty".to_string());
        }
        if self.snapshot_path.as_os_str().is_empty() {
            return Err("sync.snapshot_path must not be empty".to_string());
        }
        if self.progress_path == self.snapshot_path {
            return Err("sync.progress_path and sync.snapshot_path must differ".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Log file rotation (daily, hourly)
    #[serde(default = "default_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path must not be empty when file logging is enabled"
                .to_string());
        }
        match self.local_rotation.as_str() {
            "daily" | "hourly" => Ok(()),
            other => Err(format!(
                "Invalid logging.local_rotation '{other}'. Must be 'daily' or 'hourly'"
            )),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_roster_path() -> PathBuf {
    PathBuf::from("locations.txt")
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("patients_to_sync")
}

fn default_progress_path() -> PathBuf {
    PathBuf::from("logs/progress.json")
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("encounters_to_process.json")
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}
