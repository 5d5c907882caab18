//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Medsync configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Load configuration
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Validate configuration
        match config.validate() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Log Level: {}", config.application.log_level);
                println!("  OpenMRS Server: {}", config.openmrs.base_url);
                println!(
                    "  Encounter Types: {:?}",
                    config.openmrs.encounter_type_ids
                );
                println!("  DHIS2 Server: {}", config.dhis2.base_url);
                println!("  Roster Path: {}", config.sync.roster_path.display());
                println!("  Staging Directory: {}", config.sync.staging_dir.display());
                println!("  Progress Path: {}", config.sync.progress_path.display());
                println!("  Snapshot Path: {}", config.sync.snapshot_path.display());
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2) // Configuration error exit code
            }
        }
    }
}
