//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "medsync.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Medsync configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        // Generate configuration content
        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        // Write to file
        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set MEDSYNC_OPENMRS_PASSWORD");
                println!("     - Set MEDSYNC_DHIS2_PASSWORD");
                println!("  3. List your location IDs in locations.txt, one per line");
                println!("  4. Validate configuration: medsync validate-config");
                println!("  5. Run sync: medsync sync");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Medsync Configuration File
# OpenMRS to DHIS2 encounter sync tool

[application]
log_level = "info"

[openmrs]
base_url = "https://openmrs.example.org/openmrs"
username = "admin"
password = "${OPENMRS_PASSWORD}"

[dhis2]
base_url = "https://dhis2.example.org"
username = "admin"
password = "${DHIS2_PASSWORD}"

[sync]
roster_path = "locations.txt"
staging_dir = "patients_to_sync"
progress_path = "logs/progress.json"
snapshot_path = "encounters_to_process.json"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Medsync Configuration File
# OpenMRS to DHIS2 encounter sync tool
#
# Values of the form ${VAR} are substituted from the environment at load
# time. Any MEDSYNC_* environment variable overrides its config key, e.g.
# MEDSYNC_OPENMRS_BASE_URL overrides [openmrs].base_url.

[application]
# Log level: trace, debug, info, warn, error
log_level = "info"

[openmrs]
base_url = "https://openmrs.example.org/openmrs"
username = "admin"
password = "${OPENMRS_PASSWORD}"
# Only encounters of these types are fetched. Empty means all types.
encounter_type_ids = [
    "e22e39fd-7db2-45e7-80f1-60fa0d5a4378",
]
# HTTP request timeout in seconds
timeout_secs = 30

[dhis2]
base_url = "https://dhis2.example.org"
username = "admin"
password = "${DHIS2_PASSWORD}"
timeout_secs = 30

[sync]
# One location ID per line; blank lines are ignored
roster_path = "locations.txt"
# Per-patient staging files are written here and cleared before each location
staging_dir = "patients_to_sync"
# Durable progress document; delete it to force a full re-sync
progress_path = "logs/progress.json"
# Snapshot of the fetched encounter map for the current location
snapshot_path = "encounters_to_process.json"

[logging]
# Write JSON logs to rotating files in addition to the console
local_enabled = false
local_path = "logs"
# Rotation: daily or hourly
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parses() {
        let content = InitArgs::generate_minimal_config();
        let parsed: toml::Value = toml::from_str(&content).unwrap();
        assert!(parsed.get("openmrs").is_some());
        assert!(parsed.get("dhis2").is_some());
        assert!(parsed.get("sync").is_some());
    }

    #[test]
    fn test_example_config_parses() {
        let content = InitArgs::generate_config_with_examples();
        let parsed: toml::Value = toml::from_str(&content).unwrap();
        assert!(parsed.get("logging").is_some());
        assert_eq!(
            parsed["sync"]["roster_path"].as_str(),
            Some("locations.txt")
        );
    }
}
