//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::MedsyncConfig;
use crate::config::secret_string;
use crate::domain::errors::MedsyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into MedsyncConfig
/// 4. Applies environment variable overrides (MEDSYNC_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use medsync::config::loader::load_config;
///
/// let config = load_config("medsync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<MedsyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MedsyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        MedsyncError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    // Perform environment variable substitution
    let contents = substitute_env_vars(&contents)?;

    // Parse TOML
    let mut config: MedsyncConfig = toml::from_str(&contents)
        .map_err(|e| MedsyncError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    // Apply environment variable overrides
    apply_env_overrides(&mut config);

    // Validate configuration
    config.validate().map_err(|e| {
        MedsyncError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are skipped so a placeholder mentioned in a comment does not
/// have to be set.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(MedsyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using MEDSYNC_* prefix
///
/// Environment variables follow the pattern: MEDSYNC_<SECTION>_<KEY>
/// For example: MEDSYNC_OPENMRS_BASE_URL, MEDSYNC_SYNC_ROSTER_PATH
fn apply_env_overrides(config: &mut MedsyncConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("MEDSYNC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // OpenMRS overrides
    if let Ok(val) = std::env::var("MEDSYNC_OPENMRS_BASE_URL") {
        config.openmrs.base_url = val;
    }
    if let Ok(val) = std::env::var("MEDSYNC_OPENMRS_USERNAME") {
        config.openmrs.username = val;
    }
    if let Ok(val) = std::env::var("MEDSYNC_OPENMRS_PASSWORD") {
        config.openmrs.password = secret_string(val);
    }
    if let Ok(val) = std::env::var("MEDSYNC_OPENMRS_ENCOUNTER_TYPE_IDS") {
        config.openmrs.encounter_type_ids = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Ok(val) = std::env::var("MEDSYNC_OPENMRS_TIMEOUT_SECS") {
        if let Ok(secs) = val.parse() {
            config.openmrs.timeout_secs = secs;
        }
    }

    // DHIS2 overrides
    if let Ok(val) = std::env::var("MEDSYNC_DHIS2_BASE_URL") {
        config.dhis2.base_url = val;
    }
    if let Ok(val) = std::env::var("MEDSYNC_DHIS2_USERNAME") {
        config.dhis2.username = val;
    }
    if let Ok(val) = std::env::var("MEDSYNC_DHIS2_PASSWORD") {
        config.dhis2.password = secret_string(val);
    }

    // Sync path overrides
    if let Ok(val) = std::env::var("MEDSYNC_SYNC_ROSTER_PATH") {
        config.sync.roster_path = val.into();
    }
    if let Ok(val) = std::env::var("MEDSYNC_SYNC_STAGING_DIR") {
        config.sync.staging_dir = val.into();
    }
    if let Ok(val) = std::env::var("MEDSYNC_SYNC_PROGRESS_PATH") {
        config.sync.progress_path = val.into();
    }
    if let Ok(val) = std::env::var("MEDSYNC_SYNC_SNAPSHOT_PATH") {
        config.sync.snapshot_path = val.into();
    }

    // Logging overrides
    if let Ok(val) = std::env::var("MEDSYNC_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("MEDSYNC_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID_TOML: &str = r#"
[openmrs]
base_url = "https://openmrs.example.org/openmrs"
username = "sync"
password = "secret"

[dhis2]
base_url = "https://dhis2.example.org"
username = "admin"
password = "district"
"#;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("MEDSYNC_TEST_VAR", "test_value");
        let input = "password = \"${MEDSYNC_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("MEDSYNC_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("MEDSYNC_MISSING_VAR");
        let input = "password = \"${MEDSYNC_MISSING_VAR}\"";
        assert!(substitute_env_vars(input).is_err());
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("MEDSYNC_COMMENTED_VAR");
        let input = "# set ${MEDSYNC_COMMENTED_VAR} before running\nname = \"medsync\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(VALID_TOML.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.openmrs.base_url, "https://openmrs.example.org/openmrs");
        assert_eq!(config.dhis2.username, "admin");
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"openmrs = = broken").unwrap();
        temp_file.flush().unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }
}
