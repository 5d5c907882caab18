//! Location roster parsing
//!
//! The roster is a newline-delimited list of location identifiers. Lines are
//! trimmed and blank lines dropped; an empty result is a configuration error
//! because a run with no locations would silently do nothing.

use crate::domain::errors::MedsyncError;
use crate::domain::ids::LocationId;
use crate::domain::result::Result;
use std::fs;
use std::path::Path;

/// Read location IDs from a roster file
///
/// Order of the returned list is the processing order. Duplicate entries are
/// kept as-is; the progress document makes a repeated location a cheap no-op.
///
/// # Errors
///
/// Returns `MedsyncError::Configuration` if the file is missing, unreadable,
/// or contains no identifiers after trimming.
pub fn read_location_roster(path: impl AsRef<Path>) -> Result<Vec<LocationId>> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(MedsyncError::Configuration(format!(
            "Location roster not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        MedsyncError::Configuration(format!(
            "Failed to read location roster {}: {}",
            path.display(),
            e
        ))
    })?;

    let locations = parse_roster(&contents)?;

    tracing::info!(
        path = %path.display(),
        count = locations.len(),
        "Loaded location roster"
    );

    Ok(locations)
}

/// Parse roster contents into location IDs
///
/// Split out from file handling so the trimming rules are testable on their
/// own.
pub fn parse_roster(contents: &str) -> Result<Vec<LocationId>> {
    let locations: Vec<LocationId> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| LocationId::new(line).map_err(MedsyncError::Configuration))
        .collect::<Result<_>>()?;

    if locations.is_empty() {
        return Err(MedsyncError::Configuration(
            "No location IDs found in roster".to_string(),
        ));
    }

    Ok(locations)
}
