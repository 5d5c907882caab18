//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers flowing through the sync pipeline.
//! Each type rejects empty values and prevents mixing IDs of different kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Facility (location) identifier newtype wrapper
///
/// One location is synchronized as one unit of batch work. The value is an
/// opaque string taken from the location roster.
///
/// # Examples
///
/// ```
/// use medsync::domain::ids::LocationId;
/// use std::str::FromStr;
///
/// let location = LocationId::from_str("8d6c993e-c2cc-11de-8d13-0010c6dffd0f").unwrap();
/// assert_eq!(location.as_str(), "8d6c993e-c2cc-11de-8d13-0010c6dffd0f");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationId(String);

impl LocationId {
    /// Creates a new LocationId from a string
    ///
    /// Returns `Err` if the value is empty or whitespace-only.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Location ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the location ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LocationId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for LocationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Patient identifier newtype wrapper
///
/// One patient together with its encounter list forms one unit of work for a
/// location run. Produced by the source fetch.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new PatientId from a string
    ///
    /// Returns `Err` if the value is empty or whitespace-only.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Patient ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the patient ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Encounter identifier newtype wrapper
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EncounterId(String);

impl EncounterId {
    /// Creates a new EncounterId from a string
    ///
    /// Returns `Err` if the value is empty or whitespace-only.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Encounter ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the encounter ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for EncounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EncounterId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for EncounterId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_id_creation() {
        let id = LocationId::new("8d6c993e-c2cc-11de-8d13-0010c6dffd0f").unwrap();
        assert_eq!(id.as_str(), "8d6c993e-c2cc-11de-8d13-0010c6dffd0f");
    }

    #[test]
    fn test_location_id_empty_fails() {
        assert!(LocationId::new("").is_err());
        assert!(LocationId::new("   ").is_err());
    }

    #[test]
    fn test_location_id_display() {
        let id = LocationId::new("loc-1").unwrap();
        assert_eq!(format!("{}", id), "loc-1");
    }

    #[test]
    fn test_location_id_from_str() {
        let id: LocationId = "loc-1".parse().unwrap();
        assert_eq!(id.as_str(), "loc-1");
    }

    #[test]
    fn test_patient_id_creation() {
        let id = PatientId::new("patient-42").unwrap();
        assert_eq!(id.as_str(), "patient-42");
    }

    #[test]
    fn test_patient_id_empty_fails() {
        assert!(PatientId::new("").is_err());
        assert!(PatientId::new("  ").is_err());
    }

    #[test]
    fn test_encounter_id_creation() {
        let id = EncounterId::new("enc-7").unwrap();
        assert_eq!(id.as_str(), "enc-7");
    }

    #[test]
    fn test_encounter_id_empty_fails() {
        assert!(EncounterId::new("").is_err());
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = PatientId::new("patient-42").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"patient-42\"");

        let back: PatientId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
