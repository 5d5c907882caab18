//! Unit-of-work map
//!
//! [`UnitMap`] holds the units fetched for one location run: each patient
//! mapped to the ordered list of its encounter identifiers. Iteration order is
//! the order units arrived from the fetch, and the map serializes to a plain
//! JSON object in that same order, so the snapshot on disk reads back in the
//! order the processing loop will walk.

use crate::domain::ids::{EncounterId, PatientId};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered map of patient to encounter identifiers for one location run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitMap {
    entries: Vec<(PatientId, Vec<EncounterId>)>,
}

impl UnitMap {
    /// Creates an empty unit map
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of units (patients) in the map
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the map holds no units
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a unit, preserving arrival order
    ///
    /// A repeated patient replaces its encounter list in place rather than
    /// creating a second entry, keeping one unit per patient.
    pub fn insert(&mut self, patient: PatientId, encounters: Vec<EncounterId>) {
        if let Some(entry) = self.entries.iter_mut().find(|(p, _)| *p == patient) {
            entry.1 = encounters;
        } else {
            self.entries.push((patient, encounters));
        }
    }

    /// Append one encounter to a patient's list, creating the unit if absent
    pub fn push_encounter(&mut self, patient: PatientId, encounter: EncounterId) {
        if let Some(entry) = self.entries.iter_mut().find(|(p, _)| *p == patient) {
            entry.1.push(encounter);
        } else {
            self.entries.push((patient, vec![encounter]));
        }
    }

    /// Encounter list for a patient, if present
    pub fn get(&self, patient: &PatientId) -> Option<&[EncounterId]> {
        self.entries
            .iter()
            .find(|(p, _)| p == patient)
            .map(|(_, e)| e.as_slice())
    }

    /// Iterate units in arrival order
    pub fn iter(&self) -> impl Iterator<Item = (&PatientId, &[EncounterId])> {
        self.entries.iter().map(|(p, e)| (p, e.as_slice()))
    }
}

impl FromIterator<(PatientId, Vec<EncounterId>)> for UnitMap {
    fn from_iter<I: IntoIterator<Item = (PatientId, Vec<EncounterId>)>>(iter: I) -> Self {
        let mut map = UnitMap::new();
        for (patient, encounters) in iter {
            map.insert(patient, encounters);
        }
        map
    }
}

impl Serialize for UnitMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (patient, encounters) in &self.entries {
            map.serialize_entry(patient, encounters)?;
        }
        map.end()
    }
}

struct UnitMapVisitor;

impl<'de> Visitor<'de> for UnitMapVisitor {
    type Value = UnitMap;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of patient id to encounter id list")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = UnitMap::new();
        while let Some((patient, encounters)) =
            access.next_entry::<PatientId, Vec<EncounterId>>()?
        {
            map.insert(patient, encounters);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for UnitMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(UnitMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn patient(s: &str) -> PatientId {
        PatientId::from_str(s).unwrap()
    }

    fn encounter(s: &str) -> EncounterId {
        EncounterId::from_str(s).unwrap()
    }

    #[test]
    fn test_insert_preserves_arrival_order() {
        let mut map = UnitMap::new();
        map.insert(patient("P2"), vec![encounter("E3")]);
        map.insert(patient("P1"), vec![encounter("E1"), encounter("E2")]);

        let order: Vec<&str> = map.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(order, vec!["P2", "P1"]);
    }

    #[test]
    fn test_insert_replaces_existing_patient() {
        let mut map = UnitMap::new();
        map.insert(patient("P1"), vec![encounter("E1")]);
        map.insert(patient("P1"), vec![encounter("E2")]);

        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&patient("P1")), Some(&[encounter("E2")][..]));
    }

    #[test]
    fn test_push_encounter_appends() {
        let mut map = UnitMap::new();
        map.push_encounter(patient("P1"), encounter("E1"));
        map.push_encounter(patient("P1"), encounter("E2"));
        map.push_encounter(patient("P2"), encounter("E3"));

        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get(&patient("P1")),
            Some(&[encounter("E1"), encounter("E2")][..])
        );
    }

    #[test]
    fn test_serializes_as_json_object_in_order() {
        let mut map = UnitMap::new();
        map.insert(patient("P1"), vec![encounter("E1"), encounter("E2")]);
        map.insert(patient("P2"), vec![encounter("E3")]);

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"P1":["E1","E2"],"P2":["E3"]}"#);
    }

    #[test]
    fn test_round_trips_through_json() {
        let mut map = UnitMap::new();
        map.insert(patient("P2"), vec![encounter("E3")]);
        map.insert(patient("P1"), vec![encounter("E1")]);

        let json = serde_json::to_string(&map).unwrap();
        let back: UnitMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);

        let order: Vec<&str> = back.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(order, vec!["P2", "P1"]);
    }

    #[test]
    fn test_empty_map() {
        let map = UnitMap::new();
        assert!(map.is_empty());
        assert_eq!(serde_json::to_string(&map).unwrap(), "{}");
    }
}
