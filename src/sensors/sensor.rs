//! Sensor records owned by the repository.
//!
//! A sensor's identity, name and type are fixed when it is created. Only the
//! `active` flag changes afterwards, either through the engine's activation
//! handling or through the bulk reset performed when the system is armed.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

/// Kind of monitored device.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum SensorType {
    Door,
    Window,
    Motion,
}

/// A door, window or motion sensor.
///
/// Equality and hashing use the id only, so a record with a flipped `active`
/// flag still identifies the same sensor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Sensor {
    id: Uuid,
    name: String,
    sensor_type: SensorType,
    active: bool,
}

impl Sensor {
    /// Create a new inactive sensor with a fresh identity.
    pub fn new(name: impl Into<String>, sensor_type: SensorType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            sensor_type,
            active: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sensor_type(&self) -> SensorType {
        self.sensor_type
    }

    /// Get the current activation state.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Set the activation state. The caller is responsible for persisting it.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl PartialEq for Sensor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Sensor {}

impl Hash for Sensor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Ord for Sensor {
    // Listing order: name, then type, then id to keep it total.
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then(self.sensor_type.cmp(&other.sensor_type))
            .then(self.id.cmp(&other.id))
    }
}

impl PartialOrd for Sensor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_sensor_is_inactive() {
        let sensor = Sensor::new("Front door", SensorType::Door);
        assert!(!sensor.is_active());
        assert_eq!(sensor.name(), "Front door");
        assert_eq!(sensor.sensor_type(), SensorType::Door);
    }

    #[test]
    fn test_identity_ignores_active_flag() {
        let sensor = Sensor::new("Hall", SensorType::Motion);
        let mut flipped = sensor.clone();
        flipped.set_active(true);
        assert_eq!(sensor, flipped);

        let other = Sensor::new("Hall", SensorType::Motion);
        assert_ne!(sensor, other);
    }

    #[test]
    fn test_ordering_by_name_then_type() {
        let mut sensors = vec![
            Sensor::new("Kitchen", SensorType::Window),
            Sensor::new("Attic", SensorType::Motion),
            Sensor::new("Kitchen", SensorType::Door),
        ];
        sensors.sort();

        assert_eq!(sensors[0].name(), "Attic");
        assert_eq!(sensors[1].sensor_type(), SensorType::Door);
        assert_eq!(sensors[2].sensor_type(), SensorType::Window);
    }

    #[test]
    fn test_sensor_type_parses_any_case() {
        assert_eq!(SensorType::from_str("window").unwrap(), SensorType::Window);
        assert_eq!(SensorType::from_str("MOTION").unwrap(), SensorType::Motion);
        assert!(SensorType::from_str("garage").is_err());
    }
}
