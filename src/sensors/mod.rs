//! Sensor records and their types.
//!
//! Sensors are owned by the repository; the engine only reads them and flips
//! their `active` flag.

pub mod sensor;

pub use sensor::{Sensor, SensorType};
