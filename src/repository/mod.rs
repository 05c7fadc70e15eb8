//! Persistence boundary for alarm state and sensors.
//!
//! The engine never stores status or sensors itself. Everything goes through
//! a [`SecurityRepository`], which makes the engine testable against
//! in-memory fakes while the binary runs on [`JsonFileRepository`].

pub mod json_file;

pub use json_file::JsonFileRepository;

use crate::error::Result;
use crate::sensors::Sensor;
use crate::status::{AlarmStatus, ArmingStatus};

/// Storage for the current alarm status, arming status and sensor set.
///
/// Sensors are identified by id. Adding or updating a sensor whose id is
/// already stored replaces the stored record.
pub trait SecurityRepository {
    fn alarm_status(&self) -> Result<AlarmStatus>;

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<()>;

    fn arming_status(&self) -> Result<ArmingStatus>;

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<()>;

    /// Snapshot of every stored sensor.
    fn sensors(&self) -> Result<Vec<Sensor>>;

    fn add_sensor(&mut self, sensor: &Sensor) -> Result<()>;

    fn remove_sensor(&mut self, sensor: &Sensor) -> Result<()>;

    /// Persist a changed sensor record (usually a flipped `active` flag).
    fn update_sensor(&mut self, sensor: &Sensor) -> Result<()>;

    /// Whether the most recently analysed camera frame contained a cat.
    fn cat_detected(&self) -> Result<bool>;

    fn set_cat_detected(&mut self, detected: bool) -> Result<()>;
}
