//! JSON file backed repository.
//!
//! The whole state is one small document, rewritten after every change:
//!
//! ```json
//! {
//!   "alarm_status": "NO_ALARM",
//!   "arming_status": "DISARMED",
//!   "cat_detected": false,
//!   "sensors": [ { "id": "...", "name": "Front door", "sensor_type": "DOOR", "active": false } ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use super::SecurityRepository;
use crate::error::Result;
use crate::sensors::Sensor;
use crate::status::{AlarmStatus, ArmingStatus};

/// Persisted alarm state
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub alarm_status: AlarmStatus,
    #[serde(default)]
    pub arming_status: ArmingStatus,
    /// Result of the last camera frame; arming home while set raises the alarm
    #[serde(default)]
    pub cat_detected: bool,
    #[serde(default)]
    pub sensors: Vec<Sensor>,
}

impl PersistedState {
    /// Load from file. A missing or unreadable file yields the default state.
    pub fn load(path: &Path) -> Self {
        match fs::read(path) {
            Ok(bytes) => match serde_json::from_slice::<PersistedState>(&bytes) {
                Ok(state) => {
                    info!(
                        "[Store] Loaded {} sensors from {:?}",
                        state.sensors.len(),
                        path
                    );
                    state
                }
                Err(e) => {
                    warn!("[Store] Failed to parse state file {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("[Store] No state file at {:?} (first run)", path);
                Self::default()
            }
            Err(e) => {
                error!("[Store] Failed to read state file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Add or replace a sensor by id
    pub fn upsert(&mut self, sensor: &Sensor) {
        match self.sensors.iter_mut().find(|s| s.id() == sensor.id()) {
            Some(existing) => *existing = sensor.clone(),
            None => self.sensors.push(sensor.clone()),
        }
    }

    /// Remove a sensor by id
    pub fn remove(&mut self, sensor: &Sensor) {
        self.sensors.retain(|s| s != sensor);
    }
}

/// Repository that keeps the state in memory and writes it through to disk.
pub struct JsonFileRepository {
    path: PathBuf,
    state: PersistedState,
}

impl JsonFileRepository {
    /// Open the repository, loading any existing state at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = PersistedState::load(&path);
        Self { path, state }
    }

    fn persist(&self) -> Result<()> {
        if let Err(e) = self.state.save(&self.path) {
            error!("[Store] Failed to save state to {:?}: {}", self.path, e);
            return Err(e);
        }
        Ok(())
    }
}

impl SecurityRepository for JsonFileRepository {
    fn alarm_status(&self) -> Result<AlarmStatus> {
        Ok(self.state.alarm_status)
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<()> {
        self.state.alarm_status = status;
        self.persist()
    }

    fn arming_status(&self) -> Result<ArmingStatus> {
        Ok(self.state.arming_status)
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<()> {
        self.state.arming_status = status;
        self.persist()
    }

    fn sensors(&self) -> Result<Vec<Sensor>> {
        let mut sensors = self.state.sensors.clone();
        sensors.sort();
        Ok(sensors)
    }

    fn add_sensor(&mut self, sensor: &Sensor) -> Result<()> {
        self.state.upsert(sensor);
        self.persist()
    }

    fn remove_sensor(&mut self, sensor: &Sensor) -> Result<()> {
        self.state.remove(sensor);
        self.persist()
    }

    fn update_sensor(&mut self, sensor: &Sensor) -> Result<()> {
        self.state.upsert(sensor);
        self.persist()
    }

    fn cat_detected(&self) -> Result<bool> {
        Ok(self.state.cat_detected)
    }

    fn set_cat_detected(&mut self, detected: bool) -> Result<()> {
        self.state.cat_detected = detected;
        self.persist()
    }
}
