//! Alarm decision engine.
//!
//! Turns sensor events, camera frames and arming requests into alarm-status
//! transitions. The engine owns no alarm state of its own: status, sensors
//! and the result of the most recent image analysis live in the
//! [`SecurityRepository`], and the engine only keeps its listener registry.
//!
//! Sensor rules, evaluated after the sensor record has been persisted:
//!
//! | arming   | alarm   | event      | result                              |
//! |----------|---------|------------|-------------------------------------|
//! | disarmed | ALARM   | any        | PENDING_ALARM                       |
//! | disarmed | other   | any        | unchanged                           |
//! | armed    | ALARM   | any        | unchanged                           |
//! | armed    | NO      | activate   | PENDING_ALARM                       |
//! | armed    | PENDING | activate   | ALARM                               |
//! | armed    | PENDING | deactivate | NO_ALARM once every sensor is idle  |
//!
//! Deactivating a sensor that was already inactive never changes the status.

use std::sync::Arc;

use log::{debug, info};

use super::listener::StatusListener;
use crate::error::Result;
use crate::image::{Image, ImageService};
use crate::repository::SecurityRepository;
use crate::sensors::Sensor;
use crate::status::{AlarmStatus, ArmingStatus};

/// Confidence (percent) an image service must reach to report a cat.
pub const DEFAULT_CAT_CONFIDENCE_THRESHOLD: f32 = 50.0;

pub struct SecurityService<R, I> {
    repository: R,
    image_service: I,
    confidence_threshold: f32,
    listeners: Vec<Arc<dyn StatusListener>>,
}

impl<R, I> SecurityService<R, I>
where
    R: SecurityRepository,
    I: ImageService,
{
    pub fn new(repository: R, image_service: I) -> Self {
        Self {
            repository,
            image_service,
            confidence_threshold: DEFAULT_CAT_CONFIDENCE_THRESHOLD,
            listeners: Vec::new(),
        }
    }

    /// Override the confidence threshold passed to the image service.
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    // ── Sensor events ─────────────────────────────────────────

    /// Set a sensor's activation state, persist it, and apply the alarm rules.
    ///
    /// `sensor` is updated in place so the caller's copy matches the stored one.
    pub fn change_sensor_activation(&mut self, sensor: &mut Sensor, active: bool) -> Result<()> {
        let was_active = sensor.is_active();
        sensor.set_active(active);
        self.repository.update_sensor(sensor)?;

        if !was_active && !active {
            debug!(
                "[Alarm] Sensor '{}' already inactive, alarm status unchanged",
                sensor.name()
            );
        } else {
            self.evaluate_sensor_change(active)?;
        }

        self.notify_sensors_changed()
    }

    /// Persist a sensor record as reported by the device and apply the alarm
    /// rules to its reported state.
    ///
    /// Unlike [`change_sensor_activation`](Self::change_sensor_activation)
    /// there is no previous value to compare with, so an inactive report is
    /// always evaluated as a deactivation.
    pub fn apply_sensor_state(&mut self, sensor: &Sensor) -> Result<()> {
        self.repository.update_sensor(sensor)?;
        self.evaluate_sensor_change(sensor.is_active())?;
        self.notify_sensors_changed()
    }

    fn evaluate_sensor_change(&mut self, active: bool) -> Result<()> {
        let arming = self.repository.arming_status()?;
        let alarm = self.repository.alarm_status()?;

        match (arming.is_armed(), alarm) {
            // Disarmed while still alarming: a new trip downgrades to pending.
            (false, AlarmStatus::Alarm) => self.set_alarm_status(AlarmStatus::PendingAlarm),
            (false, _) => {
                debug!("[Alarm] System disarmed, sensor change ignored");
                Ok(())
            }
            (true, AlarmStatus::Alarm) => {
                debug!("[Alarm] Alarm active, sensor change ignored");
                Ok(())
            }
            (true, current) if active => self.handle_sensor_activated(current),
            (true, current) => self.handle_sensor_deactivated(current),
        }
    }

    fn handle_sensor_activated(&mut self, current: AlarmStatus) -> Result<()> {
        match current {
            AlarmStatus::NoAlarm => self.set_alarm_status(AlarmStatus::PendingAlarm),
            AlarmStatus::PendingAlarm => self.set_alarm_status(AlarmStatus::Alarm),
            AlarmStatus::Alarm => Ok(()),
        }
    }

    fn handle_sensor_deactivated(&mut self, current: AlarmStatus) -> Result<()> {
        if current == AlarmStatus::PendingAlarm && !self.any_sensor_active()? {
            self.set_alarm_status(AlarmStatus::NoAlarm)?;
        }
        Ok(())
    }

    // ── Camera ────────────────────────────────────────────────

    /// Run cat detection on a frame and apply the camera rules.
    pub fn process_image(&mut self, image: &Image) -> Result<()> {
        let cat = self
            .image_service
            .image_contains_cat(image, self.confidence_threshold)?;
        self.repository.set_cat_detected(cat)?;

        if cat {
            if self.repository.arming_status()? == ArmingStatus::ArmedHome {
                self.set_alarm_status(AlarmStatus::Alarm)?;
            } else {
                debug!("[Alarm] Cat detected but system is not armed home");
            }
        } else if !self.any_sensor_active()? {
            self.set_alarm_status(AlarmStatus::NoAlarm)?;
        }

        for listener in &self.listeners {
            listener.cat_detected(cat)?;
        }
        Ok(())
    }

    // ── Arming ────────────────────────────────────────────────

    /// Change the arming mode.
    ///
    /// Disarming clears the alarm. Arming deactivates every sensor directly,
    /// without running the activation rules.
    pub fn set_arming_status(&mut self, status: ArmingStatus) -> Result<()> {
        info!("[Alarm] Arming status -> {}", status);

        if status == ArmingStatus::Disarmed {
            self.set_alarm_status(AlarmStatus::NoAlarm)?;
            self.repository.set_arming_status(status)?;
            return Ok(());
        }

        for mut sensor in self.repository.sensors()? {
            sensor.set_active(false);
            self.repository.update_sensor(&sensor)?;
        }
        self.repository.set_arming_status(status)?;

        if status == ArmingStatus::ArmedHome && self.repository.cat_detected()? {
            info!("[Alarm] Armed home with a cat in view");
            self.set_alarm_status(AlarmStatus::Alarm)?;
        }

        self.notify_sensors_changed()
    }

    // ── Registry ──────────────────────────────────────────────

    pub fn add_sensor(&mut self, sensor: &Sensor) -> Result<()> {
        self.repository.add_sensor(sensor)?;
        self.notify_sensors_changed()
    }

    pub fn remove_sensor(&mut self, sensor: &Sensor) -> Result<()> {
        self.repository.remove_sensor(sensor)?;
        self.notify_sensors_changed()
    }

    /// Register a listener. Registering the same listener twice makes it
    /// receive every notification twice.
    pub fn add_status_listener(&mut self, listener: Arc<dyn StatusListener>) {
        self.listeners.push(listener);
    }

    /// Remove every registration of `listener`.
    pub fn remove_status_listener(&mut self, listener: &Arc<dyn StatusListener>) {
        let target = Arc::as_ptr(listener) as *const ();
        self.listeners.retain(|l| Arc::as_ptr(l) as *const () != target);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn sensors(&self) -> Result<Vec<Sensor>> {
        self.repository.sensors()
    }

    pub fn alarm_status(&self) -> Result<AlarmStatus> {
        self.repository.alarm_status()
    }

    pub fn arming_status(&self) -> Result<ArmingStatus> {
        self.repository.arming_status()
    }

    /// Whether the most recently processed frame contained a cat.
    pub fn cat_detected(&self) -> Result<bool> {
        self.repository.cat_detected()
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repository
    }

    pub fn image_service(&self) -> &I {
        &self.image_service
    }

    // ── Internals ─────────────────────────────────────────────

    fn any_sensor_active(&self) -> Result<bool> {
        Ok(self.repository.sensors()?.iter().any(Sensor::is_active))
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<()> {
        info!("[Alarm] Alarm status -> {}", status);
        self.repository.set_alarm_status(status)?;
        for listener in &self.listeners {
            listener.notify(status)?;
        }
        Ok(())
    }

    fn notify_sensors_changed(&self) -> Result<()> {
        for listener in &self.listeners {
            listener.sensors_changed()?;
        }
        Ok(())
    }
}
