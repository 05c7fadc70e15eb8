//! End-to-end runs of the alarm engine over the JSON file repository.

use parking_lot::Mutex;
use security_alarm::image::SamplingImageService;
use security_alarm::repository::JsonFileRepository;
use security_alarm::{
    AlarmStatus, ArmingStatus, Image, Result, SecurityService, Sensor, SensorType, StatusListener,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Default)]
struct Recorder {
    statuses: Mutex<Vec<AlarmStatus>>,
}

impl StatusListener for Recorder {
    fn notify(&self, status: AlarmStatus) -> Result<()> {
        self.statuses.lock().push(status);
        Ok(())
    }
}

struct TempState {
    dir: PathBuf,
}

impl TempState {
    fn new() -> Self {
        Self {
            dir: std::env::temp_dir().join(format!("security-alarm-it-{}", uuid::Uuid::new_v4())),
        }
    }

    fn file(&self) -> PathBuf {
        self.dir.join("state.json")
    }
}

impl Drop for TempState {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

fn frame() -> Image {
    Image::from_bytes(vec![0x89, b'P', b'N', b'G'])
}

#[test]
fn test_intrusion_is_persisted_across_restarts() {
    let state = TempState::new();
    let recorder = Arc::new(Recorder::default());
    let mut front = Sensor::new("Front door", SensorType::Door);
    let mut hall = Sensor::new("Hall", SensorType::Motion);

    {
        let repo = JsonFileRepository::open(state.file());
        let mut service = SecurityService::new(repo, SamplingImageService::with_seed(0.0, 1));
        service.add_status_listener(recorder.clone());

        service.add_sensor(&front).unwrap();
        service.add_sensor(&hall).unwrap();
        service.set_arming_status(ArmingStatus::ArmedAway).unwrap();
        service.change_sensor_activation(&mut front, true).unwrap();
        service.change_sensor_activation(&mut hall, true).unwrap();
    }

    assert_eq!(
        *recorder.statuses.lock(),
        vec![AlarmStatus::PendingAlarm, AlarmStatus::Alarm]
    );

    // A fresh process sees the same state.
    let repo = JsonFileRepository::open(state.file());
    let mut service = SecurityService::new(repo, SamplingImageService::with_seed(0.0, 1));
    assert_eq!(service.alarm_status().unwrap(), AlarmStatus::Alarm);
    assert_eq!(service.arming_status().unwrap(), ArmingStatus::ArmedAway);
    assert!(service.sensors().unwrap().iter().all(Sensor::is_active));

    // Sticky while armed.
    service.change_sensor_activation(&mut front, false).unwrap();
    service.change_sensor_activation(&mut hall, false).unwrap();
    assert_eq!(service.alarm_status().unwrap(), AlarmStatus::Alarm);

    service.set_arming_status(ArmingStatus::Disarmed).unwrap();
    assert_eq!(service.alarm_status().unwrap(), AlarmStatus::NoAlarm);
}

#[test]
fn test_camera_alarm_with_sampling_detector() {
    let state = TempState::new();
    let repo = JsonFileRepository::open(state.file());
    let mut service = SecurityService::new(repo, SamplingImageService::with_seed(1.0, 42));

    service.set_arming_status(ArmingStatus::ArmedHome).unwrap();
    service.process_image(&frame()).unwrap();

    assert!(service.cat_detected().unwrap());
    assert_eq!(service.alarm_status().unwrap(), AlarmStatus::Alarm);
}

#[test]
fn test_cat_frame_remembered_by_next_invocation() {
    let state = TempState::new();
    {
        let repo = JsonFileRepository::open(state.file());
        let mut service = SecurityService::new(repo, SamplingImageService::with_seed(1.0, 1));
        service.process_image(&frame()).unwrap();
        assert_eq!(service.alarm_status().unwrap(), AlarmStatus::NoAlarm);
    }

    let repo = JsonFileRepository::open(state.file());
    let mut service = SecurityService::new(repo, SamplingImageService::with_seed(0.0, 1));
    assert!(service.cat_detected().unwrap());

    service.set_arming_status(ArmingStatus::ArmedHome).unwrap();
    assert_eq!(service.alarm_status().unwrap(), AlarmStatus::Alarm);
}

#[test]
fn test_clear_frame_resets_alarm_when_sensors_idle() {
    let state = TempState::new();
    let repo = JsonFileRepository::open(state.file());
    let mut service = SecurityService::new(repo, SamplingImageService::with_seed(0.0, 42));
    let mut window = Sensor::new("Window", SensorType::Window);
    service.add_sensor(&window).unwrap();
    service.set_arming_status(ArmingStatus::ArmedHome).unwrap();

    service.change_sensor_activation(&mut window, true).unwrap();
    service.process_image(&frame()).unwrap();
    assert_eq!(service.alarm_status().unwrap(), AlarmStatus::PendingAlarm);

    service.change_sensor_activation(&mut window, false).unwrap();
    assert_eq!(service.alarm_status().unwrap(), AlarmStatus::NoAlarm);
}
