//! Security alarm library.
//!
//! This library provides the alarm decision engine and the adapters a host
//! needs to run it: a JSON file repository, a camera frame handle with a
//! sampling cat detector, and a per-data-file lock.

pub mod config;
pub mod data_lock;
pub mod error;
pub mod image;
pub mod repository;
pub mod sensors;
pub mod service;
pub mod status;

pub use error::{Result, SecurityError};
pub use image::{Image, ImageService};
pub use repository::SecurityRepository;
pub use sensors::{Sensor, SensorType};
pub use service::{SecurityService, StatusListener};
pub use status::{AlarmStatus, ArmingStatus};
