//! Observers of alarm state changes.

use crate::error::Result;
use crate::status::AlarmStatus;
use log::info;

/// Receives alarm-status changes from the engine.
///
/// Callbacks run synchronously on the caller's thread before the engine
/// returns. An error aborts the remaining callbacks and is returned to the
/// caller of the engine operation.
pub trait StatusListener: Send + Sync {
    /// Called after every alarm-status write with the new status.
    fn notify(&self, status: AlarmStatus) -> Result<()>;

    /// Called after every image analysis with its result.
    fn cat_detected(&self, _detected: bool) -> Result<()> {
        Ok(())
    }

    /// Called after the stored sensor set or any sensor's activation changed.
    fn sensors_changed(&self) -> Result<()> {
        Ok(())
    }
}

/// Writes every notification to the log.
#[derive(Debug, Default)]
pub struct LoggingListener;

impl StatusListener for LoggingListener {
    fn notify(&self, status: AlarmStatus) -> Result<()> {
        match status {
            AlarmStatus::Alarm => log::warn!("[Alarm] ALARM raised"),
            other => info!("[Alarm] Status is now {}", other),
        }
        Ok(())
    }

    fn cat_detected(&self, detected: bool) -> Result<()> {
        if detected {
            info!("[Image] Cat detected in camera frame");
        } else {
            info!("[Image] No cat in camera frame");
        }
        Ok(())
    }
}
