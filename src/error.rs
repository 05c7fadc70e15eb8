use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum SecurityError {
    #[error("Image analysis failed: {0}")]
    Image(String),

    #[error("Status listener failed: {0}")]
    Listener(String),

    #[error("Unknown sensor: {0}")]
    UnknownSensor(String),

    #[error("Another process is already using the alarm data file")]
    AlreadyRunning,

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SecurityError>;
