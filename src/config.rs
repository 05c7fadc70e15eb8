use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::service::DEFAULT_CAT_CONFIDENCE_THRESHOLD;

/// Load environment variables from .env file with robust parsing.
/// Handles values with spaces without requiring quotes.
pub fn load_dotenv() {
    load_dotenv_from(Path::new(".env"));
}

fn load_dotenv_from(env_path: &Path) {
    let content = match fs::read_to_string(env_path) {
        Ok(c) => c,
        Err(_) => return,
    };

    for line in content.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let mut value = value.trim();

            if (value.starts_with('"') && value.ends_with('"') && value.len() >= 2)
                || (value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2)
            {
                value = &value[1..value.len() - 1];
            }

            // Env vars take precedence
            if std::env::var(key).is_err() {
                // SAFETY: called from main before any other thread is started
                unsafe { std::env::set_var(key, value) };
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub image: ImageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON document holding alarm status, arming status and sensors
    pub data_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Minimum confidence (percent) for a frame to count as containing a cat
    pub confidence_threshold: f32,
    /// Probability that the sampling image service recognises a cat
    pub detection_rate: f64,
}

/// Default location of the state file
pub fn default_data_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("security-alarm")
        .join("state.json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                data_file: default_data_file(),
            },
            image: ImageConfig {
                confidence_threshold: DEFAULT_CAT_CONFIDENCE_THRESHOLD,
                detection_rate: 0.5,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("SECURITY_DATA_FILE") {
            config.storage.data_file = PathBuf::from(path);
        }
        if let Ok(threshold) = std::env::var("CAT_CONFIDENCE_THRESHOLD") {
            match threshold.parse() {
                Ok(t) => config.image.confidence_threshold = t,
                Err(_) => warn!("Ignoring invalid CAT_CONFIDENCE_THRESHOLD={}", threshold),
            }
        }
        if let Ok(rate) = std::env::var("CAT_DETECTION_RATE") {
            match rate.parse() {
                Ok(r) => config.image.detection_rate = r,
                Err(_) => warn!("Ignoring invalid CAT_DETECTION_RATE={}", rate),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.image.confidence_threshold, 50.0);
        assert_eq!(config.image.detection_rate, 0.5);
        assert!(config.storage.data_file.ends_with("security-alarm/state.json"));
    }

    #[test]
    fn test_dotenv_does_not_override_existing() {
        let dir = std::env::temp_dir().join(format!("security-alarm-env-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(".env");
        fs::write(
            &path,
            "# comment\nSECURITY_ALARM_TEST_NEW=\"quoted value\"\nSECURITY_ALARM_TEST_SET=from-file\n",
        )
        .unwrap();

        unsafe { std::env::set_var("SECURITY_ALARM_TEST_SET", "from-env") };
        load_dotenv_from(&path);

        assert_eq!(std::env::var("SECURITY_ALARM_TEST_NEW").unwrap(), "quoted value");
        assert_eq!(std::env::var("SECURITY_ALARM_TEST_SET").unwrap(), "from-env");

        let _ = fs::remove_dir_all(dir);
    }
}
