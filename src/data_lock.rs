//! Exclusive access to one alarm data file.
//!
//! The engine assumes nobody else touches the repository while an operation
//! runs. Each CLI invocation holds a [`DataLock`] on its data file; a second
//! invocation against the same file fails fast with
//! [`SecurityError::AlreadyRunning`] instead of interleaving writes.
//!
//! The lock is a Unix socket, so the OS drops it when the holder dies.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};

use crate::error::{Result, SecurityError};

/// Lock held for as long as the value lives.
pub struct DataLock {
    _listener: UnixListener,
    path: PathBuf,
}

impl DataLock {
    /// Lock `data_file`.
    pub fn acquire(data_file: &Path) -> Result<Self> {
        let path = Self::socket_path(data_file);

        if path.exists() {
            // A live holder accepts connections; a stale socket does not.
            if UnixStream::connect(&path).is_ok() {
                return Err(SecurityError::AlreadyRunning);
            }
            let _ = std::fs::remove_file(&path);
        }

        match UnixListener::bind(&path) {
            Ok(listener) => Ok(Self {
                _listener: listener,
                path,
            }),
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => Err(SecurityError::AlreadyRunning),
            Err(e) => Err(SecurityError::IoError(e)),
        }
    }

    /// Socket path for a data file, unique per absolute file path.
    pub fn socket_path(data_file: &Path) -> PathBuf {
        let absolute = std::path::absolute(data_file).unwrap_or_else(|_| data_file.to_path_buf());
        let mut hasher = DefaultHasher::new();
        absolute.hash(&mut hasher);

        std::env::var("XDG_RUNTIME_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir())
            .join(format!("security-alarm-{:016x}.sock", hasher.finish()))
    }
}

impl Drop for DataLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_data_file() -> PathBuf {
        std::env::temp_dir().join(format!("security-alarm-lock-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_second_holder_is_rejected() {
        let data_file = unique_data_file();
        let lock = DataLock::acquire(&data_file).unwrap();

        assert!(matches!(
            DataLock::acquire(&data_file),
            Err(SecurityError::AlreadyRunning)
        ));

        drop(lock);
        assert!(DataLock::acquire(&data_file).is_ok());
    }

    #[test]
    fn test_different_files_lock_independently() {
        let _a = DataLock::acquire(&unique_data_file()).unwrap();
        let _b = DataLock::acquire(&unique_data_file()).unwrap();
    }

    #[test]
    fn test_socket_path_is_stable_per_file() {
        let data_file = unique_data_file();
        assert_eq!(
            DataLock::socket_path(&data_file),
            DataLock::socket_path(&data_file)
        );
        assert_ne!(
            DataLock::socket_path(&data_file),
            DataLock::socket_path(&unique_data_file())
        );
    }
}
