//! Camera frames and the cat-detection boundary.
//!
//! The engine treats frames as opaque and only asks an [`ImageService`]
//! whether a cat is visible.

pub mod sampling;

pub use sampling::SamplingImageService;

use crate::error::Result;
use std::fs;
use std::path::Path;

/// An opaque camera frame.
#[derive(Clone, Debug, Default)]
pub struct Image {
    bytes: Vec<u8>,
}

impl Image {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Read a frame from an image file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        log::debug!("[Image] Read {} bytes from {:?}", bytes.len(), path.as_ref());
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Image analysis collaborator.
pub trait ImageService {
    /// Returns true if the frame contains a cat with at least
    /// `confidence_threshold` percent confidence.
    fn image_contains_cat(&self, image: &Image, confidence_threshold: f32) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file_fails() {
        let path = std::env::temp_dir().join(format!("no-such-frame-{}.jpg", uuid::Uuid::new_v4()));
        assert!(Image::open(path).is_err());
    }

    #[test]
    fn test_from_bytes() {
        let image = Image::from_bytes(vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(image.as_bytes().len(), 3);
        assert!(!image.is_empty());
        assert!(Image::default().is_empty());
    }
}
