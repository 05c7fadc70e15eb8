//! Stand-in classifier for hosts without a recognition model.
//!
//! Every non-empty frame gets a confidence score in `[0, 100)`. With
//! probability `detection_rate` the score is drawn from the upper half of the
//! range, otherwise from the lower half, so a threshold of 50 reports a cat
//! at exactly `detection_rate`.

use super::{Image, ImageService};
use crate::error::Result;
use log::debug;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct SamplingImageService {
    detection_rate: f64,
    rng: Mutex<StdRng>,
}

impl SamplingImageService {
    /// Create a service seeded from OS entropy.
    pub fn new(detection_rate: f64) -> Self {
        Self::with_rng(detection_rate, StdRng::from_entropy())
    }

    /// Create a reproducible service.
    pub fn with_seed(detection_rate: f64, seed: u64) -> Self {
        Self::with_rng(detection_rate, StdRng::seed_from_u64(seed))
    }

    fn with_rng(detection_rate: f64, rng: StdRng) -> Self {
        let detection_rate = if detection_rate.is_nan() {
            0.0
        } else {
            detection_rate.clamp(0.0, 1.0)
        };
        Self {
            detection_rate,
            rng: Mutex::new(rng),
        }
    }

    pub fn detection_rate(&self) -> f64 {
        self.detection_rate
    }

    fn score(&self) -> f32 {
        let mut rng = self.rng.lock();
        if rng.gen_bool(self.detection_rate) {
            rng.gen_range(50.0..100.0)
        } else {
            rng.gen_range(0.0..50.0)
        }
    }
}

impl ImageService for SamplingImageService {
    fn image_contains_cat(&self, image: &Image, confidence_threshold: f32) -> Result<bool> {
        if image.is_empty() {
            return Ok(false);
        }
        let score = self.score();
        debug!(
            "[Image] Cat confidence {:.1} (threshold {:.1})",
            score, confidence_threshold
        );
        Ok(score >= confidence_threshold)
    }
}
