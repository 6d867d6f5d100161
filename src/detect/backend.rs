//! Detector backend seam.
//!
//! Inference engines live behind this trait. The stage only needs the flat
//! SSD-shaped tensor consumed by [`decode_detections`](super::decoder::decode_detections);
//! how a backend produces it (which runtime, which model, which device) is
//! out of scope here.
//!
//! Backends MUST NOT:
//! - Retain the pixel slice beyond the `infer` call
//! - Reorder or suppress detections (the decoder's ordering contract depends
//!   on passthrough)

use anyhow::{bail, Result};

/// A detector producing raw SSD-shaped output for one frame at a time.
pub trait DetectorBackend: Send {
    /// Backend identifier, used in logs and config.
    fn name(&self) -> &'static str;

    /// Run inference on a frame.
    ///
    /// Returns the flat record tensor; an empty vector means no detections.
    /// The pixel slice is read-only and ephemeral.
    fn infer(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Vec<f32>>;

    /// Optional warm-up hook, called once before the first frame.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Build a backend from its configured name.
///
/// `stub` is always available; real engines plug in behind this seam.
pub fn backend_from_config(name: &str) -> Result<Box<dyn DetectorBackend>> {
    match name {
        "stub" => Ok(Box::new(StubBackend::default())),
        other => bail!("unknown detector backend: {}", other),
    }
}

// ----------------------------------------------------------------------------
// Synthetic backend for tests, demo, and unwired deployments
// ----------------------------------------------------------------------------

/// Deterministic synthetic backend.
///
/// Simulates a person walking through the scene on a ten-frame cycle:
/// - one frame with no detections at all
/// - one frame with a detection below the confidence threshold
/// - eight frames with a confident person box sweeping left to right
///
/// Output depends only on the seed and the frame counter, so runs replay
/// exactly.
pub struct StubBackend {
    seed: u64,
    frame_count: u64,
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl StubBackend {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            frame_count: 0,
        }
    }
}

impl DetectorBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn infer(&mut self, _pixels: &[u8], _width: u32, _height: u32) -> Result<Vec<f32>> {
        self.frame_count += 1;
        let phase = (self.frame_count + self.seed) % 10;

        if phase == 9 {
            return Ok(Vec::new());
        }

        let confidence = if phase == 0 { 0.45 } else { 0.9 };
        let xmin = phase as f32 * 0.08;
        let record = [0.0, 1.0, confidence, xmin, 0.25, xmin + 0.2, 0.75];
        Ok(record.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::decoder::RECORD_FIELDS;

    #[test]
    fn stub_backend_is_deterministic_per_seed() -> Result<()> {
        let mut a = StubBackend::with_seed(7);
        let mut b = StubBackend::with_seed(7);
        for _ in 0..20 {
            assert_eq!(a.infer(&[], 640, 480)?, b.infer(&[], 640, 480)?);
        }
        Ok(())
    }

    #[test]
    fn stub_backend_emits_whole_records() -> Result<()> {
        let mut backend = StubBackend::default();
        for _ in 0..10 {
            let raw = backend.infer(&[], 640, 480)?;
            assert_eq!(raw.len() % RECORD_FIELDS, 0);
        }
        Ok(())
    }

    #[test]
    fn stub_backend_cycle_covers_empty_and_confident_frames() -> Result<()> {
        let mut backend = StubBackend::default();
        let mut empty = 0;
        let mut confident = 0;
        for _ in 0..10 {
            let raw = backend.infer(&[], 640, 480)?;
            if raw.is_empty() {
                empty += 1;
            } else if raw[2] > 0.5 {
                confident += 1;
            }
        }
        assert_eq!(empty, 1);
        assert_eq!(confident, 8);
        Ok(())
    }

    #[test]
    fn backend_from_config_rejects_unknown_names() {
        assert!(backend_from_config("stub").is_ok());
        assert!(backend_from_config("openvino").is_err());
    }
}
