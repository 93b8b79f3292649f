// src/stabilizer.rs

use crate::types::{StabilizerConfig, StableDetection, SurfaceDetection, SurfaceDims, Vec3};
use std::collections::VecDeque;

/// Temporal smoother over per-frame surface detections.
///
/// Keeps a sliding window of the last `stability_frames` detections and
/// reports their component-wise mean. A surface counts as stable only once
/// the mean confidence strictly exceeds the configured threshold.
pub struct DetectionStabilizer {
    history: VecDeque<SurfaceDetection>,
    config: StabilizerConfig,
}

impl DetectionStabilizer {
    pub fn new(config: StabilizerConfig) -> Self {
        Self {
            history: VecDeque::with_capacity(config.stability_frames),
            config,
        }
    }

    /// Push one detection and recompute the smoothed view of the window.
    ///
    /// Below `min_history` samples the stabilizer reports confidence 0 and
    /// not-stable: a couple of noisy frames right after session start must
    /// not look like a found surface.
    pub fn push(&mut self, detection: SurfaceDetection) -> StableDetection {
        self.history.push_back(detection);
        if self.history.len() > self.config.stability_frames {
            self.history.pop_front();
        }

        if self.history.len() < self.config.min_history {
            return StableDetection::none();
        }

        let n = self.history.len() as f32;
        let mut confidence = 0.0;
        let mut position = Vec3::ZERO;
        let mut dims = SurfaceDims::new(0.0, 0.0);
        for det in &self.history {
            confidence += det.confidence;
            position.x += det.position.x;
            position.y += det.position.y;
            position.z += det.position.z;
            dims.width += det.dimensions.width;
            dims.height += det.dimensions.height;
        }
        confidence /= n;
        position.x /= n;
        position.y /= n;
        position.z /= n;
        dims.width /= n;
        dims.height /= n;

        StableDetection {
            confidence,
            position,
            dimensions: dims,
            is_stable: confidence > self.config.confidence_threshold,
        }
    }

    pub fn history_size(&self) -> usize {
        self.history.len()
    }

    /// Must be called on session teardown so a later session does not
    /// inherit stale confidence.
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(confidence: f32) -> SurfaceDetection {
        SurfaceDetection {
            confidence,
            position: Vec3::new(0.0, -0.4, -1.0),
            dimensions: SurfaceDims::new(1.0, 0.7),
        }
    }

    #[test]
    fn history_never_exceeds_window() {
        let mut stabilizer = DetectionStabilizer::new(StabilizerConfig::default());
        for _ in 0..50 {
            stabilizer.push(detection(0.5));
        }
        assert_eq!(stabilizer.history_size(), 10);
    }

    #[test]
    fn too_few_samples_report_nothing() {
        let mut stabilizer = DetectionStabilizer::new(StabilizerConfig::default());
        let first = stabilizer.push(detection(0.95));
        let second = stabilizer.push(detection(0.95));
        assert_eq!(first.confidence, 0.0);
        assert!(!first.is_stable);
        assert_eq!(second.confidence, 0.0);

        let third = stabilizer.push(detection(0.95));
        assert!(third.confidence > 0.0);
    }

    #[test]
    fn repeated_detection_averages_to_itself() {
        let mut stabilizer = DetectionStabilizer::new(StabilizerConfig::default());
        let det = detection(0.9);
        let mut stable = StableDetection::none();
        for _ in 0..10 {
            stable = stabilizer.push(det);
        }
        assert!((stable.confidence - 0.9).abs() < 1e-6);
        assert!((stable.position.y - -0.4).abs() < 1e-6);
        assert!((stable.position.z - -1.0).abs() < 1e-6);
        assert!((stable.dimensions.width - 1.0).abs() < 1e-6);
        assert!(stable.is_stable);
    }

    #[test]
    fn confidence_exactly_at_threshold_is_not_stable() {
        // Strict greater-than: 0.8 mean against a 0.8 threshold stays unstable.
        let mut stabilizer = DetectionStabilizer::new(StabilizerConfig::default());
        let mut stable = StableDetection::none();
        for _ in 0..10 {
            stable = stabilizer.push(detection(0.8));
        }
        assert!((stable.confidence - 0.8).abs() < 1e-6);
        assert!(!stable.is_stable);
    }

    #[test]
    fn spike_is_diluted_by_the_window() {
        let mut stabilizer = DetectionStabilizer::new(StabilizerConfig::default());
        for _ in 0..9 {
            stabilizer.push(detection(0.2));
        }
        let stable = stabilizer.push(detection(1.0));
        assert!(stable.confidence < 0.3);
        assert!(!stable.is_stable);
    }

    #[test]
    fn reset_clears_history() {
        let mut stabilizer = DetectionStabilizer::new(StabilizerConfig::default());
        for _ in 0..10 {
            stabilizer.push(detection(0.9));
        }
        stabilizer.reset();
        assert_eq!(stabilizer.history_size(), 0);
        let stable = stabilizer.push(detection(0.9));
        assert_eq!(stable.confidence, 0.0);
    }
}
