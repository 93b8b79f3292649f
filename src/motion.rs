// src/motion.rs
//
// Small-rotation compensation for a placed model, plus the accelerometer
// stillness monitor used to gate the scanning hints.

use crate::types::{Acceleration, MotionConfig, Orientation, Vec3};
use std::collections::VecDeque;
use tracing::debug;

/// Counteracts small device rotations so a placed model appears pinned to
/// the table instead of swimming with the phone.
///
/// The first orientation seen after construction or `reset()` becomes the
/// baseline; later calls perturb the anchored position by the sine of the
/// angular deltas and smooth the result over a short position history.
pub struct MotionCompensator {
    baseline: Option<Orientation>,
    history: VecDeque<Vec3>,
    config: MotionConfig,
}

impl MotionCompensator {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            baseline: None,
            history: VecDeque::with_capacity(config.position_history),
            config,
        }
    }

    pub fn compensate(&mut self, current: Orientation, anchored: Vec3) -> Vec3 {
        let baseline = match self.baseline {
            Some(baseline) => baseline,
            None => {
                debug!(
                    "motion baseline set: α={:.1}° β={:.1}° γ={:.1}°",
                    current.alpha, current.beta, current.gamma
                );
                self.baseline = Some(current);
                return anchored;
            }
        };

        let delta_beta = (current.beta - baseline.beta).to_radians();
        let delta_gamma = (current.gamma - baseline.gamma).to_radians();

        // Depth is left alone; only lateral/vertical sway is countered.
        let compensated = Vec3::new(
            anchored.x - delta_gamma.sin() * self.config.smoothing_factor,
            anchored.y + delta_beta.sin() * self.config.smoothing_factor,
            anchored.z,
        );

        self.history.push_back(compensated);
        if self.history.len() > self.config.position_history {
            self.history.pop_front();
        }

        let n = self.history.len() as f32;
        let mut mean = Vec3::ZERO;
        for pos in &self.history {
            mean.x += pos.x;
            mean.y += pos.y;
            mean.z += pos.z;
        }
        Vec3::new(mean.x / n, mean.y / n, mean.z / n)
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// Must be invoked whenever the placement changes or the session
    /// restarts, otherwise compensation drifts against a stale baseline.
    pub fn reset(&mut self) {
        self.baseline = None;
        self.history.clear();
    }
}

/// Rolling verdict on whether the device is being held still, from raw
/// accelerometer samples. With no samples yet (or no accelerometer at all)
/// the verdict is `None` and callers treat the device as acceptably still.
pub struct DeviceStabilityMonitor {
    samples: VecDeque<Acceleration>,
    config: MotionConfig,
}

impl DeviceStabilityMonitor {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            samples: VecDeque::with_capacity(config.accel_history),
            config,
        }
    }

    pub fn push(&mut self, sample: Acceleration) {
        self.samples.push_back(sample);
        if self.samples.len() > self.config.accel_history {
            self.samples.pop_front();
        }
    }

    pub fn verdict(&self) -> Option<bool> {
        if self.samples.len() < self.config.accel_min_samples {
            return None;
        }
        let total: f32 = self
            .samples
            .iter()
            .map(|s| s.x.abs() + s.y.abs() + s.z.abs())
            .sum();
        let mean = total / self.samples.len() as f32;
        Some(mean < self.config.stability_threshold)
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orientation(alpha: f32, beta: f32, gamma: f32) -> Orientation {
        Orientation { alpha, beta, gamma }
    }

    #[test]
    fn first_call_baselines_and_passes_through() {
        let mut comp = MotionCompensator::new(MotionConfig::default());
        let anchored = Vec3::new(0.0, -0.4, -1.0);
        let out = comp.compensate(orientation(10.0, 20.0, 30.0), anchored);
        assert_eq!(out, anchored);
        assert!(comp.has_baseline());
    }

    #[test]
    fn unchanged_orientation_leaves_position_alone() {
        let mut comp = MotionCompensator::new(MotionConfig::default());
        let anchored = Vec3::new(0.1, -0.4, -1.0);
        let o = orientation(0.0, 45.0, -10.0);
        comp.compensate(o, anchored);
        let out = comp.compensate(o, anchored);
        assert!((out.x - anchored.x).abs() < 1e-6);
        assert!((out.y - anchored.y).abs() < 1e-6);
        assert_eq!(out.z, anchored.z);
    }

    #[test]
    fn gamma_roll_shifts_x_and_beta_tilts_y() {
        let mut comp = MotionCompensator::new(MotionConfig::default());
        let anchored = Vec3::ZERO;
        comp.compensate(orientation(0.0, 0.0, 0.0), anchored);
        let out = comp.compensate(orientation(0.0, 30.0, 30.0), anchored);
        let expected = (30.0f32.to_radians()).sin() * 0.1;
        assert!((out.x - -expected).abs() < 1e-6);
        assert!((out.y - expected).abs() < 1e-6);
        assert_eq!(out.z, 0.0);
    }

    #[test]
    fn depth_is_never_perturbed() {
        let mut comp = MotionCompensator::new(MotionConfig::default());
        let anchored = Vec3::new(0.0, 0.0, -1.3);
        comp.compensate(orientation(0.0, 0.0, 0.0), anchored);
        for i in 0..10 {
            let out = comp.compensate(orientation(i as f32, i as f32 * 2.0, -i as f32), anchored);
            assert_eq!(out.z, -1.3);
        }
    }

    #[test]
    fn output_is_smoothed_over_history() {
        // A single large swing is damped by the position history mean.
        let mut comp = MotionCompensator::new(MotionConfig::default());
        let anchored = Vec3::ZERO;
        comp.compensate(orientation(0.0, 0.0, 0.0), anchored);
        for _ in 0..4 {
            comp.compensate(orientation(0.0, 0.0, 0.0), anchored);
        }
        let out = comp.compensate(orientation(0.0, 0.0, 60.0), anchored);
        let raw = -(60.0f32.to_radians()).sin() * 0.1;
        assert!(out.x > raw, "history mean should damp the swing");
        assert!(out.x < 0.0);
    }

    #[test]
    fn reset_rebaselines() {
        let mut comp = MotionCompensator::new(MotionConfig::default());
        let anchored = Vec3::new(0.0, -0.4, -1.0);
        comp.compensate(orientation(0.0, 0.0, 0.0), anchored);
        comp.compensate(orientation(5.0, 5.0, 5.0), anchored);
        comp.reset();
        assert!(!comp.has_baseline());
        let out = comp.compensate(orientation(90.0, 90.0, 90.0), anchored);
        assert_eq!(out, anchored);
    }

    #[test]
    fn stability_monitor_needs_enough_samples() {
        let mut monitor = DeviceStabilityMonitor::new(MotionConfig::default());
        for _ in 0..9 {
            monitor.push(Acceleration {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            });
        }
        assert_eq!(monitor.verdict(), None);
        monitor.push(Acceleration {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        });
        assert_eq!(monitor.verdict(), Some(true));
    }

    #[test]
    fn shaking_reads_as_unstable() {
        let mut monitor = DeviceStabilityMonitor::new(MotionConfig::default());
        for i in 0..20 {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            monitor.push(Acceleration {
                x: 2.0 * sign,
                y: 1.0,
                z: 0.5,
            });
        }
        assert_eq!(monitor.verdict(), Some(false));
    }
}
