// src/analyzer.rs
//
// Per-frame surface heuristic: samples the pixel grid on a fixed stride and
// scores how table-like the view is. Three signals are accumulated:
//   - uniform color (mutually close R/G/B)  → bare tabletop area
//   - horizontal brightness delta           → generic edges
//   - vertical brightness delta             → horizontal lines, i.e. a rim
//
// This is a heuristic, not calibrated vision: no camera intrinsics, no
// lighting normalization. The coefficients are the shipped contract and live
// in AnalyzerConfig.

use crate::types::{AnalyzerConfig, Frame, SurfaceDetection, SurfaceDims, Vec3};
use tracing::debug;

// Nominal tabletop footprint before scaling by the surface signal, meters.
const BASE_SURFACE_WIDTH: f32 = 1.0;
const BASE_SURFACE_HEIGHT: f32 = 0.7;
const DIMENSION_SCALE_MIN: f32 = 0.5;
const DIMENSION_SCALE_MAX: f32 = 1.5;

// Estimated table height below the camera and its edge-signal gain, meters.
const TABLE_DROP_BASE: f32 = 0.3;
const TABLE_DROP_EDGE_GAIN: f32 = 0.2;

// Estimated camera-to-table distance range, meters.
const DISTANCE_MAX: f32 = 2.0;
const DISTANCE_MIN: f32 = 0.5;

pub struct SurfaceAnalyzer {
    config: AnalyzerConfig,
}

impl SurfaceAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Score one frame. A frame with zero dimensions yields the degenerate
    /// detection (confidence 0) so callers can treat "video not ready" as
    /// "not yet detected" rather than an error.
    pub fn analyze(&self, frame: &Frame) -> SurfaceDetection {
        if frame.width == 0 || frame.height == 0 {
            return SurfaceDetection::none();
        }

        let stride = self.config.sample_stride.max(1);

        let mut surface_hits: u32 = 0;
        let mut edge_hits: u32 = 0;
        let mut line_hits: u32 = 0;
        let mut variance_sum: f64 = 0.0;
        let mut samples: u32 = 0;

        for y in (0..frame.height).step_by(stride) {
            for x in (0..frame.width).step_by(stride) {
                let (r, g, b) = frame.pixel(x, y);
                samples += 1;

                // Uniform color: all three channels mutually close.
                if (r - g).abs() < self.config.channel_tolerance
                    && (g - b).abs() < self.config.channel_tolerance
                {
                    surface_hits += 1;
                }

                let brightness = (r + g + b) / 3.0;
                variance_sum += (((r - g).abs() + (g - b).abs() + (r - b).abs()) / 3.0) as f64;

                // Horizontal edge: contrast against the pixel one stride right.
                if x + stride < frame.width {
                    let (nr, ng, nb) = frame.pixel(x + stride, y);
                    if (brightness - (nr + ng + nb) / 3.0).abs() > self.config.edge_delta {
                        edge_hits += 1;
                    }
                }

                // Table rim: contrast against the pixel one stride down.
                if y + stride < frame.height {
                    let (nr, ng, nb) = frame.pixel(x, y + stride);
                    if (brightness - (nr + ng + nb) / 3.0).abs() > self.config.edge_delta {
                        line_hits += 1;
                    }
                }
            }
        }

        if samples == 0 {
            return SurfaceDetection::none();
        }

        let surface_ratio = surface_hits as f32 / samples as f32;
        let edge_ratio = edge_hits as f32 / samples as f32;
        let line_ratio = line_hits as f32 / samples as f32;
        let avg_variance = (variance_sum / samples as f64) as f32;

        let mut confidence = self.config.surface_weight * surface_ratio
            + self.config.edge_weight * edge_ratio
            + self.config.line_weight * line_ratio;
        if avg_variance < self.config.uniform_variance_max {
            confidence += self.config.uniform_bonus;
        }
        let confidence = confidence.clamp(0.0, 1.0);

        debug!(
            "analyzed {}x{}: surface={:.2} edge={:.2} line={:.2} var={:.1} conf={:.2}",
            frame.width, frame.height, surface_ratio, edge_ratio, line_ratio, avg_variance,
            confidence
        );

        SurfaceDetection {
            confidence,
            position: estimate_position(surface_ratio, edge_ratio),
            dimensions: estimate_dimensions(surface_ratio),
        }
    }
}

/// More surface signal reads as a closer table; more edge signal as a lower
/// one. The camera looks down -z.
fn estimate_position(surface_ratio: f32, edge_ratio: f32) -> Vec3 {
    let distance = (DISTANCE_MAX - 2.0 * surface_ratio).max(DISTANCE_MIN);
    let height = -TABLE_DROP_BASE - TABLE_DROP_EDGE_GAIN * edge_ratio;
    Vec3::new(0.0, height, -distance)
}

fn estimate_dimensions(surface_ratio: f32) -> SurfaceDims {
    let scale = (2.0 * surface_ratio).clamp(DIMENSION_SCALE_MIN, DIMENSION_SCALE_MAX);
    SurfaceDims::new(BASE_SURFACE_WIDTH * scale, BASE_SURFACE_HEIGHT * scale)
}
