// src/types.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analyzer: AnalyzerConfig,
    pub stabilizer: StabilizerConfig,
    pub motion: MotionConfig,
    pub placement: PlacementConfig,
    pub session: SessionConfig,
    pub capture: CaptureConfig,
    pub logging: LoggingConfig,
}

/// Weights and thresholds of the surface-confidence heuristic.
///
/// The original viewer shipped several hand-tuned variants of this formula;
/// keeping every coefficient here makes a variant a config choice instead of
/// a forked code path. Defaults reproduce the shipped behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Sampling stride over the pixel grid, in both axes.
    pub sample_stride: usize,
    /// Minimum brightness delta (0-255 scale) that counts as an edge.
    pub edge_delta: f32,
    /// Max mutual R/G/B difference for a pixel to count as uniform surface.
    pub channel_tolerance: f32,
    pub surface_weight: f32,
    pub edge_weight: f32,
    pub line_weight: f32,
    /// Flat confidence bonus applied when the frame is chromatically uniform.
    pub uniform_bonus: f32,
    /// Average channel-difference below which the bonus applies.
    pub uniform_variance_max: f32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_stride: 4,
            edge_delta: 30.0,
            channel_tolerance: 20.0,
            surface_weight: 0.4,
            edge_weight: 0.3,
            line_weight: 0.3,
            uniform_bonus: 0.2,
            uniform_variance_max: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    /// Detections averaged together before the result is trusted.
    pub stability_frames: usize,
    /// Mean confidence must strictly exceed this for `is_stable`.
    pub confidence_threshold: f32,
    /// Below this many samples the stabilizer reports nothing at all.
    pub min_history: usize,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            stability_frames: 10,
            confidence_threshold: 0.8,
            min_history: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Scale applied to orientation deltas before they nudge the anchor.
    pub smoothing_factor: f32,
    /// Compensated positions averaged to damp jitter.
    pub position_history: usize,
    /// Accelerometer samples kept by the stability monitor.
    pub accel_history: usize,
    /// Samples required before the monitor reports a verdict.
    pub accel_min_samples: usize,
    /// Mean |x|+|y|+|z| below which the device counts as held still.
    pub stability_threshold: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.1,
            position_history: 5,
            accel_history: 20,
            accel_min_samples: 10,
            stability_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Fraction of the detected surface area the model should cover.
    pub target_occupancy: f32,
    pub min_distance_scale: f32,
    pub max_distance_scale: f32,
    /// Lift above the detected surface so the model sits on it, in meters.
    pub surface_lift: f32,
    /// Fraction of the surface extent the model may be dragged within.
    pub drag_bounds_ratio: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            target_occupancy: 0.15,
            min_distance_scale: 0.5,
            max_distance_scale: 2.0,
            surface_lift: 0.05,
            drag_bounds_ratio: 0.4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Detection tick interval driven by the host loop, in milliseconds.
    pub tick_interval_ms: u64,
    /// Place the model automatically once the surface is stable.
    pub auto_place: bool,
    /// Dish profile used for footprint and height offset.
    pub dish: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 400,
            auto_place: false,
            dish: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub input_dir: String,
    pub output_dir: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            input_dir: "captures".to_string(),
            output_dir: "output".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// One captured camera frame, RGB8, row-major.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub timestamp_ms: f64,
}

impl Frame {
    pub fn pixel(&self, x: usize, y: usize) -> (f32, f32, f32) {
        let idx = (y * self.width + x) * 3;
        (
            self.data[idx] as f32,
            self.data[idx + 1] as f32,
            self.data[idx + 2] as f32,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDims {
    pub width: f32,
    pub height: f32,
}

impl SurfaceDims {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// One frame's opinion about a hypothesized flat surface.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SurfaceDetection {
    pub confidence: f32,
    pub position: Vec3,
    pub dimensions: SurfaceDims,
}

impl SurfaceDetection {
    /// Returned when the frame is unusable (video not ready yet).
    pub fn none() -> Self {
        Self {
            confidence: 0.0,
            position: Vec3::new(0.0, 0.0, -1.0),
            dimensions: SurfaceDims::new(0.0, 0.0),
        }
    }
}

/// Mean of the recent detection history, plus the stability verdict.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StableDetection {
    pub confidence: f32,
    pub position: Vec3,
    pub dimensions: SurfaceDims,
    pub is_stable: bool,
}

impl StableDetection {
    pub fn none() -> Self {
        Self {
            confidence: 0.0,
            position: Vec3::new(0.0, 0.0, -1.0),
            dimensions: SurfaceDims::new(0.0, 0.0),
            is_stable: false,
        }
    }
}

/// Device orientation in degrees, as delivered by the sensor stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub alpha: f32,
    pub beta: f32,
    pub gamma: f32,
}

/// One accelerometer sample, gravity included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Acceleration {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Confirmed transform of a model anchored in the scene.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Placement {
    pub position: Vec3,
    pub scale: f32,
    /// Yaw, radians.
    pub rotation: f32,
}
