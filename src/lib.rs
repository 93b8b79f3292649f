//! Tabletop surface tracking core for an AR dish viewer.
//!
//! A per-frame pixel heuristic guesses where a flat table is, a temporal
//! stabilizer smooths the guesses, and once the user (or auto-placement)
//! confirms, a scale policy fixes the dish transform and a motion
//! compensator keeps it pinned against small device rotations.

pub mod analyzer;
pub mod config;
pub mod motion;
pub mod placement;
pub mod session;
pub mod stabilizer;
pub mod types;

pub use analyzer::SurfaceAnalyzer;
pub use motion::{DeviceStabilityMonitor, MotionCompensator};
pub use session::{ArSession, Capabilities, SessionPhase, TickOutput};
pub use stabilizer::DetectionStabilizer;
pub use types::{
    Config, Frame, Orientation, Placement, StableDetection, SurfaceDetection, SurfaceDims, Vec3,
};
