// src/session.rs
//
// One AR session: owns one analyzer, one stabilizer, one compensator and the
// current placement. The host drives it with a periodic tick carrying
// whatever inputs the platform can supply; everything platform-specific is
// reduced to the capability flags injected at construction.

use crate::analyzer::SurfaceAnalyzer;
use crate::motion::{DeviceStabilityMonitor, MotionCompensator};
use crate::placement::{anchor_on_surface, compute_scale, DishProfile};
use crate::stabilizer::DetectionStabilizer;
use crate::types::{
    Acceleration, Config, Frame, Orientation, Placement, PlacementConfig, StableDetection, Vec3,
};
use anyhow::{bail, Result};
use tracing::{debug, info};

/// What the host platform can actually deliver. The core components never
/// branch on platform; only the session consults these flags.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    pub camera: bool,
    pub orientation: bool,
    pub motion: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            camera: true,
            orientation: true,
            motion: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Scanning,
    SurfaceFound,
    Placed,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Scanning => "SCANNING",
            SessionPhase::SurfaceFound => "SURFACE_FOUND",
            SessionPhase::Placed => "PLACED",
        }
    }

    /// User-facing hint shown by the viewer for this phase.
    pub fn instruction(&self) -> &'static str {
        match self {
            SessionPhase::Scanning => "Point the camera at the table and hold it steady",
            SessionPhase::SurfaceFound => "Table found - tap to place your dish",
            SessionPhase::Placed => "Dish placed - move the phone to view it from all sides",
        }
    }
}

/// Everything the rendering layer needs after one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickOutput {
    pub detection: StableDetection,
    pub phase: SessionPhase,
    /// Current model transform while placed, motion-compensated this tick.
    pub transform: Option<Placement>,
    pub device_stable: Option<bool>,
    /// True on the tick where auto-placement fired.
    pub placed_this_tick: bool,
}

pub struct ArSession {
    capabilities: Capabilities,
    placement_config: PlacementConfig,
    auto_place: bool,
    analyzer: SurfaceAnalyzer,
    stabilizer: DetectionStabilizer,
    compensator: MotionCompensator,
    stability: DeviceStabilityMonitor,
    dish: DishProfile,
    placement: Option<Placement>,
    last_stable: StableDetection,
    ticks: u64,
}

impl ArSession {
    pub fn new(config: &Config, capabilities: Capabilities) -> Self {
        let dish = DishProfile::for_dish(&config.session.dish);
        Self {
            capabilities,
            placement_config: config.placement.clone(),
            auto_place: config.session.auto_place,
            analyzer: SurfaceAnalyzer::new(config.analyzer.clone()),
            stabilizer: DetectionStabilizer::new(config.stabilizer.clone()),
            compensator: MotionCompensator::new(config.motion.clone()),
            stability: DeviceStabilityMonitor::new(config.motion.clone()),
            dish,
            placement: None,
            last_stable: StableDetection::none(),
            ticks: 0,
        }
    }

    /// One detection tick. Synchronous and bounded; the host must not fire
    /// the next tick before this one returns.
    pub fn tick(
        &mut self,
        frame: Option<&Frame>,
        orientation: Option<Orientation>,
        acceleration: Option<Acceleration>,
    ) -> TickOutput {
        self.ticks += 1;

        if self.capabilities.motion {
            if let Some(sample) = acceleration {
                self.stability.push(sample);
            }
        }
        let device_stable = self.stability.verdict();

        // A missing frame means the camera is not delivering yet; the
        // history is left untouched rather than diluted with zeros.
        if let Some(frame) = frame {
            let detection = self.analyzer.analyze(frame);
            self.last_stable = self.stabilizer.push(detection);
        }

        let mut placed_this_tick = false;
        if self.auto_place
            && self.placement.is_none()
            && self.last_stable.is_stable
            && device_stable != Some(false)
        {
            match self.place() {
                Ok(placement) => {
                    info!(
                        "auto-placed at tick {}: scale={:.3}, y={:.2}",
                        self.ticks, placement.scale, placement.position.y
                    );
                    placed_this_tick = true;
                }
                Err(e) => debug!("auto-place skipped: {}", e),
            }
        }

        let transform = self.placement.map(|placement| {
            let position = match (self.capabilities.orientation, orientation) {
                (true, Some(current)) => self.compensator.compensate(current, placement.position),
                // No orientation source: placement still works, uncompensated.
                _ => placement.position,
            };
            Placement {
                position,
                ..placement
            }
        });

        TickOutput {
            detection: self.last_stable,
            phase: self.phase(),
            transform,
            device_stable,
            placed_this_tick,
        }
    }

    /// Confirm placement on the currently stable surface (the user tapped).
    pub fn place(&mut self) -> Result<Placement> {
        if self.placement.is_some() {
            bail!("model already placed; reposition first");
        }
        if !self.last_stable.is_stable {
            bail!(
                "no stable surface yet (confidence {:.2})",
                self.last_stable.confidence
            );
        }

        let distance = (-self.last_stable.position.z).max(0.1);
        let scale = compute_scale(
            &self.placement_config,
            self.last_stable.dimensions,
            self.dish.footprint,
            distance,
        )? * self.dish.scale_multiplier;

        let (anchor, _bounds) = anchor_on_surface(
            &self.placement_config,
            self.last_stable.dimensions,
            self.last_stable.position,
        );
        let position = Vec3::new(anchor.x, anchor.y + self.dish.height_offset, anchor.z);

        let placement = Placement {
            position,
            scale,
            rotation: 0.0,
        };
        self.placement = Some(placement);
        self.compensator.reset();

        info!(
            "🍽️ placed: pos=({:.2}, {:.2}, {:.2}) scale={:.3} dist={:.2}m",
            position.x, position.y, position.z, scale, distance
        );
        Ok(placement)
    }

    /// Drop the current placement and go back to scanning against the live
    /// stabilizer output.
    pub fn reposition(&mut self) {
        if self.placement.take().is_some() {
            info!("placement removed, rescanning");
        }
        self.compensator.reset();
    }

    /// Session teardown. Required before the buffers could leak confidence
    /// into a subsequent session.
    pub fn reset(&mut self) {
        self.stabilizer.reset();
        self.compensator.reset();
        self.stability.reset();
        self.placement = None;
        self.last_stable = StableDetection::none();
        self.ticks = 0;
    }

    pub fn phase(&self) -> SessionPhase {
        if self.placement.is_some() {
            SessionPhase::Placed
        } else if self.last_stable.is_stable {
            SessionPhase::SurfaceFound
        } else {
            SessionPhase::Scanning
        }
    }

    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    pub fn last_detection(&self) -> StableDetection {
        self.last_stable
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
