// src/placement.rs
//
// Scale and anchoring policy: how large a dish model renders on a detected
// surface, and where it sits on it.

use crate::types::{PlacementConfig, SurfaceDims, Vec3};
use anyhow::{bail, Result};

/// Nominal real-world footprint of a dish model plus its display tweaks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DishProfile {
    pub footprint: SurfaceDims,
    pub scale_multiplier: f32,
    /// Extra lift above the surface, meters (tall glasses ride higher).
    pub height_offset: f32,
}

impl DishProfile {
    /// Profile for a named dish type; unknown names fall back to a generic
    /// 20cm x 15cm plate.
    pub fn for_dish(name: &str) -> Self {
        match name {
            "hamburger" => Self {
                footprint: SurfaceDims::new(0.15, 0.08),
                scale_multiplier: 1.2,
                height_offset: 0.02,
            },
            "pizza" => Self {
                footprint: SurfaceDims::new(0.30, 0.30),
                scale_multiplier: 1.0,
                height_offset: 0.01,
            },
            "drink" => Self {
                footprint: SurfaceDims::new(0.08, 0.15),
                scale_multiplier: 1.1,
                height_offset: 0.03,
            },
            _ => Self {
                footprint: SurfaceDims::new(0.20, 0.15),
                scale_multiplier: 1.0,
                height_offset: 0.02,
            },
        }
    }
}

/// Lateral drag limits around an anchor, meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragBounds {
    pub x: f32,
    pub z: f32,
}

/// Display scale so the model covers the target fraction of the detected
/// surface, adjusted for estimated distance.
///
/// A non-positive model footprint is a caller bug; rejecting it here keeps
/// NaN/infinity out of the transform pipeline.
pub fn compute_scale(
    config: &PlacementConfig,
    surface: SurfaceDims,
    model: SurfaceDims,
    distance: f32,
) -> Result<f32> {
    let model_area = model.area();
    if model_area <= 0.0 {
        bail!(
            "invalid model footprint: {:.3}m x {:.3}m",
            model.width,
            model.height
        );
    }

    let base_scale = (surface.area() * config.target_occupancy / model_area).sqrt();
    let distance_scale = (1.0 / distance).clamp(config.min_distance_scale, config.max_distance_scale);
    Ok(base_scale * distance_scale)
}

/// Anchor position on top of a detected surface: centered, lifted slightly
/// above it, same depth. Also reports how far the model may be dragged while
/// staying on the table.
pub fn anchor_on_surface(
    config: &PlacementConfig,
    surface: SurfaceDims,
    surface_position: Vec3,
) -> (Vec3, DragBounds) {
    let anchor = Vec3::new(
        surface_position.x,
        surface_position.y + config.surface_lift,
        surface_position.z,
    );
    let bounds = DragBounds {
        x: surface.width * config.drag_bounds_ratio,
        z: surface.height * config.drag_bounds_ratio,
    };
    (anchor, bounds)
}
