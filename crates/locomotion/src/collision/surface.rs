//! Surface materials and friction resolution.
//!
//! Combines the avatar's base friction with the friction of whatever it is
//! standing on to produce one effective friction per tick.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ColliderId;

/// Policy for merging two friction coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FrictionCombine {
    Average,
    Multiply,
    /// Fallback policy: the lower of the two wins.
    #[default]
    Minimum,
    Maximum,
}

impl FrictionCombine {
    /// Combine avatar friction `a` with surface friction `b`.
    #[inline]
    pub fn combine(self, a: f32, b: f32) -> f32 {
        match self {
            Self::Average => (a + b) * 0.5,
            Self::Multiply => a * b,
            Self::Minimum => a.min(b),
            Self::Maximum => a.max(b),
        }
    }
}

/// Friction properties of a walkable surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMaterial {
    /// Friction when starting to move or speeding up.
    pub static_friction: f32,

    /// Friction while sliding faster than the target speed.
    pub dynamic_friction: f32,

    /// How this surface combines with the avatar's friction.
    pub friction_combine: FrictionCombine,

    /// Marks a material authored to replace the avatar's own friction
    /// profile. Carried for tooling; it does not change how friction combines.
    pub use_physics_material_override: bool,
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self {
            static_friction: 0.6,
            dynamic_friction: 0.6,
            friction_combine: FrictionCombine::Minimum,
            use_physics_material_override: false,
        }
    }
}

impl SurfaceMaterial {
    /// A surface with equal static and dynamic friction and an explicit combine rule.
    pub fn with_combine(friction: f32, combine: FrictionCombine) -> Self {
        Self {
            static_friction: friction,
            dynamic_friction: friction,
            friction_combine: combine,
            use_physics_material_override: true,
        }
    }

    /// Low-friction ice that keeps its own friction.
    pub fn ice() -> Self {
        Self {
            static_friction: 0.1,
            dynamic_friction: 0.05,
            friction_combine: FrictionCombine::Minimum,
            use_physics_material_override: true,
        }
    }

    /// Full-grip surface.
    pub fn grippy() -> Self {
        Self::with_combine(1.0, FrictionCombine::Maximum)
    }

}

/// World-provided `collider → surface material` lookup.
pub trait SurfaceLookup {
    /// Surface material of a collider, if it has one.
    fn surface_material(&self, collider: ColliderId) -> Option<SurfaceMaterial>;
}

/// Lookup for worlds without any surface materials.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSurfaces;

impl SurfaceLookup for NoSurfaces {
    fn surface_material(&self, _collider: ColliderId) -> Option<SurfaceMaterial> {
        None
    }
}

impl SurfaceLookup for HashMap<ColliderId, SurfaceMaterial> {
    fn surface_material(&self, collider: ColliderId) -> Option<SurfaceMaterial> {
        self.get(&collider).copied()
    }
}

/// Effective friction for this tick, in `[0, 1]`.
///
/// # Arguments
///
/// * `ground_friction` - Avatar base friction
/// * `surface` - Material of the ground collider, if any
/// * `current_speed` - Current horizontal speed
/// * `target_speed` - Speed the avatar is trying to reach
pub fn resolve_friction(
    ground_friction: f32,
    surface: Option<&SurfaceMaterial>,
    current_speed: f32,
    target_speed: f32,
) -> f32 {
    let ground_friction = unit_or_zero(ground_friction);

    let Some(surface) = surface else {
        return ground_friction;
    };

    let surface_friction = if current_speed <= target_speed {
        surface.static_friction
    } else {
        surface.dynamic_friction
    };

    unit_or_zero(
        surface
            .friction_combine
            .combine(ground_friction, unit_or_zero(surface_friction)),
    )
}

#[inline]
fn unit_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
