//! Trace results and shapes for collision queries.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ColliderId;

/// Result of sweeping a shape through the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceResult {
    /// How far along the trace path we got before hitting something.
    ///
    /// - `1.0` = traveled the full distance (no collision)
    /// - `0.0` = hit something immediately at start
    pub fraction: f32,

    /// Final position after the trace (the last clear position on the path).
    pub end_position: Vec3,

    /// Surface normal at the impact point, pointing away from the surface.
    /// `None` if nothing was hit.
    pub hit_normal: Option<Vec3>,

    /// The collider that was hit.
    pub hit_collider: Option<ColliderId>,

    /// Whether the trace started inside solid geometry.
    pub started_in_solid: bool,

    /// Whether the shape couldn't move at all.
    pub all_solid: bool,
}

impl Default for TraceResult {
    fn default() -> Self {
        Self::no_hit(Vec3::ZERO)
    }
}

impl TraceResult {
    /// Create a trace result indicating no collision occurred.
    pub fn no_hit(end_position: Vec3) -> Self {
        Self {
            fraction: 1.0,
            end_position,
            hit_normal: None,
            hit_collider: None,
            started_in_solid: false,
            all_solid: false,
        }
    }

    /// Create a trace result indicating a collision occurred.
    pub fn hit(fraction: f32, end_position: Vec3, normal: Vec3, collider: ColliderId) -> Self {
        Self {
            fraction,
            end_position,
            hit_normal: Some(normal),
            hit_collider: Some(collider),
            started_in_solid: false,
            all_solid: false,
        }
    }

    /// Check if this trace hit something.
    #[inline]
    pub fn hit_something(&self) -> bool {
        self.fraction < 1.0
    }

    /// Get the hit normal, defaulting to up if none.
    #[inline]
    pub fn normal_or_up(&self) -> Vec3 {
        self.hit_normal.unwrap_or(Vec3::Y)
    }
}

/// Shape swept through the world for an avatar.
///
/// Positions passed alongside a shape are the bottom-center of the shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TraceShape {
    /// A vertical capsule (cylinder with hemisphere caps).
    Capsule {
        /// Radius of the cylinder and end caps.
        radius: f32,
        /// Total height from bottom cap to top cap.
        height: f32,
    },

    /// An axis-aligned box given by half-extents.
    Box { half_extents: Vec3 },
}

impl TraceShape {
    /// Default humanoid avatar capsule.
    pub const AVATAR: Self = Self::Capsule {
        radius: 0.3,
        height: 1.8,
    };

    /// Get the effective radius of this shape for collision purposes.
    pub fn radius(&self) -> f32 {
        match self {
            Self::Capsule { radius, .. } => *radius,
            Self::Box { half_extents } => half_extents.x.max(half_extents.z),
        }
    }

    /// Get the height of this shape.
    pub fn height(&self) -> f32 {
        match self {
            Self::Capsule { height, .. } => *height,
            Self::Box { half_extents } => half_extents.y * 2.0,
        }
    }

    /// Half of the shape's thinnest dimension.
    pub fn min_half_extent(&self) -> f32 {
        match self {
            Self::Capsule { radius, height } => radius.min(height * 0.5),
            Self::Box { half_extents } => half_extents.min_element(),
        }
    }
}

impl Default for TraceShape {
    fn default() -> Self {
        Self::AVATAR
    }
}
