//! Collision collaborators for the locomotion controller.
//!
//! The controller never talks to a physics engine directly. It proposes a
//! displacement through a [`KinematicMover`] and looks up ground friction
//! through a [`SurfaceLookup`]. This module defines those contracts and ships
//! a reference implementation built on parry3d.
//!
//! # Key Types
//!
//! - [`KinematicMover`]: displacement in, applied displacement and contacts out
//! - [`SurfaceLookup`]: collider → [`SurfaceMaterial`]
//! - [`CollisionWorld`]: box and convex hull colliders with optional surfaces
//! - [`CharacterMover`]: slide-move implementation of [`KinematicMover`]

mod mover;
mod surface;
mod trace;
mod world;

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use mover::CharacterMover;
pub use surface::{resolve_friction, FrictionCombine, NoSurfaces, SurfaceLookup, SurfaceMaterial};
pub use trace::{TraceResult, TraceShape};
pub use world::CollisionWorld;

use crate::movement::config::MIN_GROUND_NORMAL_Y;

/// Handle to a collider owned by the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColliderId(pub u32);

/// A surface touched during a kinematic move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Surface normal, pointing away from the collider.
    pub normal: Vec3,

    /// The collider that was touched.
    pub collider: ColliderId,
}

impl Contact {
    /// Whether this contact is walkable ground rather than a wall or steep slope.
    #[inline]
    pub fn is_ground(&self) -> bool {
        self.normal.y > MIN_GROUND_NORMAL_Y
    }
}

/// Outcome of a kinematic move.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveResult {
    /// Displacement actually applied.
    pub applied: Vec3,

    /// Whether the move ended on walkable ground.
    pub grounded: bool,

    /// Every surface touched, in the order they were hit.
    pub contacts: Vec<Contact>,
}

impl MoveResult {
    /// A move that went the full distance without touching anything.
    pub fn free(displacement: Vec3) -> Self {
        Self {
            applied: displacement,
            grounded: false,
            contacts: Vec::new(),
        }
    }

    /// The last walkable collider touched, if any.
    pub fn ground_collider(&self) -> Option<ColliderId> {
        self.contacts
            .iter()
            .rev()
            .find(|contact| contact.is_ground())
            .map(|contact| contact.collider)
    }
}

/// Collision backend that performs kinematic moves.
///
/// Given the current position and a proposed displacement, move as far as
/// collision allows and report what was touched.
pub trait KinematicMover {
    fn move_and_collide(&mut self, position: Vec3, displacement: Vec3) -> MoveResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_ground_threshold() {
        let floor = Contact {
            normal: Vec3::Y,
            collider: ColliderId(0),
        };
        let wall = Contact {
            normal: Vec3::X,
            collider: ColliderId(1),
        };
        let steep = Contact {
            normal: Vec3::new(0.75, 0.66, 0.0).normalize(),
            collider: ColliderId(2),
        };
        assert!(floor.is_ground());
        assert!(!wall.is_ground());
        assert!(!steep.is_ground());
    }

    #[test]
    fn test_ground_collider_prefers_last_ground_contact() {
        let result = MoveResult {
            applied: Vec3::ZERO,
            grounded: true,
            contacts: vec![
                Contact {
                    normal: Vec3::Y,
                    collider: ColliderId(1),
                },
                Contact {
                    normal: Vec3::Y,
                    collider: ColliderId(2),
                },
                Contact {
                    normal: Vec3::X,
                    collider: ColliderId(3),
                },
            ],
        };
        assert_eq!(result.ground_collider(), Some(ColliderId(2)));
        assert_eq!(MoveResult::free(Vec3::X).ground_collider(), None);
    }
}
