//! Level geometry and spawn points.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use stride_locomotion::{ColliderId, CollisionWorld, SurfaceMaterial};

/// A sandbox level containing collision geometry and spawn points.
#[derive(Debug)]
pub struct Level {
    /// Level identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Collision world for the kinematic mover and friction lookup.
    pub collision: CollisionWorld,

    /// Avatar spawn points.
    pub spawn_points: Vec<SpawnPoint>,

    /// Avatars below this height are respawned.
    pub kill_height: f32,
}

/// A spawn point for avatars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Position in world space.
    pub position: Vec3,

    /// Initial facing direction (yaw in radians).
    pub facing: f32,
}

/// Named colliders in [`Level::test_arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaColliders {
    pub floor: ColliderId,
    pub ice: ColliderId,
    pub steep_wedge: Option<ColliderId>,
    pub platform: ColliderId,
}

impl Level {
    /// Create an empty level.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            collision: CollisionWorld::new(),
            spawn_points: Vec::new(),
            kill_height: -50.0,
        }
    }

    /// Create a simple test level for development.
    pub fn test_arena() -> Self {
        Self::test_arena_with_colliders().0
    }

    /// [`Self::test_arena`] plus handles to its interesting colliders.
    ///
    /// Layout (top of every floor at y=0):
    /// - grippy floor for `z < 20`
    /// - ice for `20 <= z < 50`
    /// - a wedge too steep to stand on around `x = -30`
    /// - a raised platform at `(10, 1.25, -10)`
    pub fn test_arena_with_colliders() -> (Self, ArenaColliders) {
        let mut level = Self::new("test_arena", "Test Arena");
        let world = &mut level.collision;

        let floor = world.add_box(
            Vec3::new(0.0, -0.5, -15.0),
            Vec3::new(50.0, 0.5, 35.0),
            Some(SurfaceMaterial::grippy()),
        );

        let ice = world.add_box(
            Vec3::new(0.0, -0.5, 35.0),
            Vec3::new(50.0, 0.5, 15.0),
            Some(SurfaceMaterial::ice()),
        );

        // Rises 4m over 1.5m: normal.y is well under the walkable limit
        let steep_wedge = world.add_convex_hull(
            &[
                Vec3::new(-28.5, 0.0, -5.0),
                Vec3::new(-28.5, 0.0, 5.0),
                Vec3::new(-30.0, 0.0, -5.0),
                Vec3::new(-30.0, 0.0, 5.0),
                Vec3::new(-30.0, 4.0, -5.0),
                Vec3::new(-30.0, 4.0, 5.0),
            ],
            None,
        );

        let platform = world.add_box(
            Vec3::new(10.0, 1.0, -10.0),
            Vec3::new(3.0, 0.25, 3.0),
            None,
        );

        // Perimeter walls
        let wall_height = 5.0;
        let wall_thickness = 0.5;
        let arena_size = 50.0;
        for (center, half_extents) in [
            (
                Vec3::new(0.0, wall_height / 2.0, -arena_size),
                Vec3::new(arena_size, wall_height / 2.0, wall_thickness),
            ),
            (
                Vec3::new(0.0, wall_height / 2.0, arena_size),
                Vec3::new(arena_size, wall_height / 2.0, wall_thickness),
            ),
            (
                Vec3::new(arena_size, wall_height / 2.0, 0.0),
                Vec3::new(wall_thickness, wall_height / 2.0, arena_size),
            ),
            (
                Vec3::new(-arena_size, wall_height / 2.0, 0.0),
                Vec3::new(wall_thickness, wall_height / 2.0, arena_size),
            ),
        ] {
            world.add_box(center, half_extents, None);
        }

        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(-20.0, 0.0, 0.0),
            facing: 0.0,
        });
        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(20.0, 0.0, 0.0),
            facing: std::f32::consts::PI,
        });
        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(10.0, 1.25, -10.0),
            facing: 0.0,
        });

        let colliders = ArenaColliders {
            floor,
            ice,
            steep_wedge,
            platform,
        };
        (level, colliders)
    }

    /// Get the number of spawn points.
    pub fn spawn_count(&self) -> usize {
        self.spawn_points.len()
    }

    /// Get a spawn point by index, wrapping around.
    pub fn spawn_point(&self, index: usize) -> Option<SpawnPoint> {
        if self.spawn_points.is_empty() {
            return None;
        }
        self.spawn_points.get(index % self.spawn_points.len()).copied()
    }

    /// Whether a position has fallen out of the level.
    pub fn is_out_of_bounds(&self, position: Vec3) -> bool {
        position.y < self.kill_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stride_locomotion::{SurfaceLookup, TraceShape};

    #[test]
    fn test_arena_has_geometry() {
        let (level, colliders) = Level::test_arena_with_colliders();

        assert!(level.collision.collider_count() >= 8);
        assert!(colliders.steep_wedge.is_some());
        assert_eq!(level.spawn_count(), 3);
    }

    #[test]
    fn test_arena_surfaces() {
        let (level, colliders) = Level::test_arena_with_colliders();

        assert_eq!(
            level.collision.surface_material(colliders.ice),
            Some(SurfaceMaterial::ice())
        );
        assert_eq!(
            level.collision.surface_material(colliders.floor),
            Some(SurfaceMaterial::grippy())
        );
        assert_eq!(level.collision.surface_material(colliders.platform), None);
    }

    #[test]
    fn test_spawn_points_are_clear() {
        let level = Level::test_arena();

        for spawn in &level.spawn_points {
            let above = spawn.position + Vec3::new(0.0, 0.05, 0.0);
            assert!(!level.collision.point_in_solid(above, TraceShape::AVATAR));
        }
    }

    #[test]
    fn test_spawn_point_wraps() {
        let level = Level::test_arena();

        assert_eq!(level.spawn_point(3), level.spawn_point(0));
        assert!(Level::new("empty", "Empty").spawn_point(0).is_none());
    }

    #[test]
    fn test_out_of_bounds() {
        let level = Level::test_arena();

        assert!(level.is_out_of_bounds(Vec3::new(0.0, -60.0, 0.0)));
        assert!(!level.is_out_of_bounds(Vec3::ZERO));
    }
}
