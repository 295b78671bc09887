//! Reference collision world.
//!
//! Stores static colliders with optional surface materials and answers swept
//! shape traces against them using parry3d.

use glam::Vec3;
use parry3d::math::{Isometry, Point, Real};
use parry3d::query::contact;
use parry3d::shape::SharedShape;

use super::surface::{SurfaceLookup, SurfaceMaterial};
use super::trace::{TraceResult, TraceShape};
use super::ColliderId;

/// Binary search steps per trace; 12 gives ~0.025% precision.
const TRACE_SEARCH_STEPS: usize = 12;

/// Upper bound on overlap samples taken along one sweep.
const MAX_SWEEP_SAMPLES: usize = 64;

/// Extra push when resolving penetration (meters).
const PENETRATION_SLOP: f32 = 0.001;

/// A static collider in the world.
#[derive(Debug, Clone)]
pub struct Collider {
    /// Unique identifier for this collider.
    pub id: ColliderId,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// Friction properties, if the collider has a material.
    pub surface: Option<SurfaceMaterial>,
}

/// Deepest contact between a shape and the world.
#[derive(Debug, Clone, Copy)]
struct Penetration {
    normal: Vec3,
    depth: f32,
    collider: ColliderId,
}

/// The collision world containing all static geometry.
///
/// Immutable during a tick; traces only need `&self`, so the world can be
/// shared by every avatar being simulated.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    colliders: Vec<Collider>,
    next_id: u32,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            colliders: Vec::new(),
            next_id: 0,
        }
    }

    /// Add an axis-aligned box to the world.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `surface` - Optional surface material for friction lookup
    pub fn add_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        surface: Option<SurfaceMaterial>,
    ) -> ColliderId {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let transform = Isometry::translation(center.x, center.y, center.z);
        self.push(shape, transform, surface)
    }

    /// Add a convex hull to the world (ramps, wedges).
    ///
    /// Returns `None` if the hull couldn't be computed.
    pub fn add_convex_hull(
        &mut self,
        points: &[Vec3],
        surface: Option<SurfaceMaterial>,
    ) -> Option<ColliderId> {
        let parry_points: Vec<Point<Real>> =
            points.iter().map(|p| Point::new(p.x, p.y, p.z)).collect();

        let shape = SharedShape::convex_hull(&parry_points)?;
        Some(self.push(shape, Isometry::identity(), surface))
    }

    /// Replace the surface material of a collider.
    ///
    /// Returns `false` if the collider doesn't exist.
    pub fn set_surface(&mut self, id: ColliderId, surface: Option<SurfaceMaterial>) -> bool {
        match self.colliders.iter_mut().find(|c| c.id == id) {
            Some(collider) => {
                collider.surface = surface;
                true
            }
            None => false,
        }
    }

    /// Remove all collision geometry.
    pub fn clear(&mut self) {
        self.colliders.clear();
    }

    /// Get the number of colliders.
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Sweep `shape` from `start` to `end` and report the first hit.
    pub fn trace(&self, start: Vec3, end: Vec3, shape: TraceShape) -> TraceResult {
        let delta = end - start;

        if delta.length_squared() < 1e-8 {
            return match self.deepest_penetration(start, shape) {
                Some(hit) => TraceResult {
                    fraction: 0.0,
                    end_position: start,
                    hit_normal: Some(hit.normal),
                    hit_collider: Some(hit.collider),
                    started_in_solid: true,
                    all_solid: true,
                },
                None => TraceResult::no_hit(start),
            };
        }

        let started_in_solid = self.point_in_solid(start, shape);

        let bracket = if started_in_solid {
            self.point_in_solid(end, shape).then_some((0.0, 1.0))
        } else {
            self.first_overlap(start, delta, shape)
        };
        let Some((mut lo, mut hi)) = bracket else {
            return TraceResult {
                started_in_solid,
                ..TraceResult::no_hit(end)
            };
        };

        for _ in 0..TRACE_SEARCH_STEPS {
            let mid = (lo + hi) * 0.5;
            if self.point_in_solid(start + delta * mid, shape) {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        let end_position = start + delta * lo;
        let (hit_normal, hit_collider) = match self.deepest_penetration(start + delta * hi, shape)
        {
            Some(hit) => (hit.normal, Some(hit.collider)),
            None => (-delta.normalize_or_zero(), None),
        };

        TraceResult {
            fraction: lo,
            end_position,
            hit_normal: Some(hit_normal),
            hit_collider,
            started_in_solid,
            all_solid: started_in_solid && lo < 0.001,
        }
    }

    /// Check if a shape at `position` overlaps solid geometry.
    pub fn point_in_solid(&self, position: Vec3, shape: TraceShape) -> bool {
        let test_shape = parry_shape(shape);
        let test_transform = shape_transform(position, shape);

        self.colliders.iter().any(|collider| {
            matches!(
                contact(
                    &test_transform,
                    test_shape.as_ref(),
                    &collider.transform,
                    collider.shape.as_ref(),
                    0.0,
                ),
                Ok(Some(_))
            )
        })
    }

    /// Push a shape out of solid geometry.
    ///
    /// Returns the corrected position.
    pub fn resolve_penetration(&self, position: Vec3, shape: TraceShape) -> Vec3 {
        let test_shape = parry_shape(shape);
        let test_transform = shape_transform(position, shape);

        let mut correction = Vec3::ZERO;
        for collider in &self.colliders {
            if let Ok(Some(hit)) = contact(
                &test_transform,
                test_shape.as_ref(),
                &collider.transform,
                collider.shape.as_ref(),
                0.0,
            ) {
                let depth = -hit.dist;
                if depth >= 0.0 {
                    correction += to_vec3(hit.normal2.into_inner()) * (depth + PENETRATION_SLOP);
                }
            }
        }

        position + correction
    }

    /// Bracket the first overlap along a sweep as `(clear, blocked)` fractions.
    ///
    /// Samples are spaced no further apart than the shape's thinnest half
    /// extent, so a collider of any thickness is caught by at least one.
    fn first_overlap(&self, start: Vec3, delta: Vec3, shape: TraceShape) -> Option<(f32, f32)> {
        let spacing = shape.min_half_extent();
        let samples = if spacing > 0.0 {
            ((delta.length() / spacing).ceil() as usize).clamp(1, MAX_SWEEP_SAMPLES)
        } else {
            1
        };

        let mut clear = 0.0;
        for sample in 1..=samples {
            let t = sample as f32 / samples as f32;
            if self.point_in_solid(start + delta * t, shape) {
                return Some((clear, t));
            }
            clear = t;
        }
        None
    }

    fn deepest_penetration(&self, position: Vec3, shape: TraceShape) -> Option<Penetration> {
        let test_shape = parry_shape(shape);
        let test_transform = shape_transform(position, shape);

        let mut deepest: Option<Penetration> = None;
        for collider in &self.colliders {
            if let Ok(Some(hit)) = contact(
                &test_transform,
                test_shape.as_ref(),
                &collider.transform,
                collider.shape.as_ref(),
                0.0,
            ) {
                let depth = -hit.dist;
                if deepest.map_or(true, |d| depth > d.depth) {
                    deepest = Some(Penetration {
                        // normal2 points out of the collider, toward the shape
                        normal: to_vec3(hit.normal2.into_inner()),
                        depth,
                        collider: collider.id,
                    });
                }
            }
        }
        deepest
    }

    fn push(
        &mut self,
        shape: SharedShape,
        transform: Isometry<Real>,
        surface: Option<SurfaceMaterial>,
    ) -> ColliderId {
        let id = ColliderId(self.next_id);
        self.next_id += 1;
        self.colliders.push(Collider {
            id,
            shape,
            transform,
            surface,
        });
        id
    }
}

impl SurfaceLookup for CollisionWorld {
    fn surface_material(&self, collider: ColliderId) -> Option<SurfaceMaterial> {
        self.colliders
            .iter()
            .find(|c| c.id == collider)
            .and_then(|c| c.surface)
    }
}

/// Create a parry3d shape from a [`TraceShape`].
fn parry_shape(shape: TraceShape) -> SharedShape {
    match shape {
        TraceShape::Capsule { radius, height } => {
            // Parry capsules take the half-height of the cylinder part
            let cylinder_half_height = (height - 2.0 * radius).max(0.0) / 2.0;
            SharedShape::capsule_y(cylinder_half_height, radius)
        }
        TraceShape::Box { half_extents } => {
            SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
    }
}

/// Transform for a shape whose bottom-center sits at `position`.
fn shape_transform(position: Vec3, shape: TraceShape) -> Isometry<Real> {
    let offset_y = shape.height() / 2.0;
    Isometry::translation(position.x, position.y + offset_y, position.z)
}

#[inline]
fn to_vec3(v: parry3d::math::Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_world() -> (CollisionWorld, ColliderId, ColliderId) {
        let mut world = CollisionWorld::new();

        // Floor with its top at y=0
        let floor = world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            Some(SurfaceMaterial::ice()),
        );

        // Wall face at x=9.5
        let wall = world.add_box(Vec3::new(10.0, 2.5, 0.0), Vec3::new(0.5, 2.5, 10.0), None);

        (world, floor, wall)
    }

    #[test]
    fn test_trace_down_hits_floor() {
        let (world, floor, _) = create_test_world();

        let result = world.trace(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            TraceShape::AVATAR,
        );

        assert!(result.hit_something());
        assert!(result.end_position.y >= 0.0 && result.end_position.y < 0.01);
        assert_eq!(result.hit_collider, Some(floor));
        assert!(result.normal_or_up().y > 0.99);
    }

    #[test]
    fn test_trace_stops_at_wall() {
        let (world, _, wall) = create_test_world();

        let result = world.trace(
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::new(15.0, 0.5, 0.0),
            TraceShape::AVATAR,
        );

        assert!(result.hit_something());
        assert!(result.end_position.x < 9.5 - 0.29);
        assert_eq!(result.hit_collider, Some(wall));
        assert!(result.normal_or_up().x < -0.99);
    }

    #[test]
    fn test_trace_catches_thin_platform() {
        let mut world = CollisionWorld::new();
        let slab = world.add_box(Vec3::new(0.0, -0.025, 0.0), Vec3::new(5.0, 0.025, 5.0), None);

        // Both end poses are clear of the slab
        let result = world.trace(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(0.0, -3.0, 0.0),
            TraceShape::AVATAR,
        );

        assert!(result.hit_something());
        assert_eq!(result.hit_collider, Some(slab));
        assert!(result.end_position.y >= 0.0 && result.end_position.y < 0.01);
    }

    #[test]
    fn test_trace_clear_path() {
        let (world, _, _) = create_test_world();

        let result = world.trace(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(3.0, 1.0, 0.0),
            TraceShape::AVATAR,
        );

        assert!(!result.hit_something());
        assert_eq!(result.end_position, Vec3::new(3.0, 1.0, 0.0));
    }

    #[test]
    fn test_point_in_solid() {
        let (world, _, _) = create_test_world();

        assert!(world.point_in_solid(Vec3::new(0.0, -0.25, 0.0), TraceShape::AVATAR));
        assert!(!world.point_in_solid(Vec3::new(0.0, 1.0, 0.0), TraceShape::AVATAR));
    }

    #[test]
    fn test_resolve_penetration_pushes_up() {
        let (world, _, _) = create_test_world();

        let resolved = world.resolve_penetration(Vec3::new(0.0, -0.1, 0.0), TraceShape::AVATAR);

        assert!(resolved.y >= 0.0, "resolved={:?}", resolved);
        assert!(!world.point_in_solid(resolved, TraceShape::AVATAR));
    }

    #[test]
    fn test_surface_lookup() {
        let (mut world, floor, wall) = create_test_world();

        assert_eq!(world.surface_material(floor), Some(SurfaceMaterial::ice()));
        assert_eq!(world.surface_material(wall), None);

        assert!(world.set_surface(wall, Some(SurfaceMaterial::grippy())));
        assert_eq!(world.surface_material(wall), Some(SurfaceMaterial::grippy()));
        assert!(!world.set_surface(ColliderId(99), None));
    }

    #[test]
    fn test_convex_hull_ramp() {
        let mut world = CollisionWorld::new();
        let ramp = world.add_convex_hull(
            &[
                Vec3::new(0.0, 0.0, -2.0),
                Vec3::new(0.0, 0.0, 2.0),
                Vec3::new(4.0, 0.0, -2.0),
                Vec3::new(4.0, 0.0, 2.0),
                Vec3::new(4.0, 2.0, -2.0),
                Vec3::new(4.0, 2.0, 2.0),
            ],
            None,
        );
        assert!(ramp.is_some());
        assert_eq!(world.collider_count(), 1);

        world.clear();
        assert_eq!(world.collider_count(), 0);
    }
}
