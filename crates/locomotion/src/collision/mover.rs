//! Slide move against a [`CollisionWorld`].
//!
//! Traces the avatar shape along the proposed displacement, and on impact
//! clips the remainder against every plane touched so far so the avatar
//! slides along walls and into corners instead of sticking.

use glam::Vec3;

use super::trace::TraceShape;
use super::world::CollisionWorld;
use super::{Contact, KinematicMover, MoveResult};

/// Maximum number of collision planes tracked during one move.
const MAX_CLIP_PLANES: usize = 5;

/// Slight push away from surfaces so the next trace doesn't start touching.
const OVERBOUNCE: f32 = 1.001;

/// How far below the feet to look for ground after a move.
const GROUND_PROBE_DISTANCE: f32 = 0.05;

/// Remove the component of `motion` going into the plane with `normal`.
pub fn clip_velocity(motion: Vec3, normal: Vec3, overbounce: f32) -> Vec3 {
    let backoff = motion.dot(normal);

    let adjusted_backoff = if backoff < 0.0 {
        backoff * overbounce
    } else {
        backoff / overbounce
    };

    motion - normal * adjusted_backoff
}

/// [`KinematicMover`] that slides an avatar shape through a static world.
#[derive(Debug, Clone, Copy)]
pub struct CharacterMover<'w> {
    world: &'w CollisionWorld,
    shape: TraceShape,
}

impl<'w> CharacterMover<'w> {
    pub fn new(world: &'w CollisionWorld, shape: TraceShape) -> Self {
        Self { world, shape }
    }

    pub fn shape(&self) -> TraceShape {
        self.shape
    }

    /// Trace straight down and return the first walkable contact.
    fn probe_ground(&self, position: Vec3) -> Option<Contact> {
        let trace = self.world.trace(
            position,
            position - Vec3::new(0.0, GROUND_PROBE_DISTANCE, 0.0),
            self.shape,
        );
        let contact = Contact {
            normal: trace.hit_normal?,
            collider: trace.hit_collider?,
        };
        contact.is_ground().then_some(contact)
    }
}

impl KinematicMover for CharacterMover<'_> {
    fn move_and_collide(&mut self, position: Vec3, displacement: Vec3) -> MoveResult {
        let mut current = position;
        let mut contacts = Vec::new();

        if self.world.point_in_solid(current, self.shape) {
            current = self.world.resolve_penetration(current, self.shape);
        }

        let original = displacement;
        let mut remaining = displacement;
        let mut planes: [Vec3; MAX_CLIP_PLANES] = [Vec3::ZERO; MAX_CLIP_PLANES];
        let mut num_planes = 0;

        for _ in 0..MAX_CLIP_PLANES {
            if remaining.length_squared() < 1e-10 {
                break;
            }

            let trace = self.world.trace(current, current + remaining, self.shape);

            if !trace.hit_something() {
                current = trace.end_position;
                break;
            }

            if trace.fraction > 0.0 {
                current = trace.end_position;
            }
            remaining *= 1.0 - trace.fraction;

            let Some(normal) = trace.hit_normal else {
                break;
            };
            if let Some(collider) = trace.hit_collider {
                contacts.push(Contact { normal, collider });
            }
            if trace.all_solid {
                break;
            }

            if num_planes < MAX_CLIP_PLANES {
                planes[num_planes] = normal;
                num_planes += 1;
            }

            // Find a slide direction that doesn't push into any plane hit so far
            let mut slide = None;
            for i in 0..num_planes {
                let clipped = clip_velocity(remaining, planes[i], OVERBOUNCE);
                let valid = (0..num_planes)
                    .filter(|&j| j != i)
                    .all(|j| clipped.dot(planes[j]) >= -0.01);
                if valid {
                    slide = Some(clipped);
                    break;
                }
            }

            remaining = match slide {
                Some(clipped) => clipped,
                None if num_planes >= 2 => {
                    // Slide along the crease between the first two planes
                    let crease = planes[0].cross(planes[1]).normalize_or_zero();
                    let along = crease * remaining.dot(crease);
                    if along.dot(planes[0]) < -0.01 || along.dot(planes[1]) < -0.01 {
                        break;
                    }
                    along
                }
                None => break,
            };

            // Never slide back against the requested direction
            if remaining.dot(original) <= 0.0 {
                break;
            }
        }

        if original.y <= 0.0 && !contacts.iter().any(Contact::is_ground) {
            if let Some(ground) = self.probe_ground(current) {
                contacts.push(ground);
            }
        }

        let grounded = contacts.iter().any(Contact::is_ground);

        MoveResult {
            applied: current - position,
            grounded,
            contacts,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
