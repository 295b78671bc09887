//! Avatar locomotion controller.
//!
//! This is the main entry point for avatar movement. It takes an input sample
//! and advances the motion state through a kinematic mover, composing the jump,
//! planar and gravity components in a fixed order.

use glam::Vec3;

use crate::collision::{
    resolve_friction, CollisionWorld, KinematicMover, SurfaceLookup, TraceShape,
};
use crate::math::finite_or_zero;

use super::config::{MovementTuning, MAX_TICK_DELTA};
use super::gravity::GravityIntegrator;
use super::jump::JumpArbiter;
use super::planar::PlanarMotionBlender;
use super::state::{InputSample, MotionState, TickReport};

/// Avatar locomotion controller.
///
/// Holds only the tuning; every piece of per-avatar state lives in the
/// [`MotionState`] passed to [`Self::tick`], so one controller can drive any
/// number of avatars that share a profile.
///
/// # Example
///
/// ```ignore
/// let controller = LocomotionController::new(MovementTuning::default());
/// let mut state = MotionState::new(spawn_position);
///
/// // Each tick:
/// let mut mover = CharacterMover::new(&world, TraceShape::AVATAR);
/// let report = controller.tick(&mut state, &input, camera_yaw, &mut mover, &world, delta_time);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocomotionController {
    tuning: MovementTuning,
}

impl LocomotionController {
    /// Create a controller. Out-of-range tuning values are sanitized.
    pub fn new(tuning: MovementTuning) -> Self {
        Self {
            tuning: tuning.sanitized(),
        }
    }

    /// The sanitized tuning in effect.
    pub fn tuning(&self) -> &MovementTuning {
        &self.tuning
    }

    /// Place an avatar at a spawn point.
    ///
    /// Traces down from just above the spawn point and stands the avatar on
    /// whatever it finds. With no ground below, the avatar is left at the
    /// spawn point and starts airborne.
    pub fn spawn_at(
        &self,
        state: &mut MotionState,
        spawn_pos: Vec3,
        world: &CollisionWorld,
        shape: TraceShape,
    ) {
        let trace_start = spawn_pos + Vec3::new(0.0, 1.0, 0.0);
        let trace_end = spawn_pos - Vec3::new(0.0, 2.0, 0.0);

        let trace = world.trace(trace_start, trace_end, shape);

        if trace.hit_something() && !trace.all_solid {
            state.reset(trace.end_position);
            state.grounded = true;
            state.was_grounded_last_tick = true;
            state.ground_collider = trace.hit_collider;
            JumpArbiter::land(state, &self.tuning);
        } else {
            state.reset(spawn_pos);
        }
    }

    /// Advance one avatar by one tick.
    ///
    /// # Arguments
    ///
    /// * `state` - The avatar's motion state (will be modified)
    /// * `input` - This tick's input sample
    /// * `camera_yaw` - Camera yaw in radians; the move vector is relative to it
    /// * `mover` - Collision backend performing the kinematic move
    /// * `surfaces` - Collider to surface material lookup for friction
    /// * `delta_time` - Time step in seconds
    pub fn tick<M, S>(
        &self,
        state: &mut MotionState,
        input: &InputSample,
        camera_yaw: f32,
        mover: &mut M,
        surfaces: &S,
        delta_time: f32,
    ) -> TickReport
    where
        M: KinematicMover + ?Sized,
        S: SurfaceLookup + ?Sized,
    {
        if !delta_time.is_finite() || delta_time <= 0.0 {
            log::warn!("skipping tick with invalid delta time {delta_time}");
            return self.idle_report(state);
        }
        if !state.position.is_finite() {
            log::warn!("skipping tick for avatar at non-finite position");
            return self.idle_report(state);
        }

        // Clamp delta time to prevent physics explosions
        let delta_time = delta_time.min(MAX_TICK_DELTA);
        let input = input.sanitized();
        let camera_yaw = if camera_yaw.is_finite() { camera_yaw } else { 0.0 };
        Self::sanitize_state(state);

        let grounded = state.grounded;
        let tuning = &self.tuning;

        // Transitions are judged on the grounding this tick starts with, so a
        // buffered jump fires on the same tick that reports the landing
        let just_landed = grounded && !state.was_grounded_last_tick;
        let just_left_ground = !grounded && state.was_grounded_last_tick && state.jump_count == 0;

        // Jumps see the grounding from the previous move
        let jump = JumpArbiter::update(state, &input, tuning, delta_time);

        let friction = self.effective_friction(state, &input, surfaces);
        PlanarMotionBlender::update(state, &input, camera_yaw, friction, tuning, delta_time);

        // Half-step gravity keeps the arc independent of tick rate
        let vertical = GravityIntegrator::displacement_velocity(state, tuning, delta_time);
        let velocity = state.planar_velocity + state.external_velocity + Vec3::new(0.0, vertical, 0.0);
        let result = mover.move_and_collide(state.position, velocity * delta_time);

        let applied = finite_or_zero(result.applied);
        state.position += applied;
        state.grounded = result.grounded;
        state.ground_collider = result.ground_collider();

        Self::fold_external_velocity(state);
        GravityIntegrator::integrate(state, tuning, delta_time);

        let report = TickReport {
            just_jumped: jump.jumped,
            just_landed,
            just_left_ground,
            entered_free_fall: jump.entered_free_fall,
            jump_count: state.jump_count,
            displacement: applied,
        };
        Self::log_transitions(state, &report);

        state.was_grounded_last_tick = grounded;
        report
    }

    /// Friction for this tick from the cached ground collider.
    fn effective_friction<S>(&self, state: &MotionState, input: &InputSample, surfaces: &S) -> f32
    where
        S: SurfaceLookup + ?Sized,
    {
        let surface = state
            .ground_collider
            .and_then(|collider| surfaces.surface_material(collider));

        resolve_friction(
            self.tuning.ground_friction,
            surface.as_ref(),
            state.horizontal_speed(),
            PlanarMotionBlender::target_speed(input, &self.tuning),
        )
    }

    /// Hand pending impulses over to the planar and gravity terms.
    fn fold_external_velocity(state: &mut MotionState) {
        let external = state.external_velocity;
        state.planar_velocity.x += external.x;
        state.planar_velocity.z += external.z;
        state.gravitational_velocity += external.y;
        state.external_velocity = Vec3::ZERO;
    }

    fn log_transitions(state: &MotionState, report: &TickReport) {
        if report.just_landed {
            log::debug!("landed at {:?}", state.position);
        }
        if report.just_left_ground {
            log::debug!("left ground at {:?}", state.position);
        }
        if report.entered_free_fall {
            log::debug!("free fall at {:?}", state.position);
        }
    }

    fn idle_report(&self, state: &MotionState) -> TickReport {
        TickReport {
            jump_count: state.jump_count,
            ..Default::default()
        }
    }

    fn sanitize_state(state: &mut MotionState) {
        state.planar_velocity = finite_or_zero(state.planar_velocity);
        state.external_velocity = finite_or_zero(state.external_velocity);
        if !state.gravitational_velocity.is_finite() {
            state.gravitational_velocity = 0.0;
        }
        if !state.yaw.is_finite() || !state.yaw_velocity.is_finite() {
            state.yaw = 0.0;
            state.yaw_velocity = 0.0;
        }
        if !state.target_yaw.is_finite() {
            state.target_yaw = state.yaw;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
