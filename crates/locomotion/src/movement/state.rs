//! Motion state, per-tick input samples and tick reports.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::ColliderId;

/// Time value meaning "never happened" for the since-event timers.
pub const NEVER: f32 = f32::INFINITY;

/// Complete kinematic state for one avatar.
///
/// Created at spawn, owned by the caller, and mutated only by
/// [`LocomotionController::tick`](super::LocomotionController::tick) and the
/// helpers on this type. There is no shared state between instances, so
/// separate avatars can be ticked independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    /// Position in world space (feet/bottom of the character shape).
    pub position: Vec3,

    /// Facing yaw in radians (0 = +Z).
    pub yaw: f32,

    /// Smooth-damp spring velocity for `yaw`.
    pub yaw_velocity: f32,

    /// Yaw of the last non-zero input direction in world space.
    pub target_yaw: f32,

    /// Input-derived velocity, excluding gravity.
    pub planar_velocity: Vec3,

    /// Pending impulses from [`Self::add_force`].
    pub external_velocity: Vec3,

    /// Signed vertical velocity from gravity and jumps.
    pub gravitational_velocity: f32,

    /// Whether the last kinematic move ended on walkable ground.
    pub grounded: bool,

    /// The grounded value the previous tick's jump and gravity logic used.
    pub was_grounded_last_tick: bool,

    /// Jumps performed since last touching ground.
    pub jump_count: u32,

    /// Ground collider from the last move, used for friction lookup.
    pub ground_collider: Option<ColliderId>,

    // ========================================================================
    // Timers (seconds)
    // ========================================================================
    pub jump_timeout_remaining: f32,
    pub fall_timeout_remaining: f32,
    pub time_since_left_ground: f32,
    pub time_since_jump_button_pressed: f32,
    pub time_since_last_jump: f32,

    // ========================================================================
    // Jump flags
    // ========================================================================
    /// One-shot external jump request, cleared at the end of the tick.
    pub jump_requested: bool,

    /// Bypass the post-landing jump timeout for the pending request.
    pub jump_forced: bool,

    /// Jump button state sampled this tick.
    pub jump_button_held: bool,

    /// The button has been up while airborne since the last jump.
    pub jump_released_while_ascending: bool,

    /// The last jump came from [`Self::request_jump`] rather than the button.
    pub last_jump_was_triggered_externally: bool,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            yaw_velocity: 0.0,
            target_yaw: 0.0,
            planar_velocity: Vec3::ZERO,
            external_velocity: Vec3::ZERO,
            gravitational_velocity: 0.0,
            grounded: false,
            was_grounded_last_tick: false,
            jump_count: 0,
            ground_collider: None,
            jump_timeout_remaining: 0.0,
            fall_timeout_remaining: 0.0,
            time_since_left_ground: 0.0,
            time_since_jump_button_pressed: NEVER,
            time_since_last_jump: NEVER,
            jump_requested: false,
            jump_forced: false,
            jump_button_held: false,
            jump_released_while_ascending: false,
            last_jump_was_triggered_externally: false,
        }
    }
}

impl MotionState {
    /// Create a new motion state at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Return to a neutral configuration at `position` (e.g. on respawn).
    ///
    /// Facing is kept so the avatar doesn't visibly snap around.
    pub fn reset(&mut self, position: Vec3) {
        let yaw = self.yaw;
        *self = Self::new(position);
        self.yaw = yaw;
        self.target_yaw = yaw;
    }

    /// Add an impulse (meters/second) to the external velocity.
    ///
    /// Non-finite forces are ignored.
    pub fn add_force(&mut self, force: Vec3) {
        if !force.is_finite() {
            log::warn!("ignoring non-finite force {:?}", force);
            return;
        }
        self.external_velocity += force;
    }

    /// Ask for a jump on the next tick.
    ///
    /// `forced` skips the post-landing jump timeout. The request still obeys
    /// the jump count limit and is dropped silently if it can't fire.
    pub fn request_jump(&mut self, forced: bool) {
        self.jump_requested = true;
        self.jump_forced |= forced;
    }

    /// Velocity to report over the network (excludes gravity).
    #[inline]
    pub fn network_velocity(&self) -> Vec3 {
        self.planar_velocity
    }

    /// Combined vertical speed of planar and gravitational components.
    #[inline]
    pub fn vertical_speed(&self) -> f32 {
        self.planar_velocity.y + self.gravitational_velocity
    }

    /// Current horizontal speed.
    #[inline]
    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.planar_velocity.x, 0.0, self.planar_velocity.z).length()
    }

    /// Airborne long enough to count as falling rather than hopping.
    #[inline]
    pub fn is_free_falling(&self) -> bool {
        !self.grounded && self.fall_timeout_remaining <= 0.0
    }
}

/// Input for a single tick, captured once and immutable for that tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSample {
    /// Move vector in `[-1, 1]²`: x = right, y = forward.
    pub move_vector: Vec2,

    /// Sprint held.
    pub sprint: bool,

    /// Jump went down this tick.
    pub jump_pressed: bool,

    /// Jump is held this tick.
    pub jump_held: bool,
}

impl InputSample {
    /// Copy with non-finite axes zeroed and magnitude capped at 1.
    pub fn sanitized(&self) -> Self {
        let move_vector = if self.move_vector.is_finite() {
            self.move_vector.clamp_length_max(1.0)
        } else {
            Vec2::ZERO
        };
        Self {
            move_vector,
            ..*self
        }
    }
}

/// Transitions that happened during one tick.
///
/// Callers poll this instead of subscribing to callbacks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// A jump fired this tick.
    pub just_jumped: bool,

    /// First tick starting on the ground after being airborne. Landing
    /// resets and any buffered jump happen on this same tick.
    pub just_landed: bool,

    /// First tick starting airborne after the ground was left without a jump.
    pub just_left_ground: bool,

    /// The fall timeout expired this tick.
    pub entered_free_fall: bool,

    /// Jump count after the tick.
    pub jump_count: u32,

    /// Displacement actually applied by the mover.
    pub displacement: Vec3,
}
