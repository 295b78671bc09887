//! Gravity integration.
//!
//! Gravity is integrated in two halves around the kinematic move so the
//! trajectory matches `p += v·dt + ½a·dt²` regardless of tick rate:
//!
//! - [`GravityIntegrator::displacement_velocity`] gives the vertical speed to
//!   move with this tick (current velocity plus the half-step term)
//! - [`GravityIntegrator::integrate`] advances the velocity after the move and
//!   enforces terminal velocity

use super::config::{MovementTuning, SHORT_HOP_EXTRA_GRAVITY, TERMINAL_VELOCITY};
use super::state::MotionState;

/// Stateless gravity integrator; all state lives in [`MotionState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GravityIntegrator;

impl GravityIntegrator {
    /// Vertical speed used for this tick's displacement.
    #[inline]
    pub fn displacement_velocity(
        state: &MotionState,
        tuning: &MovementTuning,
        delta_time: f32,
    ) -> f32 {
        state.gravitational_velocity + 0.5 * -tuning.gravity() * delta_time
    }

    /// Advance gravitational velocity by one tick.
    ///
    /// Applies short-hop extra gravity after an early release, the falling
    /// multiplier while descending, and clamps to terminal velocity.
    pub fn integrate(state: &mut MotionState, tuning: &MovementTuning, delta_time: f32) {
        let gravity = tuning.gravity();

        if state.vertical_speed() > -TERMINAL_VELOCITY {
            if Self::short_hop_active(state, tuning) {
                state.gravitational_velocity -= gravity * delta_time * SHORT_HOP_EXTRA_GRAVITY;
            }

            let multiplier = if state.gravitational_velocity < 0.0 {
                tuning.falling_gravity_multiplier
            } else {
                1.0
            };
            state.gravitational_velocity -= gravity * delta_time * multiplier;
        }

        Self::clamp_terminal(state);
    }

    /// Clamp so `planar_velocity.y + gravitational_velocity >= -TERMINAL_VELOCITY`.
    pub fn clamp_terminal(state: &mut MotionState) {
        if !state.gravitational_velocity.is_finite() {
            state.gravitational_velocity = 0.0;
        }
        let floor = -TERMINAL_VELOCITY - state.planar_velocity.y;
        state.gravitational_velocity = state.gravitational_velocity.max(floor);
    }

    /// Whether the early-release extra gravity applies this tick.
    #[inline]
    pub fn short_hop_active(state: &MotionState, tuning: &MovementTuning) -> bool {
        tuning.use_variable_height_jump
            && state.jump_released_while_ascending
            && state.gravitational_velocity > 0.0
            && state.time_since_last_jump > tuning.short_hop_extra_gravity_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn test_gravity_pulls_down() {
        let tuning = MovementTuning::default();
        let mut state = MotionState::default();

        GravityIntegrator::integrate(&mut state, &tuning, FRAME);

        assert!(state.gravitational_velocity < 0.0);
        assert!((state.gravitational_velocity + tuning.gravity() * FRAME).abs() < 1e-5);
    }

    #[test]
    fn test_falling_multiplier_only_when_descending() {
        let tuning = MovementTuning {
            falling_gravity_multiplier: 3.0,
            ..Default::default()
        };

        let mut rising = MotionState::default();
        rising.gravitational_velocity = 5.0;
        GravityIntegrator::integrate(&mut rising, &tuning, FRAME);
        let rising_delta = 5.0 - rising.gravitational_velocity;

        let mut falling = MotionState::default();
        falling.gravitational_velocity = -5.0;
        GravityIntegrator::integrate(&mut falling, &tuning, FRAME);
        let falling_delta = -5.0 - falling.gravitational_velocity;

        assert!((falling_delta - 3.0 * rising_delta).abs() < 1e-4);
    }

    #[test]
    fn test_terminal_velocity_clamp() {
        let tuning = MovementTuning::default();
        let mut state = MotionState::default();
        state.gravitational_velocity = -TERMINAL_VELOCITY + 0.01;

        for _ in 0..10 {
            GravityIntegrator::integrate(&mut state, &tuning, FRAME);
        }

        assert_eq!(state.gravitational_velocity, -TERMINAL_VELOCITY);
    }

    #[test]
    fn test_terminal_velocity_accounts_for_planar_y() {
        let tuning = MovementTuning::default();
        let mut state = MotionState::default();
        state.planar_velocity.y = -10.0;
        state.gravitational_velocity = -50.0;

        GravityIntegrator::integrate(&mut state, &tuning, FRAME);

        assert!(state.vertical_speed() >= -TERMINAL_VELOCITY - 1e-4);
    }

    #[test]
    fn test_non_finite_velocity_is_reset() {
        let mut state = MotionState::default();
        state.gravitational_velocity = f32::NAN;

        GravityIntegrator::clamp_terminal(&mut state);

        assert_eq!(state.gravitational_velocity, 0.0);
    }

    #[test]
    fn test_short_hop_waits_for_delay() {
        let tuning = MovementTuning::default();
        let mut state = MotionState::default();
        state.gravitational_velocity = 5.0;
        state.jump_released_while_ascending = true;
        state.time_since_last_jump = 0.0;
        assert!(!GravityIntegrator::short_hop_active(&state, &tuning));

        state.time_since_last_jump = tuning.short_hop_extra_gravity_delay + FRAME;
        assert!(GravityIntegrator::short_hop_active(&state, &tuning));

        let disabled = MovementTuning {
            use_variable_height_jump: false,
            ..Default::default()
        };
        assert!(!GravityIntegrator::short_hop_active(&state, &disabled));
    }

    #[test]
    fn test_half_step_displacement() {
        let tuning = MovementTuning::default();
        let mut state = MotionState::default();
        state.gravitational_velocity = 4.0;

        let v = GravityIntegrator::displacement_velocity(&state, &tuning, 0.1);

        assert!((v - (4.0 - 0.05 * tuning.gravity())).abs() < 1e-5);
    }
}
