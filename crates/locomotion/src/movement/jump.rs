//! Jump arbitration.
//!
//! Decides once per tick whether a jump fires and keeps the jump bookkeeping
//! (count, buffer, coyote window, timeouts) up to date. Exactly one of the
//! grounded and airborne paths runs per tick.
//!
//! A press made shortly before landing is buffered and fires on the landing
//! tick. Walking off a ledge leaves a short coyote window in which the jump
//! still counts as a ground jump; after that one jump is charged.

use super::config::{MovementTuning, GROUNDED_STICK_VELOCITY};
use super::state::{InputSample, MotionState, NEVER};

/// Result of arbitrating jumps for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JumpOutcome {
    /// Whether a jump executed this tick.
    pub jumped: bool,

    /// The fall timeout ran out this tick.
    pub entered_free_fall: bool,
}

/// Stateless jump arbiter; all state lives in [`MotionState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JumpArbiter;

impl JumpArbiter {
    /// Whether another jump is allowed right now.
    #[inline]
    pub fn eligible(state: &MotionState, tuning: &MovementTuning) -> bool {
        state.jump_count < tuning.max_jump_count && tuning.jumping_enabled()
    }

    /// Arbitrate jumps for this tick.
    ///
    /// # Arguments
    ///
    /// * `state` - The avatar's motion state (will be modified)
    /// * `input` - This tick's input sample
    /// * `tuning` - Movement tuning
    /// * `delta_time` - Time step in seconds
    pub fn update(
        state: &mut MotionState,
        input: &InputSample,
        tuning: &MovementTuning,
        delta_time: f32,
    ) -> JumpOutcome {
        let mut outcome = JumpOutcome::default();

        // Advance since-event timers, then register this tick's edges
        state.time_since_jump_button_pressed += delta_time;
        state.time_since_last_jump += delta_time;
        if input.jump_pressed || state.jump_requested {
            state.time_since_jump_button_pressed = 0.0;
        }
        state.jump_button_held = input.jump_held;

        if state.grounded {
            Self::land(state, tuning);

            if state.gravitational_velocity < 0.0 {
                state.gravitational_velocity =
                    state.gravitational_velocity.max(GROUNDED_STICK_VELOCITY);
            }

            if state.jump_timeout_remaining > 0.0 {
                state.jump_timeout_remaining -= delta_time;
            }

            let wants_jump = state.jump_requested
                || input.jump_pressed
                || state.time_since_jump_button_pressed < tuning.jump_buffer_time;
            let timeout_ready = state.jump_timeout_remaining <= 0.0 || state.jump_forced;

            if Self::eligible(state, tuning) && wants_jump && timeout_ready {
                Self::execute(state, tuning);
                outcome.jumped = true;
            }
        } else {
            // Only meaningful right after leaving the ground
            state.jump_timeout_remaining = tuning.jump_timeout;

            if state.fall_timeout_remaining > 0.0 {
                state.fall_timeout_remaining -= delta_time;
                outcome.entered_free_fall = state.fall_timeout_remaining <= 0.0;
            }

            state.time_since_left_ground += delta_time;
            if state.time_since_left_ground > tuning.coyote_time {
                // Coyote window closed: leaving the ground costs a jump
                state.jump_count = state.jump_count.max(1).min(tuning.max_jump_count);
            }

            if !input.jump_held {
                state.jump_released_while_ascending = true;
            }

            let wants_jump = state.jump_requested
                || input.jump_pressed
                || (state.jump_button_held
                    && (state.jump_released_while_ascending
                        || state.last_jump_was_triggered_externally));

            if Self::eligible(state, tuning) && wants_jump {
                Self::neutralize_downward_velocity(state);
                Self::execute(state, tuning);
                outcome.jumped = true;
            }
        }

        // Requests don't queue; the buffer timer carries them forward
        state.jump_requested = false;
        state.jump_forced = false;

        outcome
    }

    /// Reset jump bookkeeping for touching the ground.
    pub fn land(state: &mut MotionState, tuning: &MovementTuning) {
        state.fall_timeout_remaining = tuning.fall_timeout;
        state.jump_count = 0;
        state.time_since_left_ground = 0.0;
    }

    /// Remove residual fall speed so an air jump isn't fighting it.
    fn neutralize_downward_velocity(state: &mut MotionState) {
        if state.external_velocity.y < 0.0 {
            state.external_velocity.y = 0.0;
        }
        if state.gravitational_velocity < 0.0 {
            state.gravitational_velocity = 0.0;
        }
    }

    fn execute(state: &mut MotionState, tuning: &MovementTuning) {
        state.gravitational_velocity = tuning.jump_velocity();
        state.jump_count += 1;
        state.last_jump_was_triggered_externally = state.jump_requested;

        state.jump_requested = false;
        state.jump_forced = false;
        state.jump_released_while_ascending = false;
        state.time_since_jump_button_pressed = NEVER;
        state.time_since_last_jump = 0.0;

        log::debug!(
            "jump {} fired (grounded={}, v={:.2})",
            state.jump_count,
            state.grounded,
            state.gravitational_velocity
        );
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn press() -> InputSample {
        InputSample {
            jump_pressed: true,
            jump_held: true,
            ..Default::default()
        }
    }

    fn hold() -> InputSample {
        InputSample {
            jump_held: true,
            ..Default::default()
        }
    }

    fn idle() -> InputSample {
        InputSample::default()
    }

    fn grounded_state() -> MotionState {
        let mut state = MotionState::default();
        state.grounded = true;
        state
    }

    fn update(state: &mut MotionState, input: InputSample, tuning: &MovementTuning) -> JumpOutcome {
        JumpArbiter::update(state, &input, tuning, FRAME)
    }

    #[test]
    fn test_basic_ground_jump() {
        let tuning = MovementTuning::default();
        let mut state = grounded_state();

        let outcome = update(&mut state, press(), &tuning);

        assert!(outcome.jumped);
        assert_eq!(state.jump_count, 1);
        assert!((state.gravitational_velocity - tuning.jump_velocity()).abs() < 1e-6);
        assert_eq!(state.time_since_last_jump, 0.0);
        assert!(!state.last_jump_was_triggered_externally);
    }

    #[test]
    fn test_no_jump_without_request() {
        let tuning = MovementTuning::default();
        let mut state = grounded_state();

        let outcome = update(&mut state, idle(), &tuning);

        assert!(!outcome.jumped);
        assert_eq!(state.jump_count, 0);
    }

    #[test]
    fn test_ineligible_jump_is_silent_noop() {
        let tuning = MovementTuning {
            max_jump_count: 2,
            ..Default::default()
        };
        let mut state = MotionState::default();
        state.jump_count = 2;
        state.gravitational_velocity = -3.0;
        state.jump_released_while_ascending = true;

        let outcome = update(&mut state, press(), &tuning);

        assert!(!outcome.jumped);
        assert_eq!(state.jump_count, 2);
        assert_eq!(state.gravitational_velocity, -3.0);
    }

    #[test]
    fn test_zero_jump_height_disables_jumping() {
        let tuning = MovementTuning {
            jump_height: 0.0,
            ..Default::default()
        };
        let mut state = grounded_state();

        assert!(!update(&mut state, press(), &tuning).jumped);
        assert_eq!(state.jump_count, 0);
    }

    #[test]
    fn test_grounded_clamps_fall_speed_to_stick_velocity() {
        let tuning = MovementTuning::default();
        let mut state = grounded_state();
        state.gravitational_velocity = -12.0;

        update(&mut state, idle(), &tuning);

        assert_eq!(state.gravitational_velocity, GROUNDED_STICK_VELOCITY);
    }

    #[test]
    fn test_jump_timeout_blocks_until_expired() {
        let tuning = MovementTuning {
            jump_timeout: 0.1,
            jump_buffer_time: 0.0,
            ..Default::default()
        };
        let mut state = grounded_state();
        state.jump_timeout_remaining = tuning.jump_timeout;

        assert!(!update(&mut state, press(), &tuning).jumped);

        for _ in 0..10 {
            update(&mut state, idle(), &tuning);
        }

        assert!(update(&mut state, press(), &tuning).jumped);
    }

    #[test]
    fn test_forced_request_skips_timeout() {
        let tuning = MovementTuning {
            jump_timeout: 1.0,
            ..Default::default()
        };
        let mut state = grounded_state();
        state.jump_timeout_remaining = 1.0;
        state.request_jump(true);

        let outcome = update(&mut state, idle(), &tuning);

        assert!(outcome.jumped);
        assert!(state.last_jump_was_triggered_externally);
        assert!(!state.jump_forced);
        assert!(!state.jump_requested);
    }

    #[test]
    fn test_airborne_rearms_jump_timeout() {
        let tuning = MovementTuning {
            jump_timeout: 0.3,
            ..Default::default()
        };
        let mut state = MotionState::default();

        update(&mut state, idle(), &tuning);

        assert_eq!(state.jump_timeout_remaining, 0.3);
    }

    #[test]
    fn test_holding_through_jump_does_not_air_jump() {
        let tuning = MovementTuning::default();
        let mut state = grounded_state();

        assert!(update(&mut state, press(), &tuning).jumped);
        state.grounded = false;

        for _ in 0..20 {
            assert!(!update(&mut state, hold(), &tuning).jumped);
        }
        assert_eq!(state.jump_count, 1);
    }

    #[test]
    fn test_release_then_press_air_jumps() {
        let tuning = MovementTuning::default();
        let mut state = grounded_state();

        update(&mut state, press(), &tuning);
        state.grounded = false;

        update(&mut state, hold(), &tuning);
        update(&mut state, idle(), &tuning);
        assert!(state.jump_released_while_ascending);

        let outcome = update(&mut state, press(), &tuning);
        assert!(outcome.jumped);
        assert_eq!(state.jump_count, 2);
        assert!(!state.jump_released_while_ascending);
    }

    #[test]
    fn test_air_jump_neutralizes_fall_speed() {
        let tuning = MovementTuning::default();
        let mut state = MotionState::default();
        state.jump_count = 1;
        state.gravitational_velocity = -15.0;
        state.external_velocity = glam::Vec3::new(2.0, -4.0, 0.0);
        state.jump_released_while_ascending = true;

        assert!(update(&mut state, press(), &tuning).jumped);

        assert_eq!(state.external_velocity, glam::Vec3::new(2.0, 0.0, 0.0));
        assert!((state.gravitational_velocity - tuning.jump_velocity()).abs() < 1e-6);
    }

    #[test]
    fn test_coyote_window_allows_ground_count_jump() {
        let tuning = MovementTuning {
            max_jump_count: 1,
            ..Default::default()
        };
        let mut state = MotionState::default();

        // A few ticks airborne, still inside the coyote window
        for _ in 0..3 {
            update(&mut state, idle(), &tuning);
        }
        assert_eq!(state.jump_count, 0);

        assert!(update(&mut state, press(), &tuning).jumped);
        assert_eq!(state.jump_count, 1);
    }

    #[test]
    fn test_press_on_first_airborne_tick_uses_coyote() {
        let tuning = MovementTuning {
            max_jump_count: 1,
            ..Default::default()
        };
        let mut state = grounded_state();
        update(&mut state, idle(), &tuning);

        // Walked off; the button was up the whole time on the ground
        state.grounded = false;
        let outcome = update(&mut state, press(), &tuning);

        assert!(outcome.jumped);
        assert_eq!(state.jump_count, 1);
    }

    #[test]
    fn test_coyote_charge_respects_disabled_jumping() {
        let tuning = MovementTuning {
            max_jump_count: 0,
            ..Default::default()
        };
        let mut state = MotionState::default();

        for _ in 0..30 {
            assert!(!update(&mut state, press(), &tuning).jumped);
        }

        assert_eq!(state.jump_count, 0);
    }

    #[test]
    fn test_coyote_window_expiry_charges_a_jump() {
        let tuning = MovementTuning {
            max_jump_count: 1,
            ..Default::default()
        };
        let mut state = MotionState::default();

        let ticks = (tuning.coyote_time / FRAME) as usize + 2;
        for _ in 0..ticks {
            update(&mut state, idle(), &tuning);
        }
        assert_eq!(state.jump_count, 1);

        assert!(!update(&mut state, press(), &tuning).jumped);
    }

    #[test]
    fn test_buffered_press_fires_on_landing() {
        let tuning = MovementTuning::default();
        let mut state = MotionState::default();
        state.jump_count = 2;

        // Press while airborne with no jumps left
        assert!(!update(&mut state, press(), &tuning).jumped);
        update(&mut state, idle(), &tuning);

        state.grounded = true;
        assert!(update(&mut state, idle(), &tuning).jumped);
    }

    #[test]
    fn test_stale_buffer_does_not_fire() {
        let tuning = MovementTuning::default();
        let mut state = MotionState::default();
        state.jump_count = 2;

        update(&mut state, press(), &tuning);
        let ticks = (tuning.jump_buffer_time / FRAME) as usize + 2;
        for _ in 0..ticks {
            update(&mut state, idle(), &tuning);
        }

        state.grounded = true;
        assert!(!update(&mut state, idle(), &tuning).jumped);
    }

    #[test]
    fn test_jump_consumes_buffer() {
        let tuning = MovementTuning::default();
        let mut state = grounded_state();

        assert!(update(&mut state, press(), &tuning).jumped);
        // Still grounded on the next tick (e.g. a ceiling): no second jump
        assert!(!update(&mut state, hold(), &tuning).jumped);
    }

    #[test]
    fn test_external_jump_then_held_button_air_jumps() {
        // Preserved quirk: after an externally triggered jump, holding the
        // button fires the next air jump without a fresh press.
        let tuning = MovementTuning::default();
        let mut state = grounded_state();
        state.request_jump(false);

        assert!(update(&mut state, idle(), &tuning).jumped);
        state.grounded = false;

        let outcome = update(&mut state, hold(), &tuning);
        assert!(outcome.jumped);
        assert_eq!(state.jump_count, 2);
    }

    #[test]
    fn test_unconsumed_request_is_dropped() {
        let tuning = MovementTuning::default();
        let mut state = MotionState::default();
        state.jump_count = 2;
        state.request_jump(true);

        update(&mut state, idle(), &tuning);

        assert!(!state.jump_requested);
        assert!(!state.jump_forced);
    }

    #[test]
    fn test_fall_timeout_reports_free_fall_once() {
        let tuning = MovementTuning::default();
        let mut state = grounded_state();
        update(&mut state, idle(), &tuning);
        state.grounded = false;

        let mut free_fall_ticks = 0;
        for _ in 0..60 {
            if update(&mut state, idle(), &tuning).entered_free_fall {
                free_fall_ticks += 1;
            }
        }
        assert_eq!(free_fall_ticks, 1);
        assert!(state.is_free_falling());
    }
}
