//! Planar motion.
//!
//! Turns the move vector and camera yaw into a facing and a target planar
//! velocity, then blends toward it. On the ground the blend rate is scaled by
//! effective friction; in the air by air control.

use glam::Vec3;

use crate::math::{lerp_clamped, smooth_damp_angle, yaw_direction};

use super::config::{MovementTuning, MOVE_INPUT_DEADZONE};
use super::state::{InputSample, MotionState};

/// Stateless planar blender; all state lives in [`MotionState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarMotionBlender;

impl PlanarMotionBlender {
    /// Speed the avatar is trying to reach this tick.
    #[inline]
    pub fn target_speed(input: &InputSample, tuning: &MovementTuning) -> f32 {
        let magnitude = input.move_vector.length();
        if magnitude < MOVE_INPUT_DEADZONE {
            0.0
        } else {
            tuning.max_speed(input.sprint) * magnitude
        }
    }

    /// Update facing and planar velocity.
    ///
    /// # Arguments
    ///
    /// * `state` - The avatar's motion state (will be modified)
    /// * `input` - This tick's input sample
    /// * `camera_yaw` - Camera yaw in radians; input is relative to it
    /// * `effective_friction` - Friction for this tick, ignored while airborne
    /// * `tuning` - Movement tuning
    /// * `delta_time` - Time step in seconds
    pub fn update(
        state: &mut MotionState,
        input: &InputSample,
        camera_yaw: f32,
        effective_friction: f32,
        tuning: &MovementTuning,
        delta_time: f32,
    ) {
        let target_speed = Self::target_speed(input, tuning);

        // Facing holds the last non-zero input direction
        if target_speed > 0.0 {
            let direction = Vec3::new(input.move_vector.x, 0.0, input.move_vector.y).normalize();
            let target_yaw = direction.x.atan2(direction.z) + camera_yaw;
            if target_yaw.is_finite() {
                state.target_yaw = target_yaw;
            }
        }

        state.yaw = smooth_damp_angle(
            state.yaw,
            state.target_yaw,
            &mut state.yaw_velocity,
            tuning.rotation_smooth_time,
            delta_time,
        );

        let target_velocity = yaw_direction(state.target_yaw) * target_speed;

        state.planar_velocity = if state.grounded {
            if tuning.default_friction_is_infinite && effective_friction >= 1.0 {
                target_velocity
            } else {
                lerp_clamped(
                    state.planar_velocity,
                    target_velocity,
                    delta_time * tuning.speed_change_rate * effective_friction,
                )
            }
        } else {
            lerp_clamped(
                state.planar_velocity,
                target_velocity,
                delta_time * tuning.speed_change_rate * tuning.air_control,
            )
        };
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use glam::Vec2;

    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn forward(sprint: bool) -> InputSample {
        InputSample {
            move_vector: Vec2::new(0.0, 1.0),
            sprint,
            ..Default::default()
        }
    }

    fn grounded_state() -> MotionState {
        MotionState {
            grounded: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_target_speed_scales_with_input() {
        let tuning = MovementTuning::default();
        let half = InputSample {
            move_vector: Vec2::new(0.0, 0.5),
            ..Default::default()
        };
        assert!((PlanarMotionBlender::target_speed(&half, &tuning) - tuning.walk_speed * 0.5).abs() < 1e-5);
        assert!((PlanarMotionBlender::target_speed(&forward(true), &tuning) - tuning.run_speed).abs() < 1e-5);

        let tiny = InputSample {
            move_vector: Vec2::new(0.0005, 0.0),
            ..Default::default()
        };
        assert_eq!(PlanarMotionBlender::target_speed(&tiny, &tuning), 0.0);
    }

    #[test]
    fn test_infinite_friction_snaps_to_target() {
        let tuning = MovementTuning::default();
        let mut state = grounded_state();

        PlanarMotionBlender::update(&mut state, &forward(false), 0.0, 1.0, &tuning, FRAME);

        assert!((state.planar_velocity - Vec3::new(0.0, 0.0, tuning.walk_speed)).length() < 1e-5);

        PlanarMotionBlender::update(&mut state, &InputSample::default(), 0.0, 1.0, &tuning, FRAME);
        assert_eq!(state.planar_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_partial_friction_blends() {
        let tuning = MovementTuning::default();
        let mut state = grounded_state();

        PlanarMotionBlender::update(&mut state, &forward(false), 0.0, 0.5, &tuning, FRAME);

        let expected = tuning.walk_speed * FRAME * tuning.speed_change_rate * 0.5;
        assert!((state.planar_velocity.z - expected).abs() < 1e-5);
    }

    #[test]
    fn test_air_control_ignores_friction() {
        let tuning = MovementTuning::default();
        let mut state = MotionState::default();

        PlanarMotionBlender::update(&mut state, &forward(false), 0.0, 1.0, &tuning, FRAME);

        let expected = tuning.walk_speed * FRAME * tuning.speed_change_rate * tuning.air_control;
        assert!((state.planar_velocity.z - expected).abs() < 1e-5);
    }

    #[test]
    fn test_input_is_camera_relative() {
        let tuning = MovementTuning::default();
        let mut state = grounded_state();

        PlanarMotionBlender::update(&mut state, &forward(false), FRAC_PI_2, 1.0, &tuning, FRAME);

        assert!((state.target_yaw - FRAC_PI_2).abs() < 1e-5);
        assert!((state.planar_velocity - Vec3::new(tuning.walk_speed, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_facing_holds_without_input() {
        let tuning = MovementTuning::default();
        let mut state = grounded_state();
        let right = InputSample {
            move_vector: Vec2::new(1.0, 0.0),
            ..Default::default()
        };

        PlanarMotionBlender::update(&mut state, &right, 0.0, 1.0, &tuning, FRAME);
        for _ in 0..120 {
            PlanarMotionBlender::update(&mut state, &InputSample::default(), 0.0, 1.0, &tuning, FRAME);
        }

        assert!((state.target_yaw - FRAC_PI_2).abs() < 1e-5);
        assert!((state.yaw - FRAC_PI_2).abs() < 1e-2, "yaw={}", state.yaw);
    }

    #[test]
    fn test_yaw_smooths_toward_target() {
        let tuning = MovementTuning::default();
        let mut state = grounded_state();
        let right = InputSample {
            move_vector: Vec2::new(1.0, 0.0),
            ..Default::default()
        };

        PlanarMotionBlender::update(&mut state, &right, 0.0, 1.0, &tuning, FRAME);

        assert!(state.yaw > 0.0 && state.yaw < FRAC_PI_2);
    }
}
