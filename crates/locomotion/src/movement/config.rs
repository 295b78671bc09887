//! Movement tuning and fixed constants.
//!
//! All tuning parameters are grouped here for easy adjustment per avatar
//! profile. Values use metric units (meters, seconds) unless noted.

use serde::{Deserialize, Serialize};

/// Gravity acceleration magnitude (meters/second²) before the multiplier.
pub const GRAVITY: f32 = 9.81;

/// Maximum downward speed the integrator will allow (meters/second).
pub const TERMINAL_VELOCITY: f32 = 53.0;

/// Gravitational velocity applied while grounded so the avatar hugs slopes.
pub const GROUNDED_STICK_VELOCITY: f32 = -2.0;

/// Minimum contact normal Y for a surface to count as ground.
/// 0.7 ≈ 45 degrees.
pub const MIN_GROUND_NORMAL_Y: f32 = 0.7;

/// Jump heights at or below this disable jumping.
pub const JUMP_HEIGHT_EPSILON: f32 = 1e-3;

/// Move input magnitudes below this count as no input.
pub const MOVE_INPUT_DEADZONE: f32 = 0.001;

/// Extra gravity units applied during a short hop.
pub const SHORT_HOP_EXTRA_GRAVITY: f32 = 1.0;

/// Largest time step a single tick will integrate (seconds).
pub const MAX_TICK_DELTA: f32 = 0.066;

/// Per-avatar movement tuning.
///
/// Immutable from the controller's point of view: the owning environment or
/// avatar profile sets it, the controller only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    // ========================================================================
    // Speeds
    // ========================================================================
    /// Walking speed (meters/second).
    pub walk_speed: f32,

    /// Running/sprinting speed (meters/second).
    pub run_speed: f32,

    /// How quickly planar velocity approaches the target (1/second).
    pub speed_change_rate: f32,

    /// Time to turn toward the input direction (seconds).
    pub rotation_smooth_time: f32,

    // ========================================================================
    // Jumping
    // ========================================================================
    /// Apex height of a jump from rest (meters).
    pub jump_height: f32,

    /// Jumps allowed before touching ground again (1 = no double jump).
    pub max_jump_count: u32,

    /// Release the button early to cut the jump short.
    pub use_variable_height_jump: bool,

    // ========================================================================
    // Gravity
    // ========================================================================
    /// Scales [`GRAVITY`].
    pub gravity_multiplier: f32,

    /// Extra scale applied to gravity while descending.
    pub falling_gravity_multiplier: f32,

    // ========================================================================
    // Friction and Control
    // ========================================================================
    /// Air control factor (0.0 = no air control, 1.0 = full control).
    pub air_control: f32,

    /// Avatar base friction (0.0 to 1.0).
    pub ground_friction: f32,

    /// Full friction ground stops and starts instantly.
    pub default_friction_is_infinite: bool,

    // ========================================================================
    // Timers (seconds)
    // ========================================================================
    /// Delay after landing before another grounded jump is allowed.
    pub jump_timeout: f32,

    /// Airborne time before the avatar counts as free falling.
    pub fall_timeout: f32,

    /// Grace window after leaving ground in which a jump is still a ground jump.
    pub coyote_time: f32,

    /// How long a jump press is remembered before landing.
    pub jump_buffer_time: f32,

    /// Time after a jump before early release adds short-hop gravity.
    pub short_hop_extra_gravity_delay: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            // Speeds
            walk_speed: 3.0,
            run_speed: 6.5,
            speed_change_rate: 10.0,
            rotation_smooth_time: 0.12,

            // Jumping
            jump_height: 1.5,
            max_jump_count: 2,
            use_variable_height_jump: true,

            // Gravity
            gravity_multiplier: 1.5,
            falling_gravity_multiplier: 1.5,

            // Friction and control
            air_control: 0.6,
            ground_friction: 1.0,
            default_friction_is_infinite: true,

            // Timers
            jump_timeout: 0.0,
            fall_timeout: 0.15,
            coyote_time: 0.15,
            jump_buffer_time: 0.15,
            short_hop_extra_gravity_delay: 0.1,
        }
    }
}

impl MovementTuning {
    /// Snappy platformer feel: triple jump, strong fall gravity.
    pub fn platformer() -> Self {
        Self {
            run_speed: 8.0,
            jump_height: 2.0,
            max_jump_count: 3,
            gravity_multiplier: 2.0,
            falling_gravity_multiplier: 2.0,
            air_control: 0.9,
            ..Default::default()
        }
    }

    /// Heavy, grounded feel: single jump, slow turns, accelerates over time.
    pub fn grounded_heavy() -> Self {
        Self {
            walk_speed: 2.5,
            run_speed: 5.0,
            speed_change_rate: 6.0,
            rotation_smooth_time: 0.25,
            jump_height: 1.0,
            max_jump_count: 1,
            use_variable_height_jump: false,
            falling_gravity_multiplier: 1.0,
            air_control: 0.2,
            ground_friction: 0.8,
            default_friction_is_infinite: false,
            jump_timeout: 0.2,
            ..Default::default()
        }
    }

    /// Absolute gravity acceleration for this avatar (meters/second²).
    #[inline]
    pub fn gravity(&self) -> f32 {
        (GRAVITY * self.gravity_multiplier).abs()
    }

    /// Initial upward speed needed to reach `jump_height` under [`Self::gravity`].
    #[inline]
    pub fn jump_velocity(&self) -> f32 {
        (2.0 * (self.jump_height * GRAVITY * self.gravity_multiplier).abs()).sqrt()
    }

    /// Whether this tuning permits jumping at all.
    #[inline]
    pub fn jumping_enabled(&self) -> bool {
        self.max_jump_count > 0 && self.jump_height > JUMP_HEIGHT_EPSILON
    }

    /// Target speed for the current sprint state.
    #[inline]
    pub fn max_speed(&self, sprinting: bool) -> f32 {
        if sprinting {
            self.run_speed
        } else {
            self.walk_speed
        }
    }

    /// Copy with every field forced into its valid range.
    ///
    /// Unit-range fields are clamped to `[0, 1]`; non-finite or negative
    /// values fall back to the defaults. `jump_height` is left alone so that
    /// a zero height keeps jumping disabled.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut tuning = self.clone();

        let non_negative = |name: &str, value: f32, fallback: f32| -> f32 {
            if value.is_finite() && value >= 0.0 {
                value
            } else {
                log::warn!("tuning {name}={value} is invalid, using {fallback}");
                fallback
            }
        };
        let unit = |name: &str, value: f32, fallback: f32| -> f32 {
            if !value.is_finite() {
                log::warn!("tuning {name}={value} is not finite, using {fallback}");
                fallback
            } else if !(0.0..=1.0).contains(&value) {
                log::warn!("tuning {name}={value} is outside [0, 1], clamping");
                value.clamp(0.0, 1.0)
            } else {
                value
            }
        };

        tuning.walk_speed = non_negative("walk_speed", tuning.walk_speed, defaults.walk_speed);
        tuning.run_speed = non_negative("run_speed", tuning.run_speed, defaults.run_speed);
        tuning.speed_change_rate = non_negative(
            "speed_change_rate",
            tuning.speed_change_rate,
            defaults.speed_change_rate,
        );
        tuning.rotation_smooth_time = non_negative(
            "rotation_smooth_time",
            tuning.rotation_smooth_time,
            defaults.rotation_smooth_time,
        );
        if !tuning.jump_height.is_finite() {
            log::warn!("tuning jump_height is not finite, disabling jumps");
            tuning.jump_height = 0.0;
        }
        tuning.gravity_multiplier = non_negative(
            "gravity_multiplier",
            tuning.gravity_multiplier,
            defaults.gravity_multiplier,
        );
        tuning.falling_gravity_multiplier = non_negative(
            "falling_gravity_multiplier",
            tuning.falling_gravity_multiplier,
            defaults.falling_gravity_multiplier,
        );
        tuning.air_control = unit("air_control", tuning.air_control, defaults.air_control);
        tuning.ground_friction =
            unit("ground_friction", tuning.ground_friction, defaults.ground_friction);
        tuning.jump_timeout =
            non_negative("jump_timeout", tuning.jump_timeout, defaults.jump_timeout);
        tuning.fall_timeout =
            non_negative("fall_timeout", tuning.fall_timeout, defaults.fall_timeout);
        tuning.coyote_time = non_negative("coyote_time", tuning.coyote_time, defaults.coyote_time);
        tuning.jump_buffer_time = non_negative(
            "jump_buffer_time",
            tuning.jump_buffer_time,
            defaults.jump_buffer_time,
        );
        tuning.short_hop_extra_gravity_delay = non_negative(
            "short_hop_extra_gravity_delay",
            tuning.short_hop_extra_gravity_delay,
            defaults.short_hop_extra_gravity_delay,
        );

        tuning
    }
}
