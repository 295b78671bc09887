//! Small numeric helpers shared by the movement components.
//!
//! Everything here is plain `f32` math with no platform intrinsics, so the
//! results are identical wherever the simulation runs.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Linear interpolation with `t` clamped to `[0, 1]`.
#[inline]
pub fn lerp_clamped(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    from + (to - from) * t
}

/// Wrap an angle in radians to `(-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut wrapped = angle % TAU;
    if wrapped > PI {
        wrapped -= TAU;
    } else if wrapped <= -PI {
        wrapped += TAU;
    }
    wrapped
}

/// Shortest signed difference `to - from`, wrapped to `(-PI, PI]`.
#[inline]
pub fn delta_angle(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

/// Critically damped spring toward `target`.
///
/// Follows the Game Programming Gems 4 formulation: `velocity` carries the
/// spring state between calls, and `smooth_time` is roughly the time it takes
/// to reach the target. A non-positive smooth time snaps immediately.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    delta_time: f32,
) -> f32 {
    if smooth_time <= 1e-4 || !smooth_time.is_finite() {
        *velocity = 0.0;
        return target;
    }

    let omega = 2.0 / smooth_time;
    let x = omega * delta_time;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * delta_time;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Prevent overshooting
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }

    output
}

/// [`smooth_damp`] for angles: always turns the short way round.
pub fn smooth_damp_angle(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    delta_time: f32,
) -> f32 {
    let target = current + delta_angle(current, target);
    wrap_angle(smooth_damp(current, target, velocity, smooth_time, delta_time))
}

/// Unit vector on the ground plane for a yaw angle (0 = +Z, PI/2 = +X).
#[inline]
pub fn yaw_direction(yaw: f32) -> Vec3 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    Vec3::new(sin_yaw, 0.0, cos_yaw)
}

/// Replace non-finite components with zero.
#[inline]
pub fn finite_or_zero(v: Vec3) -> Vec3 {
    if v.is_finite() {
        v
    } else {
        Vec3::ZERO
    }
}
