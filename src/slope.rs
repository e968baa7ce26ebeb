//! Slope math.
//!
//! Pure functions for bending horizontal movement intent along an incline:
//! plane projection, signed slope angle, and the effort curve that makes
//! climbing harder as the surface approaches the maximum walkable angle.

use bevy::prelude::*;

/// Projects a movement direction onto the plane defined by the ground normal.
///
/// Returns the normalized result, so horizontal intent is bent along the
/// incline without changing its magnitude. A zero direction projects to zero.
pub fn project_onto_slope(direction: Vec3, ground_normal: Vec3) -> Vec3 {
    let rejected = direction - ground_normal * direction.dot(ground_normal);
    rejected.normalize_or_zero()
}

/// Signed angle of the current slope in degrees, relative to the direction
/// of travel.
///
/// Positive when moving uphill, negative when moving downhill. The downhill
/// tangent is derived from the ground normal (`up x normal x normal`), and
/// the sign comes from the direction's alignment with it. A zero-length
/// direction yields 0.
pub fn slope_angle(direction: Vec3, ground_normal: Vec3) -> f32 {
    let normalized = direction.normalize_or_zero();
    if normalized == Vec3::ZERO {
        return 0.0;
    }
    let downhill = Vec3::Y
        .cross(ground_normal)
        .cross(ground_normal)
        .normalize_or_zero();
    let angle = ground_normal.angle_between(Vec3::Y).to_degrees();
    if normalized.dot(downhill) > 0.0 {
        -angle
    } else {
        angle
    }
}

/// How much vertical effort the character can still put in on a slope of
/// the given signed angle, in `[0, 1]`.
///
/// Flat or downhill slopes (`slope_angle <= 0`) get full effort. At or past
/// `max_slope_angle` the multiplier is 0 and no vertical contribution
/// remains. In between, effort falls off as `1 - (angle / max)^exponent`,
/// so the curve exponent controls how late the falloff kicks in.
pub fn effort_multiplier(slope_angle: f32, max_slope_angle: f32, curve_exponent: f32) -> f32 {
    if slope_angle <= 0.0 {
        return 1.0;
    }
    if slope_angle >= max_slope_angle {
        return 0.0;
    }
    let t = slope_angle / max_slope_angle;
    1.0 - t.powf(curve_exponent)
}
