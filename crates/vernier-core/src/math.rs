//! Vector and quaternion primitives shared by guidance and integration.
//!
//! Orientation integration here is additive: a derivative-like quaternion is
//! summed component-wise onto the current orientation and the result is
//! renormalized. It is a linearization, not an exponential map, and flight
//! characteristics depend on its exact error.

use glam::{DQuat, DVec3};

use crate::constants::{BODY_FORWARD, DIRECTION_EPSILON};

/// Unit direction of `v`, or zero when `v` has no usable length.
pub fn direction_or_zero(v: DVec3) -> DVec3 {
    let length = v.length();
    if length > DIRECTION_EPSILON && length.is_finite() {
        v / length
    } else {
        DVec3::ZERO
    }
}

/// Normalized quaternion, or identity when `q` has no usable length.
pub fn normalized_or_identity(q: DQuat) -> DQuat {
    let length = q.length();
    if length > DIRECTION_EPSILON && length.is_finite() {
        q / length
    } else {
        DQuat::IDENTITY
    }
}

/// Approximate orientation change caused by an angular impulse.
///
/// Builds a rotation of `2 * |impulse|` radians about the impulse axis,
/// composes it with `orientation`, and halves every component (half-step
/// dq/dt). A zero impulse yields the half-scaled orientation itself, which
/// `add_and_renormalize` turns back into `orientation` unchanged.
pub fn predicted_orientation_delta(angular_impulse: DVec3, orientation: DQuat) -> DQuat {
    let magnitude = angular_impulse.length();
    let rotation = if magnitude > DIRECTION_EPSILON && magnitude.is_finite() {
        DQuat::from_axis_angle(angular_impulse / magnitude, 2.0 * magnitude)
    } else {
        DQuat::IDENTITY
    };
    (rotation * orientation) * 0.5
}

/// Component-wise sum of two quaternions, renormalized to unit length.
///
/// If the sum cancels out, `a` is returned (normalized) instead.
pub fn add_and_renormalize(a: DQuat, b: DQuat) -> DQuat {
    let sum = a + b;
    let length = sum.length();
    if length > DIRECTION_EPSILON && length.is_finite() {
        sum / length
    } else {
        normalized_or_identity(a)
    }
}

/// Turns the direction of `v` toward `target_direction` by fraction `t`
/// while keeping the magnitude of `v`.
///
/// `t` is clamped to [0, 1]. A zero `v`, or a blend that cancels to zero,
/// yields the zero vector.
pub fn lerp_preserving_magnitude(v: DVec3, target_direction: DVec3, t: f64) -> DVec3 {
    let magnitude = v.length();
    if magnitude <= DIRECTION_EPSILON || !magnitude.is_finite() {
        return DVec3::ZERO;
    }
    let blended = (v / magnitude).lerp(target_direction, t.clamp(0.0, 1.0));
    direction_or_zero(blended) * magnitude
}

/// Scalar lerp with `t` clamped to [0, 1].
pub fn lerp_clamped(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Vector lerp with `t` clamped to [0, 1].
pub fn lerp_vec_clamped(a: DVec3, b: DVec3, t: f64) -> DVec3 {
    a.lerp(b, t.clamp(0.0, 1.0))
}

/// The body's forward axis expressed in world space.
pub fn forward_axis(orientation: DQuat) -> DVec3 {
    orientation * BODY_FORWARD
}

/// Rotates a world-space vector into the body frame.
pub fn world_to_local(orientation: DQuat, v: DVec3) -> DVec3 {
    orientation.inverse() * v
}

/// Rotates a body-frame vector into world space.
pub fn local_to_world(orientation: DQuat, v: DVec3) -> DVec3 {
    orientation * v
}
