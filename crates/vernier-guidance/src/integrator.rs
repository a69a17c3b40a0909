//! Explicit Euler rigid-body integration.

use glam::DVec3;

use vernier_core::math::{add_and_renormalize, normalized_or_identity, predicted_orientation_delta};
use vernier_core::types::RigidBodyState;

/// Advances position and orientation by `dt`.
///
/// Gravity is added to velocity first, then position moves by the new
/// velocity. Orientation takes the additive half-step derivative for the
/// angular impulse `ω·dt` and is renormalized.
pub fn integrate(body: &mut RigidBodyState, dt: f64, gravity: DVec3) {
    body.linear_velocity += gravity * dt;
    body.position += body.linear_velocity * dt;

    let orientation = normalized_or_identity(body.orientation);
    let delta = predicted_orientation_delta(body.angular_velocity * dt, orientation);
    body.orientation = add_and_renormalize(orientation, delta);
}
