//! Combines vernier and main propulsion into world-frame accelerations and
//! applies the gain-scheduled velocity shaping.
//!
//! The raw physics alone would leave the missile wandering; the gain
//! schedule bends acceleration and then velocity toward the goal, harder as
//! flight time accumulates.

use glam::{DQuat, DVec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use vernier_core::config::{DynamicsConfig, GuidanceConfig};
use vernier_core::constants::PERTURBATION_DIVISOR;
use vernier_core::math::{
    add_and_renormalize, direction_or_zero, lerp_preserving_magnitude, local_to_world,
    normalized_or_identity,
};
use vernier_core::types::{MassProperties, RigidBodyState};

use crate::thrusters::LocalDynamicsContribution;

/// Accelerations for one tick, world frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldKinematicsContribution {
    pub linear_acceleration: DVec3,
    pub angular_acceleration: DVec3,
}

/// Scales the normalized contributions to physical magnitudes.
///
/// Linear: (vernier force × vernier magnitude + main force × main
/// magnitude) / mass. Angular: vernier torque × torque magnitude, divided
/// per axis by the moment of inertia. Both are rotated to world space.
pub fn net_accelerations(
    body: &RigidBodyState,
    mass: &MassProperties,
    vernier: LocalDynamicsContribution,
    main: LocalDynamicsContribution,
    config: &GuidanceConfig,
) -> WorldKinematicsContribution {
    let orientation = normalized_or_identity(body.orientation);
    let force = vernier.force * config.vernier.net_force_magnitude
        + main.force * config.main_propulsion.net_force_magnitude;
    let linear_local = force / mass.mass();
    let angular_local = vernier.torque
        * config.vernier.net_torque_magnitude
        * mass.inverse_moment_of_inertia();

    WorldKinematicsContribution {
        linear_acceleration: local_to_world(orientation, linear_local),
        angular_acceleration: local_to_world(orientation, angular_local),
    }
}

/// Integrates angular acceleration, then damps and caps the angular speed.
pub fn apply_angular(
    body: &mut RigidBodyState,
    angular_acceleration: DVec3,
    dt: f64,
    config: &DynamicsConfig,
) {
    let omega = (body.angular_velocity + angular_acceleration * dt)
        * config.angular_velocity_dampening;
    body.angular_velocity = omega.clamp_length_max(config.max_angular_speed);
}

/// Inputs for the linear shaping step.
pub struct LinearShaping {
    pub goal_direction: DVec3,
    pub dt: f64,
    pub elapsed_millis: f64,
    pub locked: bool,
}

/// Redirects acceleration toward the goal, integrates it into velocity,
/// pulls velocity toward the acceleration, caps speed for the phase, then
/// re-biases toward the goal. Returns the redirected acceleration.
pub fn apply_linear(
    body: &mut RigidBodyState,
    linear_acceleration: DVec3,
    shaping: &LinearShaping,
    config: &GuidanceConfig,
) -> DVec3 {
    let schedule = &config.gain_schedule;
    let acceleration_gain = schedule.acceleration_gain(shaping.elapsed_millis);
    let velocity_gain = schedule.velocity_gain(shaping.elapsed_millis);

    let acceleration =
        lerp_preserving_magnitude(linear_acceleration, shaping.goal_direction, acceleration_gain);
    let velocity = body.linear_velocity + acceleration * shaping.dt;
    let velocity =
        lerp_preserving_magnitude(velocity, direction_or_zero(acceleration), velocity_gain);
    let velocity = velocity.clamp_length_max(config.terminal_velocity_cap(shaping.locked));
    body.linear_velocity = lerp_preserving_magnitude(
        velocity,
        shaping.goal_direction,
        acceleration_gain * schedule.terminal_rebias_fraction,
    );
    acceleration
}

/// Adds a small random quaternion to the orientation.
///
/// Each component is uniform in [0, e^dt / 100). The draw order is fixed
/// (x, y, z, w) so a seeded generator reproduces the same flight.
pub fn perturb_orientation<R: Rng + ?Sized>(body: &mut RigidBodyState, dt: f64, rng: &mut R) {
    let scale = dt.exp() / PERTURBATION_DIVISOR;
    let x = rng.gen::<f64>() * scale;
    let y = rng.gen::<f64>() * scale;
    let z = rng.gen::<f64>() * scale;
    let w = rng.gen::<f64>() * scale;
    body.orientation = add_and_renormalize(body.orientation, DQuat::from_xyzw(x, y, z, w));
}
