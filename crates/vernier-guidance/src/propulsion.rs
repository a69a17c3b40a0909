//! Main motor: thrust along the body's forward axis, throttled by how
//! closely the nose points at the goal.

use glam::DVec3;

use vernier_core::config::MainPropulsionConfig;
use vernier_core::constants::BODY_FORWARD;
use vernier_core::math::lerp_clamped;

use crate::thrusters::LocalDynamicsContribution;

/// Throttle in [min_seek_power, max_seek_power]. Headings abeam of or
/// behind the goal get the minimum.
pub fn main_propulsion_power(
    forward_world: DVec3,
    goal_direction: DVec3,
    config: &MainPropulsionConfig,
) -> f64 {
    let agreement = forward_world.dot(goal_direction);
    let agreement = if agreement.is_finite() { agreement.max(0.0) } else { 0.0 };
    lerp_clamped(config.min_seek_power, config.max_seek_power, agreement)
}

/// Normalized body-frame force of the main motor. Produces no torque.
pub fn main_propulsion_local(
    forward_world: DVec3,
    goal_direction: DVec3,
    config: &MainPropulsionConfig,
) -> LocalDynamicsContribution {
    LocalDynamicsContribution {
        force: BODY_FORWARD * main_propulsion_power(forward_world, goal_direction, config),
        torque: DVec3::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_power_bounds() {
        let config = MainPropulsionConfig::default();
        assert_abs_diff_eq!(main_propulsion_power(DVec3::Z, DVec3::Z, &config), 1.0);
        assert_abs_diff_eq!(main_propulsion_power(DVec3::Z, DVec3::X, &config), 0.6);
        assert_abs_diff_eq!(main_propulsion_power(DVec3::Z, -DVec3::Z, &config), 0.6);
        // Zero goal behaves like an abeam goal.
        assert_abs_diff_eq!(main_propulsion_power(DVec3::Z, DVec3::ZERO, &config), 0.6);
    }

    #[test]
    fn test_force_is_along_body_forward() {
        let config = MainPropulsionConfig::default();
        let goal = DVec3::new(0.0, 1.0, 1.0).normalize();
        let out = main_propulsion_local(DVec3::Z, goal, &config);
        assert_eq!(out.force.x, 0.0);
        assert_eq!(out.force.y, 0.0);
        assert!(out.force.z > 0.6 && out.force.z < 1.0);
        assert_eq!(out.torque, DVec3::ZERO);
    }
}
