//! Vernier thruster power allocation.
//!
//! For a goal direction, each thruster's power blends how well its sensed
//! push agrees with the goal (seeking) and whether its torque would swing
//! the nose toward the goal (alignment). Sensed directions drive the
//! decision while commanded directions produce the actual force, so a
//! biased sensor yields a systematic spiral.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use vernier_core::config::VernierConfig;
use vernier_core::constants::VERNIER_PREDICTION_STEP;
use vernier_core::math::{
    add_and_renormalize, direction_or_zero, forward_axis, normalized_or_identity,
    predicted_orientation_delta, world_to_local,
};
use vernier_core::types::{MassProperties, RigidBodyState, ThrusterArray};

/// Force/torque pair in the body frame.
///
/// Vernier output is normalized: all thrusters at full power sum to unit
/// scale. Physical magnitudes are applied by the blender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalDynamicsContribution {
    pub force: DVec3,
    pub torque: DVec3,
}

/// Power in [0, 1] for one thruster given its seeking and alignment scores.
pub fn thruster_power(seeking: f64, alignment: f64, config: &VernierConfig) -> f64 {
    let power = seeking * config.seeking_power
        + alignment * config.alignment_power
        + config.constant_power;
    if power.is_finite() {
        power.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Scores how the predicted orientation moves the forward axis relative to
/// the goal.
///
/// Cosine between (goal − forward now) and (forward predicted − forward
/// now): 1 when the nose swings straight at the goal, −1 when it swings
/// away. Negative scores are kept so over-rotation is penalized. Zero when
/// either the nose already points at the goal or the rotation is nil.
pub fn rotational_alignment_score(
    initial: DQuat,
    predicted: DQuat,
    goal_direction: DVec3,
) -> f64 {
    let forward_initial = forward_axis(initial);
    let forward_predicted = forward_axis(predicted);
    let initial_to_goal = direction_or_zero(goal_direction - forward_initial);
    let initial_to_predicted = direction_or_zero(forward_predicted - forward_initial);
    initial_to_goal.dot(initial_to_predicted)
}

/// Computes the normalized body-frame vernier contribution for one goal.
pub fn allocate(
    body: &RigidBodyState,
    mass: &MassProperties,
    thrusters: &ThrusterArray,
    config: &VernierConfig,
    goal_direction: DVec3,
) -> LocalDynamicsContribution {
    let q_initial = normalized_or_identity(body.orientation);
    let center_of_mass_world = body.position + q_initial * mass.center_of_mass();
    let total_strength = thrusters.total_strength();

    let mut force_world = DVec3::ZERO;
    let mut torque_world = DVec3::ZERO;
    for thruster in thrusters {
        let weight = thruster.strength / total_strength;
        let lever_arm = body.position + q_initial * thruster.local_position - center_of_mass_world;

        // Predict the isolated orientation change of this thruster's torque,
        // as the (possibly biased) sensor sees it.
        let sensed_direction = q_initial * thruster.sensed_direction;
        let biased_torque = lever_arm.cross(sensed_direction * weight);
        let delta = predicted_orientation_delta(biased_torque * VERNIER_PREDICTION_STEP, q_initial);
        let q_predicted = add_and_renormalize(q_initial, delta);

        let alignment = rotational_alignment_score(q_initial, q_predicted, goal_direction);
        let seeking = sensed_direction.dot(goal_direction);
        let power = thruster_power(seeking, alignment, config);

        let thrust = q_initial * thruster.thrust_direction * (weight * power);
        force_world += thrust;
        torque_world += lever_arm.cross(thrust);
    }

    LocalDynamicsContribution {
        force: world_to_local(q_initial, force_world),
        torque: world_to_local(q_initial, torque_world),
    }
}

/// Holds the last allocation and recomputes it only every
/// `recompute_interval_ticks` calls. The first call always computes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VernierAllocator {
    ticks: u64,
    cached: LocalDynamicsContribution,
}

impl VernierAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contribution for this tick; stale between recomputations.
    pub fn contribution(
        &mut self,
        body: &RigidBodyState,
        mass: &MassProperties,
        thrusters: &ThrusterArray,
        config: &VernierConfig,
        goal_direction: DVec3,
    ) -> LocalDynamicsContribution {
        let interval = u64::from(config.recompute_interval_ticks.max(1));
        if self.ticks % interval == 0 {
            self.cached = allocate(body, mass, thrusters, config, goal_direction);
            log::trace!(
                "vernier recompute at tick {}: force {:?} torque {:?}",
                self.ticks,
                self.cached.force,
                self.cached.torque
            );
        }
        self.ticks += 1;
        self.cached
    }

    /// Most recent allocation.
    pub fn cached(&self) -> LocalDynamicsContribution {
        self.cached
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use vernier_core::types::ThrusterSpec;

    use super::*;

    fn single_thruster(position: DVec3, direction: DVec3) -> ThrusterArray {
        ThrusterArray::new(vec![ThrusterSpec::new(position, direction, 1.0)]).unwrap()
    }

    #[test]
    fn test_power_always_in_unit_interval() {
        let config = VernierConfig::default();
        let scores = [-1.0, -0.75, -0.3, 0.0, 0.2, 0.5, 0.9, 1.0];
        for seeking in scores {
            for alignment in scores {
                let power = thruster_power(seeking, alignment, &config);
                assert!(
                    (0.0..=1.0).contains(&power),
                    "power {power} out of range for seeking {seeking}, alignment {alignment}"
                );
            }
        }
        assert_eq!(thruster_power(f64::NAN, 0.0, &config), 0.0);
    }

    #[test]
    fn test_anti_parallel_thruster_gets_no_power() {
        // A thruster at the centre of mass produces no torque, so only the
        // seeking score matters: -1 * 0.3 + 0.3 clamps to zero.
        let body = RigidBodyState::default();
        let thrusters = single_thruster(DVec3::ZERO, -DVec3::Z);
        let out = allocate(
            &body,
            &MassProperties::default(),
            &thrusters,
            &VernierConfig::default(),
            DVec3::Z,
        );
        assert_abs_diff_eq!(out.force.length(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out.torque.length(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parallel_thruster_fires_at_full_weight() {
        let body = RigidBodyState::default();
        let thrusters = single_thruster(DVec3::ZERO, DVec3::Z);
        let out = allocate(
            &body,
            &MassProperties::default(),
            &thrusters,
            &VernierConfig::default(),
            DVec3::Z,
        );
        // seeking 1 * 0.3 + 0.3 = 0.6 power on a unit-weight thruster.
        assert_abs_diff_eq!(out.force.z, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_output_is_body_frame() {
        // Same airframe rotated a quarter turn: body-frame output must match.
        let thrusters = single_thruster(DVec3::ZERO, DVec3::Z);
        let config = VernierConfig::default();
        let mass = MassProperties::default();

        let upright = allocate(&RigidBodyState::default(), &mass, &thrusters, &config, DVec3::Z);
        let turn = DQuat::from_rotation_y(std::f64::consts::FRAC_PI_2);
        let turned_body = RigidBodyState::at_rest(DVec3::new(5.0, 0.0, 0.0), turn);
        let turned = allocate(&turned_body, &mass, &thrusters, &config, turn * DVec3::Z);

        assert_abs_diff_eq!(upright.force.z, turned.force.z, epsilon = 1e-9);
        assert_abs_diff_eq!(turned.force.x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_torque_turns_nose_toward_goal() {
        // Two tail thrusters pushing sideways; the goal is off to +X. The
        // thruster whose torque yaws the nose toward +X should dominate.
        let thrusters = ThrusterArray::new(vec![
            ThrusterSpec::new(DVec3::new(0.0, 0.0, -0.5), -DVec3::X, 1.0),
            ThrusterSpec::new(DVec3::new(0.0, 0.0, -0.5), DVec3::X, 1.0),
        ])
        .unwrap();
        let config = VernierConfig::default();
        let goal = DVec3::new(1.0, 0.0, 1.0).normalize();
        let out = allocate(
            &RigidBodyState::default(),
            &MassProperties::default(),
            &thrusters,
            &config,
            goal,
        );
        // Pushing the tail toward -X swings the nose toward +X (yaw about +Y).
        assert!(out.torque.y > 0.0, "expected positive yaw torque: {:?}", out.torque);
    }

    #[test]
    fn test_rotational_alignment_score_range_and_sign() {
        let initial = DQuat::IDENTITY;
        let toward = DQuat::from_rotation_y(0.1);
        let away = DQuat::from_rotation_y(-0.1);
        let goal = DVec3::X;
        assert!(rotational_alignment_score(initial, toward, goal) > 0.9);
        assert!(rotational_alignment_score(initial, away, goal) < -0.9);
        // No rotation: degenerate direction scores zero instead of NaN.
        assert_eq!(rotational_alignment_score(initial, initial, goal), 0.0);
    }

    #[test]
    fn test_allocator_holds_result_between_recomputes() {
        let thrusters = ThrusterArray::default();
        let mass = MassProperties::default();
        let mut config = VernierConfig::default();
        config.recompute_interval_ticks = 4;
        let body = RigidBodyState::default();
        let mut allocator = VernierAllocator::new();

        let first = allocator.contribution(&body, &mass, &thrusters, &config, DVec3::Z);
        // The goal changes but the cached output must not until tick 4.
        for _ in 1..4 {
            let held = allocator.contribution(&body, &mass, &thrusters, &config, DVec3::X);
            assert_eq!(held, first);
        }
        assert_eq!(allocator.cached(), first);
        let refreshed = allocator.contribution(&body, &mass, &thrusters, &config, DVec3::X);
        assert_eq!(refreshed, allocate(&body, &mass, &thrusters, &config, DVec3::X));
        assert_ne!(refreshed, first);
        assert_eq!(allocator.cached(), refreshed);
    }

    #[test]
    fn test_lever_arm_measured_from_center_of_mass() {
        // A sideways thruster mounted exactly at an offset centre of mass
        // pushes without turning; measured from the origin it turns.
        let mount = DVec3::new(0.3, 0.0, 0.0);
        let thrusters = single_thruster(mount, DVec3::Y);
        let config = VernierConfig::default();
        let body = RigidBodyState::default();

        let offset = MassProperties::new(1.0, DVec3::ONE)
            .unwrap()
            .with_center_of_mass(mount);
        assert_eq!(offset.center_of_mass(), mount);
        assert_eq!(offset.moment_of_inertia(), DVec3::ONE);
        let at_mount = allocate(&body, &offset, &thrusters, &config, DVec3::Y);
        assert_abs_diff_eq!(at_mount.torque.length(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(at_mount.force.y, 0.6, epsilon = 1e-12);

        let centered = MassProperties::new(1.0, DVec3::ONE).unwrap();
        let at_origin = allocate(&body, &centered, &thrusters, &config, DVec3::Y);
        // r = +X, F = +Y: torque about +Z.
        assert!(at_origin.torque.z > 0.1, "torque {:?}", at_origin.torque);
        assert_abs_diff_eq!(at_origin.torque.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(at_origin.torque.y, 0.0, epsilon = 1e-12);

        // A moving, rotated body gives the same body-frame answer.
        let turn = DQuat::from_rotation_y(0.7);
        let moved = RigidBodyState::at_rest(DVec3::new(4.0, -2.0, 9.0), turn);
        let moved_out = allocate(&moved, &offset, &thrusters, &config, turn * DVec3::Y);
        assert_abs_diff_eq!(moved_out.torque.length(), 0.0, epsilon = 1e-9);
    }
}
