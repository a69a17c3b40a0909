//! Entity spawn factories for targets and missiles.

use glam::{DQuat, DVec3};
use hecs::{Entity, EntityBuilder, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use vernier_core::commands::MissileLaunch;
use vernier_core::components::*;
use vernier_core::config::{DeadReckoningConfig, GuidanceConfig};
use vernier_core::constants::{BODY_FORWARD, THRUSTER_ROLL_JITTER_MAX};
use vernier_core::error::ConfigError;
use vernier_core::types::{Airframe, ThrusterArray, ThrusterSpec};
use vernier_guidance::missile::Missile;
use vernier_guidance::rng::instance_rng;

use crate::error::SimError;

/// Spawn a target moving at constant velocity.
pub fn spawn_target(world: &mut World, id: TargetId, position: DVec3, velocity: DVec3) -> Entity {
    world.spawn((Target, id, TargetMotion { position, velocity }))
}

/// Find a target entity by id.
pub fn find_target(world: &World, id: TargetId) -> Option<(Entity, TargetMotion)> {
    world
        .query::<(&TargetId, &TargetMotion)>()
        .iter()
        .find(|(_, (target_id, _))| **target_id == id)
        .map(|(entity, (_, motion))| (entity, *motion))
}

/// Find a missile entity by id.
pub fn find_missile(world: &World, id: MissileId) -> Option<Entity> {
    world
        .query::<&MissileId>()
        .iter()
        .find(|(_, missile_id)| **missile_id == id)
        .map(|(entity, _)| entity)
}

/// Defaults applied to launches that do not carry their own airframe or
/// guidance configuration.
pub struct LaunchDefaults<'a> {
    pub airframe: &'a Airframe,
    pub guidance: &'a GuidanceConfig,
    pub master_seed: u64,
    pub now_secs: f64,
}

/// Spawn a missile pursuing an existing target.
///
/// Spawn variability draws come from `rng` (the engine's master stream);
/// the missile's own per-tick stream is derived from the master seed and
/// its id.
pub fn spawn_missile(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    id: MissileId,
    launch: &MissileLaunch,
    defaults: &LaunchDefaults<'_>,
) -> Result<Entity, SimError> {
    if find_target(world, launch.target_id).is_none() {
        return Err(SimError::UnknownTarget(launch.target_id));
    }

    let mut airframe = launch.airframe.clone().unwrap_or_else(|| defaults.airframe.clone());
    let mut guidance = launch.guidance.clone().unwrap_or_else(|| defaults.guidance.clone());
    if launch.randomize {
        randomize_activation_range(&mut guidance.dead_reckoning, rng);
        airframe.thrusters = randomize_thrusters(&airframe.thrusters, rng)?;
    }

    let missile = Missile::from_airframe(
        launch.state,
        airframe,
        guidance,
        instance_rng(defaults.master_seed, id.0),
    )?;

    let mut builder = EntityBuilder::new();
    builder
        .add(id)
        .add(missile)
        .add(TargetLink {
            target: launch.target_id,
        })
        .add(Lifetime {
            launched_at_secs: defaults.now_secs,
            max_secs: launch.lifetime_secs,
        });
    if let Some(after_secs) = launch.dead_reckoning_after_secs {
        builder.add(ScheduledDeadReckoning { after_secs });
    }
    Ok(world.spawn(builder.build()))
}

/// Widens the activation range by up to `activation_range_spread`.
pub fn randomize_activation_range(config: &mut DeadReckoningConfig, rng: &mut ChaCha8Rng) {
    config.activation_range += config.activation_range_spread * rng.gen::<f64>();
}

/// Per-thruster layout variation. Each thruster, independently with
/// probability one half per step, swaps its commanded and sensed
/// directions, is mirrored through the forward axis, and is rolled about
/// the forward axis by an angle in `[0, THRUSTER_ROLL_JITTER_MAX)`.
pub fn randomize_thrusters(
    thrusters: &ThrusterArray,
    rng: &mut ChaCha8Rng,
) -> Result<ThrusterArray, ConfigError> {
    let half_turn = DQuat::from_axis_angle(BODY_FORWARD, std::f64::consts::PI);
    let specs = thrusters
        .iter()
        .map(|thruster| {
            let mut spec: ThrusterSpec = *thruster;
            if rng.gen_bool(0.5) {
                std::mem::swap(&mut spec.thrust_direction, &mut spec.sensed_direction);
            }
            if rng.gen_bool(0.5) {
                spec.local_position = DVec3::new(
                    -spec.local_position.x,
                    -spec.local_position.y,
                    spec.local_position.z,
                );
                spec.thrust_direction = half_turn * spec.thrust_direction;
                spec.sensed_direction = half_turn * spec.sensed_direction;
            }
            if rng.gen_bool(0.5) {
                let roll = DQuat::from_axis_angle(
                    BODY_FORWARD,
                    rng.gen_range(0.0..THRUSTER_ROLL_JITTER_MAX),
                );
                spec.thrust_direction = roll * spec.thrust_direction;
                spec.sensed_direction = roll * spec.sensed_direction;
            }
            spec
        })
        .collect();
    ThrusterArray::new(specs)
}
