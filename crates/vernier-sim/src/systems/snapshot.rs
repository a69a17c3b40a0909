//! Snapshot system: queries the ECS world and builds a complete SimSnapshot.
//!
//! Read-only: never modifies the world.

use hecs::World;

use vernier_core::components::*;
use vernier_core::events::SimEvent;
use vernier_core::state::*;
use vernier_core::types::SimTime;
use vernier_guidance::missile::Missile;

/// Build a complete SimSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    paused: bool,
    events: Vec<SimEvent>,
) -> SimSnapshot {
    SimSnapshot {
        time: *time,
        paused,
        missiles: build_missiles(world),
        targets: build_targets(world),
        events,
    }
}

/// Build MissileView list, ordered by id.
fn build_missiles(world: &World) -> Vec<MissileView> {
    let mut missiles: Vec<MissileView> = world
        .query::<(&MissileId, &Missile, &TargetLink)>()
        .iter()
        .map(|(_, (id, missile, link))| {
            let state = missile.state();
            MissileView {
                missile_id: *id,
                target_id: link.target,
                position: state.position,
                orientation: state.orientation,
                linear_velocity: state.linear_velocity,
                angular_velocity: state.angular_velocity,
                phase: missile.dead_reckoning().phase,
                goal_direction: missile.goal_direction(),
                distance_to_target: missile.distance_to_target(),
                elapsed_secs: missile.elapsed_secs(),
            }
        })
        .collect();

    missiles.sort_by_key(|m| m.missile_id);
    missiles
}

/// Build TargetView list, ordered by id.
fn build_targets(world: &World) -> Vec<TargetView> {
    let mut targets: Vec<TargetView> = world
        .query::<(&Target, &TargetId, &TargetMotion)>()
        .iter()
        .map(|(_, (_, id, motion))| TargetView {
            target_id: *id,
            position: motion.position,
            velocity: motion.velocity,
        })
        .collect();

    targets.sort_by_key(|t| t.target_id);
    targets
}
