//! Missile guidance system: steps every missile one tick toward its target.

use hecs::World;

use vernier_core::components::{LastKnownTarget, MissileId, TargetLink};
use vernier_core::events::{GuidanceEvent, SimEvent};
use vernier_guidance::missile::Missile;

/// Runs one guidance tick for all missiles.
///
/// A missile whose target was removed keeps homing on the target's last
/// known position.
pub fn run(world: &mut World, dt: f64, events: &mut Vec<SimEvent>, current_tick: u64) {
    let targets = super::target_motion::positions(world);

    let mut missiles: Vec<_> = world
        .query_mut::<(&MissileId, &mut Missile, &TargetLink, Option<&LastKnownTarget>)>()
        .into_iter()
        .map(|(_, components)| components)
        .collect();
    // Event order follows missile id, independent of archetype layout.
    missiles.sort_by_key(|(id, ..)| **id);

    for (id, missile, link, last_known) in missiles {
        let target = targets
            .get(&link.target)
            .copied()
            .or(last_known.map(|l| l.position))
            .unwrap_or_else(|| missile.state().position + missile.state().forward());

        let outcome = missile.step(&target, dt);
        for event in outcome.events {
            match event {
                GuidanceEvent::DeadReckoningEngaged {
                    locked_direction,
                    distance_to_target,
                    ..
                } => {
                    log::debug!(
                        "missile {} locked at {:.3} m, tick {current_tick}",
                        id.0,
                        distance_to_target
                    );
                    events.push(SimEvent::DeadReckoningEngaged {
                        missile_id: *id,
                        locked_direction,
                        distance_to_target,
                        tick: current_tick,
                    });
                }
            }
        }
    }
}
