//! Scheduled dead reckoning: forces the lock once a missile has flown its
//! configured delay.

use hecs::{Entity, World};

use vernier_core::components::{LastKnownTarget, MissileId, ScheduledDeadReckoning, TargetLink};
use vernier_core::events::{GuidanceEvent, SimEvent};
use vernier_guidance::missile::Missile;

/// Engages dead reckoning on due missiles and removes their schedule.
/// Missiles that already locked just drop the schedule.
pub fn run(world: &mut World, events: &mut Vec<SimEvent>, current_tick: u64) {
    let targets = super::target_motion::positions(world);
    let mut fired: Vec<Entity> = Vec::new();

    for (entity, (id, missile, schedule, link, last_known)) in world.query_mut::<(
        &MissileId,
        &mut Missile,
        &ScheduledDeadReckoning,
        &TargetLink,
        Option<&LastKnownTarget>,
    )>() {
        if missile.elapsed_secs() < schedule.after_secs {
            continue;
        }
        fired.push(entity);

        let Some(target) = targets
            .get(&link.target)
            .copied()
            .or(last_known.map(|l| l.position))
        else {
            continue;
        };
        if let Some(GuidanceEvent::DeadReckoningEngaged {
            locked_direction,
            distance_to_target,
            ..
        }) = missile.start_dead_reckoning_if_not_started(target)
        {
            log::debug!("missile {} scheduled dead reckoning at tick {current_tick}", id.0);
            events.push(SimEvent::DeadReckoningEngaged {
                missile_id: *id,
                locked_direction,
                distance_to_target,
                tick: current_tick,
            });
        }
    }

    for entity in fired {
        let _ = world.remove_one::<ScheduledDeadReckoning>(entity);
    }
}
