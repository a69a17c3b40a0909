//! Cleanup system: removes missiles that exceeded their flight time.

use hecs::{Entity, World};

use vernier_core::components::{Lifetime, MissileId};
use vernier_core::events::SimEvent;
use vernier_guidance::missile::Missile;

/// Despawns expired missiles and reports them.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(
    world: &mut World,
    despawn_buffer: &mut Vec<Entity>,
    events: &mut Vec<SimEvent>,
    current_tick: u64,
) {
    despawn_buffer.clear();

    let mut expired: Vec<MissileId> = Vec::new();
    for (entity, (id, missile, lifetime)) in world.query_mut::<(&MissileId, &Missile, &Lifetime)>() {
        if let Some(max_secs) = lifetime.max_secs {
            if missile.elapsed_secs() >= max_secs {
                despawn_buffer.push(entity);
                expired.push(*id);
            }
        }
    }

    expired.sort();
    for missile_id in expired {
        log::debug!("missile {} expired at tick {current_tick}", missile_id.0);
        events.push(SimEvent::MissileExpired {
            missile_id,
            tick: current_tick,
        });
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
