//! Target kinematics: position += velocity * dt.

use std::collections::HashMap;

use glam::DVec3;
use hecs::World;

use vernier_core::components::{TargetId, TargetMotion};

/// Integrates every target's constant velocity.
pub fn run(world: &mut World, dt: f64) {
    for (_entity, motion) in world.query_mut::<&mut TargetMotion>() {
        motion.position += motion.velocity * dt;
    }
}

/// Current position of every target, keyed by id.
pub fn positions(world: &World) -> HashMap<TargetId, DVec3> {
    world
        .query::<(&TargetId, &TargetMotion)>()
        .iter()
        .map(|(_, (id, motion))| (*id, motion.position))
        .collect()
}
