//! Events emitted by guidance instances and the simulation engine.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::components::{MissileId, TargetId};

/// Observable side effects of one guidance step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GuidanceEvent {
    /// Dead reckoning engaged; the goal direction is now committed.
    DeadReckoningEngaged {
        locked_direction: DVec3,
        locked_point: DVec3,
        distance_to_target: f64,
        elapsed_secs: f64,
    },
}

/// Engine-level events, drained into every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A target entity was created.
    TargetSpawned { target_id: TargetId, tick: u64 },
    /// A missile was launched.
    MissileLaunched {
        missile_id: MissileId,
        target_id: TargetId,
        tick: u64,
    },
    /// A missile committed to its dead-reckoning direction.
    DeadReckoningEngaged {
        missile_id: MissileId,
        locked_direction: DVec3,
        distance_to_target: f64,
        tick: u64,
    },
    /// A missile reached its maximum flight time and was removed.
    MissileExpired { missile_id: MissileId, tick: u64 },
    /// A missile was removed by command.
    MissileDestroyed { missile_id: MissileId, tick: u64 },
    /// A target was removed by command.
    TargetRemoved { target_id: TargetId, tick: u64 },
    /// A command could not be applied.
    CommandRejected { reason: String, tick: u64 },
}
