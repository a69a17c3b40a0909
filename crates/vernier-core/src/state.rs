//! Simulation snapshot: the complete observable state after each tick.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::components::{MissileId, TargetId};
use crate::enums::DeadReckoningPhase;
use crate::events::SimEvent;
use crate::types::SimTime;

/// Everything an observer (renderer, logger, test) can see.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub paused: bool,
    pub missiles: Vec<MissileView>,
    pub targets: Vec<TargetView>,
    pub events: Vec<SimEvent>,
}

/// One missile in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissileView {
    pub missile_id: MissileId,
    pub target_id: TargetId,
    pub position: DVec3,
    pub orientation: DQuat,
    pub linear_velocity: DVec3,
    pub angular_velocity: DVec3,
    pub phase: DeadReckoningPhase,
    /// Goal direction used on the last tick.
    pub goal_direction: DVec3,
    /// Distance to the pursued point (m).
    pub distance_to_target: f64,
    /// Flight time (s).
    pub elapsed_secs: f64,
}

/// One target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetView {
    pub target_id: TargetId,
    pub position: DVec3,
    pub velocity: DVec3,
}
