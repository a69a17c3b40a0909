//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Guidance logic lives in `vernier-guidance`; the engine's systems drive it.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Stable public id of a missile entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MissileId(pub u64);

/// Stable public id of a target entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u64);

/// Marker for target entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target;

/// Point-mass motion of a target. Targets are moved only by commands and by
/// constant-velocity integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetMotion {
    pub position: DVec3,
    pub velocity: DVec3,
}

/// Which target a missile pursues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetLink {
    pub target: TargetId,
}

/// Last known target position for a missile whose target has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LastKnownTarget {
    pub position: DVec3,
}

/// Launch time and optional maximum flight time of a missile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lifetime {
    pub launched_at_secs: f64,
    pub max_secs: Option<f64>,
}

/// Forces dead reckoning once the missile has flown `after_secs`.
/// Removed once it fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledDeadReckoning {
    pub after_secs: f64,
}
