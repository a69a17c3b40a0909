//! Commands sent to the simulation by an external orchestrator.
//!
//! Commands are queued and processed at the next tick boundary.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::components::{MissileId, TargetId};
use crate::config::GuidanceConfig;
use crate::types::{Airframe, RigidBodyState};

/// All possible orchestrator actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimCommand {
    // --- Targets ---
    /// Create a target. Ids are assigned in spawn order starting at 0.
    SpawnTarget { position: DVec3, velocity: DVec3 },
    /// Teleport a target.
    SetTargetPosition { target_id: TargetId, position: DVec3 },
    /// Change a target's constant velocity.
    SetTargetVelocity { target_id: TargetId, velocity: DVec3 },
    /// Remove a target. Missiles chasing it keep its last position.
    RemoveTarget { target_id: TargetId },

    // --- Missiles ---
    /// Launch a missile. Ids are assigned in launch order starting at 0.
    LaunchMissile(MissileLaunch),
    /// Force dead reckoning on a missile that has not locked yet.
    StartDeadReckoning { missile_id: MissileId },
    /// Remove a missile.
    DestroyMissile { missile_id: MissileId },

    // --- Simulation control ---
    Pause,
    Resume,
}

/// Everything needed to put a missile in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissileLaunch {
    pub target_id: TargetId,
    pub state: RigidBodyState,
    /// Airframe override; the engine default is used when absent.
    #[serde(default)]
    pub airframe: Option<Airframe>,
    /// Guidance override; the engine default is used when absent.
    #[serde(default)]
    pub guidance: Option<GuidanceConfig>,
    /// Force dead reckoning after this many seconds of flight.
    #[serde(default)]
    pub dead_reckoning_after_secs: Option<f64>,
    /// Remove the missile after this many seconds of flight.
    #[serde(default)]
    pub lifetime_secs: Option<f64>,
    /// Apply launch-time variability to the thruster layout and activation
    /// range.
    #[serde(default = "default_randomize")]
    pub randomize: bool,
}

fn default_randomize() -> bool {
    true
}

impl MissileLaunch {
    /// Launch from `position` with `velocity`, nose along the velocity.
    pub fn new(target_id: TargetId, position: DVec3, velocity: DVec3) -> Self {
        let state = RigidBodyState::looking_along(position, velocity, DVec3::Y)
            .with_linear_velocity(velocity);
        Self {
            target_id,
            state,
            airframe: None,
            guidance: None,
            dead_reckoning_after_secs: None,
            lifetime_secs: None,
            randomize: true,
        }
    }

    pub fn with_guidance(mut self, guidance: GuidanceConfig) -> Self {
        self.guidance = Some(guidance);
        self
    }

    pub fn with_airframe(mut self, airframe: Airframe) -> Self {
        self.airframe = Some(airframe);
        self
    }

    pub fn with_dead_reckoning_after(mut self, secs: f64) -> Self {
        self.dead_reckoning_after_secs = Some(secs);
        self
    }

    pub fn with_lifetime(mut self, secs: f64) -> Self {
        self.lifetime_secs = Some(secs);
        self
    }

    pub fn without_randomization(mut self) -> Self {
        self.randomize = false;
        self
    }
}
