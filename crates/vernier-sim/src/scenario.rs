//! Scenario definitions: targets, launch timing and tuning for one run.
//!
//! Scenarios are JSON documents; a few built-ins cover the common
//! engagement geometries.

use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use vernier_core::commands::{MissileLaunch, SimCommand};
use vernier_core::components::TargetId;
use vernier_core::config::GuidanceConfig;
use vernier_core::constants::TICK_RATE;
use vernier_core::enums::{ActivationGate, LockPolicy};
use vernier_core::types::Airframe;

use crate::engine::{SimConfig, SimulationEngine};
use crate::error::SimError;
use crate::systems::launch_schedule::LaunchSchedule;

/// A target present from the first tick. Ids follow list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioTarget {
    pub position: DVec3,
    #[serde(default)]
    pub velocity: DVec3,
}

/// A launch at a given flight-clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioLaunch {
    #[serde(default)]
    pub at_secs: f64,
    pub launch: MissileLaunch,
}

/// A complete run description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    pub seed: u64,
    pub tick_rate: u32,
    pub guidance: GuidanceConfig,
    pub airframe: Airframe,
    pub targets: Vec<ScenarioTarget>,
    pub launches: Vec<ScenarioLaunch>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: String::from("unnamed"),
            seed: SimConfig::default().seed,
            tick_rate: TICK_RATE,
            guidance: GuidanceConfig::default(),
            airframe: Airframe::default(),
            targets: Vec::new(),
            launches: Vec::new(),
        }
    }
}

/// Names accepted by [`Scenario::builtin`].
pub const BUILTIN_SCENARIOS: [&str; 3] = ["head-on", "crossing", "salvo"];

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Look up a built-in scenario by name.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "head-on" => Some(head_on()),
            "crossing" => Some(crossing()),
            "salvo" => Some(salvo()),
            _ => None,
        }
    }

    /// Builds an engine with this scenario's targets queued and its
    /// launches scheduled. `seed` overrides the scenario seed.
    pub fn into_engine(self, seed: Option<u64>) -> Result<SimulationEngine, SimError> {
        let tick_rate = self.tick_rate;
        let mut engine = SimulationEngine::new(SimConfig {
            seed: seed.unwrap_or(self.seed),
            tick_rate,
            guidance: self.guidance,
            airframe: self.airframe,
        })?;

        engine.queue_commands(self.targets.into_iter().map(|t| SimCommand::SpawnTarget {
            position: t.position,
            velocity: t.velocity,
        }));

        let mut schedule = LaunchSchedule::default();
        for entry in self.launches {
            schedule.push(secs_to_ticks(entry.at_secs, tick_rate), entry.launch);
        }
        engine.set_launch_schedule(schedule);
        Ok(engine)
    }
}

/// Single missile, stationary target 10 m dead ahead.
fn head_on() -> Scenario {
    Scenario {
        name: String::from("head-on"),
        targets: vec![ScenarioTarget {
            position: DVec3::new(0.0, 0.0, 10.0),
            velocity: DVec3::ZERO,
        }],
        launches: vec![ScenarioLaunch {
            at_secs: 0.0,
            launch: MissileLaunch::new(TargetId(0), DVec3::ZERO, DVec3::Z * 0.5)
                .with_lifetime(30.0),
        }],
        ..Scenario::default()
    }
}

/// Target crossing left to right; hysteresis lock without the alignment
/// gate.
fn crossing() -> Scenario {
    let mut guidance = GuidanceConfig::default();
    guidance.dead_reckoning.gate = ActivationGate::DistanceOnly;
    guidance.dead_reckoning.lock = LockPolicy::hysteresis();

    Scenario {
        name: String::from("crossing"),
        guidance,
        targets: vec![ScenarioTarget {
            position: DVec3::new(-15.0, 0.0, 20.0),
            velocity: DVec3::new(1.5, 0.0, 0.0),
        }],
        launches: vec![ScenarioLaunch {
            at_secs: 0.0,
            launch: MissileLaunch::new(TargetId(0), DVec3::ZERO, DVec3::Z).with_lifetime(40.0),
        }],
        ..Scenario::default()
    }
}

/// Four staggered missiles on two targets; one forces dead reckoning
/// after a fixed delay.
fn salvo() -> Scenario {
    let launch = |target: u64, x: f64| {
        MissileLaunch::new(TargetId(target), DVec3::new(x, 0.0, 0.0), DVec3::Z)
    };
    Scenario {
        name: String::from("salvo"),
        targets: vec![
            ScenarioTarget {
                position: DVec3::new(-5.0, 2.0, 25.0),
                velocity: DVec3::new(0.5, 0.0, -0.5),
            },
            ScenarioTarget {
                position: DVec3::new(5.0, -1.0, 30.0),
                velocity: DVec3::new(-0.3, 0.2, 0.0),
            },
        ],
        launches: vec![
            ScenarioLaunch {
                at_secs: 0.0,
                launch: launch(0, -1.0).with_lifetime(30.0),
            },
            ScenarioLaunch {
                at_secs: 0.5,
                launch: launch(1, 1.0).with_lifetime(30.0),
            },
            ScenarioLaunch {
                at_secs: 1.0,
                launch: launch(0, -2.0).with_dead_reckoning_after(3.0).with_lifetime(30.0),
            },
            ScenarioLaunch {
                at_secs: 1.5,
                launch: launch(1, 2.0).with_lifetime(30.0),
            },
        ],
        ..Scenario::default()
    }
}

/// Convert seconds to ticks.
fn secs_to_ticks(secs: f64, tick_rate: u32) -> u64 {
    (secs.max(0.0) * f64::from(tick_rate)).round() as u64
}
