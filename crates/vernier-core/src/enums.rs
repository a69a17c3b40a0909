//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEAD_RECKONING_MIN_ALIGNMENT, HYSTERESIS_HIGH_ALIGNMENT, HYSTERESIS_LOW_ALIGNMENT,
};

/// Dead-reckoning phase. `Locked` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeadReckoningPhase {
    /// Goal direction follows the live target every tick.
    #[default]
    Seeking,
    /// Goal direction is committed.
    Locked,
}

/// What must hold for dead reckoning to engage automatically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActivationGate {
    /// Engage as soon as the target is inside the activation range.
    DistanceOnly,
    /// Engage inside the activation range only while the direction of
    /// travel points at the target with at least `min_alignment` (cosine).
    DistanceAndAlignment { min_alignment: f64 },
}

impl Default for ActivationGate {
    fn default() -> Self {
        ActivationGate::DistanceAndAlignment {
            min_alignment: DEAD_RECKONING_MIN_ALIGNMENT,
        }
    }
}

/// How the goal direction behaves once locked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LockPolicy {
    /// Goal direction is frozen at the direction captured on lock.
    #[default]
    Frozen,
    /// Goal blends the live target, the locked point and the locked
    /// direction, committing further with each debounced alignment event.
    Hysteresis { high: f64, low: f64 },
}

impl LockPolicy {
    /// Hysteresis policy with the stock thresholds.
    pub fn hysteresis() -> Self {
        LockPolicy::Hysteresis {
            high: HYSTERESIS_HIGH_ALIGNMENT,
            low: HYSTERESIS_LOW_ALIGNMENT,
        }
    }
}

/// Seeding policy for a per-missile random generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SeedPolicy {
    /// Reproducible stream from a fixed seed.
    Fixed { seed: u64 },
    /// Fresh OS entropy on every construction.
    Entropy,
}

impl Default for SeedPolicy {
    fn default() -> Self {
        SeedPolicy::Fixed { seed: 0 }
    }
}
