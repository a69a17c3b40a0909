//! Headless simulation engine for vernier-guided missiles.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces SimSnapshots for observers.

pub mod engine;
pub mod error;
pub mod scenario;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use error::SimError;
pub use scenario::Scenario;
pub use vernier_core as core;

#[cfg(test)]
mod tests;
