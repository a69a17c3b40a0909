//! Thruster-vectored guidance for the vernier missile simulation.
//!
//! Allocates vernier thruster power, blends it with the main motor,
//! shapes the result with a time-varying gain schedule, integrates the
//! rigid body, and runs the dead-reckoning state machine. No ECS
//! dependency; the engine drives [`missile::Missile`] instances.

pub mod blender;
pub mod dead_reckoning;
pub mod integrator;
pub mod missile;
pub mod propulsion;
pub mod rng;
pub mod target;
pub mod thrusters;

pub use vernier_core as core;
