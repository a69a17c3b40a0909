//! Simulation constants and tuning parameters.

use glam::DVec3;

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 50;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Body-frame forward axis.
pub const BODY_FORWARD: DVec3 = DVec3::Z;

/// Lengths at or below this are treated as zero when a direction is needed.
pub const DIRECTION_EPSILON: f64 = 1e-9;

// --- Vernier allocation ---

/// Projection step used when predicting the orientation change of a single
/// thruster's torque. Any small positive value works.
pub const VERNIER_PREDICTION_STEP: f64 = 0.4;

/// Default number of ticks between vernier recomputations.
pub const VERNIER_RECOMPUTE_INTERVAL: u32 = 64;

// --- Orientation perturbation ---

/// Perturbation magnitude is `exp(dt) / PERTURBATION_DIVISOR` per component
/// (about 0.01 at 50 Hz).
pub const PERTURBATION_DIVISOR: f64 = 100.0;

// --- Dead reckoning ---

/// Alignment (cosine) between heading and target direction required to arm
/// dead reckoning when alignment gating is on.
pub const DEAD_RECKONING_MIN_ALIGNMENT: f64 = 0.8;

/// Hysteresis thresholds for the alignment-event counter.
pub const HYSTERESIS_HIGH_ALIGNMENT: f64 = 0.8;
pub const HYSTERESIS_LOW_ALIGNMENT: f64 = 0.7;

/// Starting blend weight toward the committed direction; rises to 1 as
/// alignment events accumulate.
pub const HYSTERESIS_BASE_COMMITMENT: f64 = 0.8;

/// Alignment events needed to fully commit to the locked direction over the
/// locked point.
pub const HYSTERESIS_DIRECTION_EVENTS: f64 = 3.0;

/// Alignment events needed to fully ignore the live target direction.
pub const HYSTERESIS_TARGET_EVENTS: f64 = 2.0;

// --- Default airframe ---

/// Default mass (kg).
pub const DEFAULT_MASS: f64 = 1.0;

/// Default diagonal moment of inertia. The roll axis is nearly free.
pub const DEFAULT_MOMENT_OF_INERTIA: DVec3 = DVec3::new(1.0, 1.0, 0.001);

/// Number of vernier thrusters on the default airframe.
pub const DEFAULT_THRUSTER_COUNT: usize = 4;

/// Radial distance of default thrusters from the body axis (m).
pub const DEFAULT_THRUSTER_RADIUS: f64 = 0.1;

/// Distance of the default thruster ring behind the centre of mass (m).
pub const DEFAULT_THRUSTER_TAIL_OFFSET: f64 = 0.5;

/// Forward cant of default thruster nozzles (added forward component).
pub const DEFAULT_THRUSTER_FORWARD_CANT: f64 = 0.5;

/// Systematic sensor roll error on default thrusters (radians).
pub const DEFAULT_SENSOR_ROLL_BIAS: f64 = 0.15;

// --- Spawn variability ---

/// Largest random roll applied to a thruster at launch (radians).
pub const THRUSTER_ROLL_JITTER_MAX: f64 = 0.11;
