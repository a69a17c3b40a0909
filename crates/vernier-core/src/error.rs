//! Error types for airframe and guidance configuration.

use thiserror::Error;

/// Invalid airframe or guidance configuration. Raised at construction,
/// never during a tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The thruster list is empty.
    #[error("no thrusters configured")]
    NoThrusters,

    /// Thruster strengths sum to zero.
    #[error("total thruster strength is zero")]
    ZeroThrusterStrength,

    /// A thruster has a negative or non-finite strength.
    #[error("thruster {index} has invalid strength {strength}")]
    InvalidThrusterStrength {
        /// Position of the thruster in the ordered list.
        index: usize,
        /// Offending strength.
        strength: f64,
    },

    /// Mass must be strictly positive.
    #[error("mass must be positive, got {0}")]
    NonPositiveMass(f64),

    /// Every moment-of-inertia component must be strictly positive.
    #[error("moment of inertia {axis} component must be positive, got {value}")]
    NonPositiveInertia {
        /// Axis name (`x`, `y` or `z`).
        axis: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A blend gain lies outside [0, 1].
    #[error("gain {name} must lie in [0, 1], got {value}")]
    InvalidGain {
        /// Configuration field name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Angular velocity dampening must lie in (0, 1].
    #[error("angular velocity dampening must lie in (0, 1], got {0}")]
    InvalidDampening(f64),

    /// A tick interval must be at least one.
    #[error("vernier recompute interval must be at least one tick")]
    ZeroRecomputeInterval,

    /// A cap, magnitude or time constant must be strictly positive.
    #[error("{name} must be positive, got {value}")]
    NonPositive {
        /// Configuration field name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A field holds NaN or infinity.
    #[error("{name} must be finite")]
    NonFinite {
        /// Configuration field name.
        name: &'static str,
    },
}

/// Errors surfaced by a guidance instance.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GuidanceError {
    /// Construction-time configuration problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Dead reckoning was started on an instance that is already locked.
    /// This is a caller ordering bug, not a runtime condition.
    #[error("dead reckoning already engaged")]
    DeadReckoningAlreadyEngaged,

    /// Dead reckoning was requested while the feature is disabled.
    #[error("dead reckoning is disabled for this missile")]
    DeadReckoningDisabled,
}
