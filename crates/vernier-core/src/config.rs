//! Guidance tuning parameters.
//!
//! Everything here is read-only during a run. Defaults carry the stock
//! tuning; any field may be omitted from serialized configs.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::VERNIER_RECOMPUTE_INTERVAL;
use crate::enums::{ActivationGate, LockPolicy};
use crate::error::ConfigError;

/// Complete guidance configuration for one missile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    pub vernier: VernierConfig,
    pub main_propulsion: MainPropulsionConfig,
    pub dynamics: DynamicsConfig,
    pub gain_schedule: GainScheduleConfig,
    pub terminal_velocity: TerminalVelocityConfig,
    pub dead_reckoning: DeadReckoningConfig,
}

/// Vernier power blend and output scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VernierConfig {
    /// Weight of a thruster's sensed direction agreeing with the goal.
    pub seeking_power: f64,
    /// Weight of a thruster's predicted rotation turning toward the goal.
    pub alignment_power: f64,
    /// Power every thruster receives before clamping.
    pub constant_power: f64,
    /// Ticks between allocator recomputations.
    pub recompute_interval_ticks: u32,
    /// Force of all verniers at full power (N).
    pub net_force_magnitude: f64,
    /// Torque of all verniers at full power (N·m).
    pub net_torque_magnitude: f64,
}

impl Default for VernierConfig {
    fn default() -> Self {
        Self {
            seeking_power: 0.3,
            alignment_power: 1.0,
            constant_power: 0.3,
            recompute_interval_ticks: VERNIER_RECOMPUTE_INTERVAL,
            net_force_magnitude: 15.0,
            net_torque_magnitude: 10.0,
        }
    }
}

/// Forward-axis main motor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainPropulsionConfig {
    /// Power when the goal is abeam or behind.
    pub min_seek_power: f64,
    /// Power when the nose points at the goal.
    pub max_seek_power: f64,
    /// Force at full power (N).
    pub net_force_magnitude: f64,
}

impl Default for MainPropulsionConfig {
    fn default() -> Self {
        Self {
            min_seek_power: 0.6,
            max_seek_power: 1.0,
            net_force_magnitude: 3.0,
        }
    }
}

/// Rigid-body integration limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicsConfig {
    /// Multiplier applied to angular velocity every tick.
    pub angular_velocity_dampening: f64,
    /// Cap on angular speed (rad/s).
    pub max_angular_speed: f64,
    /// Constant world acceleration added to linear velocity (m/s²).
    pub gravitational_acceleration: DVec3,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            angular_velocity_dampening: 0.99,
            max_angular_speed: 5.0,
            gravitational_acceleration: DVec3::ZERO,
        }
    }
}

/// Time-varying gains that bend raw dynamics toward the ideal seek line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GainScheduleConfig {
    pub acceleration_gain_floor: f64,
    pub acceleration_gain_ceiling: f64,
    /// Time for the acceleration gain to reach its ceiling (ms).
    pub acceleration_collapse_millis: f64,
    pub velocity_gain_floor: f64,
    pub velocity_gain_ceiling: f64,
    /// Time for the velocity gain to reach its ceiling (ms).
    pub velocity_collapse_millis: f64,
    /// Share of the acceleration gain used to re-bias velocity toward the
    /// goal after the terminal cap.
    pub terminal_rebias_fraction: f64,
}

impl Default for GainScheduleConfig {
    fn default() -> Self {
        Self {
            acceleration_gain_floor: 0.3,
            acceleration_gain_ceiling: 0.9,
            acceleration_collapse_millis: 1000.0,
            velocity_gain_floor: 0.02,
            velocity_gain_ceiling: 0.2,
            velocity_collapse_millis: 80_000.0,
            terminal_rebias_fraction: 0.1,
        }
    }
}

impl GainScheduleConfig {
    /// Acceleration redirection gain after `elapsed_millis`.
    pub fn acceleration_gain(&self, elapsed_millis: f64) -> f64 {
        crate::math::lerp_clamped(
            self.acceleration_gain_floor,
            self.acceleration_gain_ceiling,
            elapsed_millis / self.acceleration_collapse_millis,
        )
    }

    /// Velocity redirection gain after `elapsed_millis`.
    pub fn velocity_gain(&self, elapsed_millis: f64) -> f64 {
        crate::math::lerp_clamped(
            self.velocity_gain_floor,
            self.velocity_gain_ceiling,
            elapsed_millis / self.velocity_collapse_millis,
        )
    }
}

/// Speed caps per dead-reckoning phase (m/s).
///
/// The cap is applied before gravity is integrated, so with non-zero
/// `DynamicsConfig::gravitational_acceleration` the speed after a step may
/// exceed it by up to `|g|·dt`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalVelocityConfig {
    pub normal: f64,
    pub dead_reckoning: f64,
}

impl Default for TerminalVelocityConfig {
    fn default() -> Self {
        Self {
            normal: 4.0,
            dead_reckoning: 10.0,
        }
    }
}

/// Dead-reckoning activation and lock behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeadReckoningConfig {
    pub enabled: bool,
    /// Distance to target below which dead reckoning may engage (m).
    pub activation_range: f64,
    /// Upper bound of the random extra range added at launch (m).
    pub activation_range_spread: f64,
    pub gate: ActivationGate,
    pub lock: LockPolicy,
}

impl Default for DeadReckoningConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            activation_range: 1.0,
            activation_range_spread: 1.0,
            gate: ActivationGate::default(),
            lock: LockPolicy::default(),
        }
    }
}

impl GuidanceConfig {
    /// Checks every field for a usable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.vernier;
        finite("vernier.seeking_power", v.seeking_power)?;
        finite("vernier.alignment_power", v.alignment_power)?;
        finite("vernier.constant_power", v.constant_power)?;
        if v.recompute_interval_ticks == 0 {
            return Err(ConfigError::ZeroRecomputeInterval);
        }
        non_negative("vernier.net_force_magnitude", v.net_force_magnitude)?;
        non_negative("vernier.net_torque_magnitude", v.net_torque_magnitude)?;

        let m = &self.main_propulsion;
        gain("main_propulsion.min_seek_power", m.min_seek_power)?;
        gain("main_propulsion.max_seek_power", m.max_seek_power)?;
        non_negative("main_propulsion.net_force_magnitude", m.net_force_magnitude)?;

        let d = &self.dynamics;
        if !(d.angular_velocity_dampening > 0.0 && d.angular_velocity_dampening <= 1.0) {
            return Err(ConfigError::InvalidDampening(d.angular_velocity_dampening));
        }
        positive("dynamics.max_angular_speed", d.max_angular_speed)?;
        if !d.gravitational_acceleration.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "dynamics.gravitational_acceleration",
            });
        }

        let g = &self.gain_schedule;
        gain("gain_schedule.acceleration_gain_floor", g.acceleration_gain_floor)?;
        gain("gain_schedule.acceleration_gain_ceiling", g.acceleration_gain_ceiling)?;
        positive(
            "gain_schedule.acceleration_collapse_millis",
            g.acceleration_collapse_millis,
        )?;
        gain("gain_schedule.velocity_gain_floor", g.velocity_gain_floor)?;
        gain("gain_schedule.velocity_gain_ceiling", g.velocity_gain_ceiling)?;
        positive(
            "gain_schedule.velocity_collapse_millis",
            g.velocity_collapse_millis,
        )?;
        gain("gain_schedule.terminal_rebias_fraction", g.terminal_rebias_fraction)?;

        positive("terminal_velocity.normal", self.terminal_velocity.normal)?;
        positive(
            "terminal_velocity.dead_reckoning",
            self.terminal_velocity.dead_reckoning,
        )?;

        let r = &self.dead_reckoning;
        non_negative("dead_reckoning.activation_range", r.activation_range)?;
        non_negative(
            "dead_reckoning.activation_range_spread",
            r.activation_range_spread,
        )?;
        if let ActivationGate::DistanceAndAlignment { min_alignment } = r.gate {
            finite("dead_reckoning.gate.min_alignment", min_alignment)?;
        }
        if let LockPolicy::Hysteresis { high, low } = r.lock {
            finite("dead_reckoning.lock.high", high)?;
            finite("dead_reckoning.lock.low", low)?;
        }
        Ok(())
    }

    /// Speed cap for the given lock state.
    pub fn terminal_velocity_cap(&self, locked: bool) -> f64 {
        if locked {
            self.terminal_velocity.dead_reckoning
        } else {
            self.terminal_velocity.normal
        }
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name })
    }
}

fn gain(name: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(name, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidGain { name, value })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}
