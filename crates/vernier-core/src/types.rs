//! Fundamental rigid-body, airframe and simulation types.

use std::f64::consts::TAU;

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;
use crate::math::{direction_or_zero, forward_axis, local_to_world, world_to_local};

/// Kinematic state of one free body. Orientation is unit-norm after every
/// mutation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyState {
    /// World-frame position (m).
    pub position: DVec3,
    /// World-frame orientation.
    pub orientation: DQuat,
    /// World-frame linear velocity (m/s).
    pub linear_velocity: DVec3,
    /// Body rate expressed in world axes (rad/s).
    pub angular_velocity: DVec3,
}

impl Default for RigidBodyState {
    fn default() -> Self {
        Self::at_rest(DVec3::ZERO, DQuat::IDENTITY)
    }
}

impl RigidBodyState {
    /// Body at rest with the given pose.
    pub fn at_rest(position: DVec3, orientation: DQuat) -> Self {
        Self {
            position,
            orientation: orientation.normalize(),
            linear_velocity: DVec3::ZERO,
            angular_velocity: DVec3::ZERO,
        }
    }

    /// Body at `position` whose forward axis points along `forward`, rolled
    /// so that its up axis is as close to `up` as possible.
    pub fn looking_along(position: DVec3, forward: DVec3, up: DVec3) -> Self {
        Self::at_rest(position, look_rotation(forward, up))
    }

    /// Builder-style linear velocity.
    pub fn with_linear_velocity(mut self, velocity: DVec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Current pose for renderers.
    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position,
            orientation: self.orientation,
        }
    }

    /// Body forward axis in world space.
    pub fn forward(&self) -> DVec3 {
        forward_axis(self.orientation)
    }

    /// Rotates a body-frame vector into world space.
    pub fn local_to_world(&self, v: DVec3) -> DVec3 {
        local_to_world(self.orientation, v)
    }

    /// Rotates a world-space vector into the body frame.
    pub fn world_to_local(&self, v: DVec3) -> DVec3 {
        world_to_local(self.orientation, v)
    }

    /// World position of a body-local point.
    pub fn point_to_world(&self, local_point: DVec3) -> DVec3 {
        self.position + self.local_to_world(local_point)
    }
}

/// Orientation whose forward (+Z) axis points along `forward`. Falls back to
/// identity when `forward` is zero, and to an arbitrary roll when `forward`
/// is parallel to `up`.
pub fn look_rotation(forward: DVec3, up: DVec3) -> DQuat {
    let f = direction_or_zero(forward);
    if f == DVec3::ZERO {
        return DQuat::IDENTITY;
    }
    let mut right = direction_or_zero(up.cross(f));
    if right == DVec3::ZERO {
        right = f.any_orthonormal_vector();
    }
    let true_up = f.cross(right);
    DQuat::from_mat3(&glam::DMat3::from_cols(right, true_up, f)).normalize()
}

/// Position and orientation, as read by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: DVec3,
    pub orientation: DQuat,
}

/// Static description of one vernier thruster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrusterSpec {
    /// Mounting point in the body frame (m).
    pub local_position: DVec3,
    /// Commanded thrust direction in the body frame (unit).
    pub thrust_direction: DVec3,
    /// Direction the guidance believes the thruster pushes. May differ from
    /// `thrust_direction` to model systematic sensor error.
    pub sensed_direction: DVec3,
    /// Relative strength weight.
    pub strength: f64,
}

impl ThrusterSpec {
    /// Thruster whose sensed direction matches its commanded direction.
    pub fn new(local_position: DVec3, thrust_direction: DVec3, strength: f64) -> Self {
        let direction = direction_or_zero(thrust_direction);
        Self {
            local_position,
            thrust_direction: direction,
            sensed_direction: direction,
            strength,
        }
    }

    /// Builder-style sensed direction.
    pub fn with_sensed_direction(mut self, sensed_direction: DVec3) -> Self {
        self.sensed_direction = direction_or_zero(sensed_direction);
        self
    }
}

/// Ordered, validated thruster list. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ThrusterSpec>", into = "Vec<ThrusterSpec>")]
pub struct ThrusterArray {
    thrusters: Vec<ThrusterSpec>,
    total_strength: f64,
}

impl ThrusterArray {
    /// Validates strengths and precomputes their sum.
    pub fn new(thrusters: Vec<ThrusterSpec>) -> Result<Self, ConfigError> {
        if thrusters.is_empty() {
            return Err(ConfigError::NoThrusters);
        }
        for (index, thruster) in thrusters.iter().enumerate() {
            if !thruster.strength.is_finite() || thruster.strength < 0.0 {
                return Err(ConfigError::InvalidThrusterStrength {
                    index,
                    strength: thruster.strength,
                });
            }
        }
        let total_strength: f64 = thrusters.iter().map(|t| t.strength).sum();
        if total_strength <= 0.0 {
            return Err(ConfigError::ZeroThrusterStrength);
        }
        Ok(Self {
            thrusters,
            total_strength,
        })
    }

    /// `count` thrusters evenly spaced on a ring behind the centre of mass,
    /// each pushing radially outward with a forward cant. Sensed directions
    /// are rolled by `sensor_roll_bias` radians about the forward axis.
    pub fn ring(
        count: usize,
        radius: f64,
        tail_offset: f64,
        forward_cant: f64,
        sensor_roll_bias: f64,
    ) -> Result<Self, ConfigError> {
        Self::new(ring_specs(
            count,
            radius,
            tail_offset,
            forward_cant,
            sensor_roll_bias,
        ))
    }

    /// Sum of all strength weights (always positive).
    pub fn total_strength(&self) -> f64 {
        self.total_strength
    }

    pub fn len(&self) -> usize {
        self.thrusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thrusters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ThrusterSpec> {
        self.thrusters.iter()
    }

    pub fn as_slice(&self) -> &[ThrusterSpec] {
        &self.thrusters
    }
}

impl Default for ThrusterArray {
    fn default() -> Self {
        let thrusters = ring_specs(
            DEFAULT_THRUSTER_COUNT,
            DEFAULT_THRUSTER_RADIUS,
            DEFAULT_THRUSTER_TAIL_OFFSET,
            DEFAULT_THRUSTER_FORWARD_CANT,
            DEFAULT_SENSOR_ROLL_BIAS,
        );
        let total_strength = thrusters.iter().map(|t| t.strength).sum();
        Self {
            thrusters,
            total_strength,
        }
    }
}

fn ring_specs(
    count: usize,
    radius: f64,
    tail_offset: f64,
    forward_cant: f64,
    sensor_roll_bias: f64,
) -> Vec<ThrusterSpec> {
    let bias = DQuat::from_axis_angle(BODY_FORWARD, sensor_roll_bias);
    (0..count)
        .map(|i| {
            let angle = TAU * i as f64 / count as f64;
            let radial = DVec3::new(angle.cos(), angle.sin(), 0.0);
            let position = radial * radius - BODY_FORWARD * tail_offset;
            let spec = ThrusterSpec::new(position, radial + BODY_FORWARD * forward_cant, 1.0);
            spec.with_sensed_direction(bias * spec.thrust_direction)
        })
        .collect()
}

impl TryFrom<Vec<ThrusterSpec>> for ThrusterArray {
    type Error = ConfigError;

    fn try_from(thrusters: Vec<ThrusterSpec>) -> Result<Self, Self::Error> {
        Self::new(thrusters)
    }
}

impl From<ThrusterArray> for Vec<ThrusterSpec> {
    fn from(array: ThrusterArray) -> Self {
        array.thrusters
    }
}

impl<'a> IntoIterator for &'a ThrusterArray {
    type Item = &'a ThrusterSpec;
    type IntoIter = std::slice::Iter<'a, ThrusterSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.thrusters.iter()
    }
}

/// Serialized form of [`MassProperties`]; the inverse inertia is derived.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct MassPropertiesDef {
    mass: f64,
    moment_of_inertia: DVec3,
    #[serde(default)]
    center_of_mass: DVec3,
}

/// Mass, diagonal inertia and centre of mass. Constant during a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MassPropertiesDef", into = "MassPropertiesDef")]
pub struct MassProperties {
    mass: f64,
    moment_of_inertia: DVec3,
    inverse_moment_of_inertia: DVec3,
    center_of_mass: DVec3,
}

impl MassProperties {
    /// Validates and precomputes the element-wise inverse inertia.
    pub fn new(mass: f64, moment_of_inertia: DVec3) -> Result<Self, ConfigError> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(ConfigError::NonPositiveMass(mass));
        }
        for (axis, value) in [
            ("x", moment_of_inertia.x),
            ("y", moment_of_inertia.y),
            ("z", moment_of_inertia.z),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositiveInertia { axis, value });
            }
        }
        Ok(Self {
            mass,
            moment_of_inertia,
            inverse_moment_of_inertia: moment_of_inertia.recip(),
            center_of_mass: DVec3::ZERO,
        })
    }

    /// Builder-style body-local centre of mass.
    pub fn with_center_of_mass(mut self, center_of_mass: DVec3) -> Self {
        self.center_of_mass = center_of_mass;
        self
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn moment_of_inertia(&self) -> DVec3 {
        self.moment_of_inertia
    }

    /// Element-wise inverse of the diagonal inertia.
    pub fn inverse_moment_of_inertia(&self) -> DVec3 {
        self.inverse_moment_of_inertia
    }

    /// Body-local centre of mass.
    pub fn center_of_mass(&self) -> DVec3 {
        self.center_of_mass
    }
}

impl Default for MassProperties {
    fn default() -> Self {
        Self {
            mass: DEFAULT_MASS,
            moment_of_inertia: DEFAULT_MOMENT_OF_INERTIA,
            inverse_moment_of_inertia: DEFAULT_MOMENT_OF_INERTIA.recip(),
            center_of_mass: DVec3::ZERO,
        }
    }
}

impl TryFrom<MassPropertiesDef> for MassProperties {
    type Error = ConfigError;

    fn try_from(def: MassPropertiesDef) -> Result<Self, Self::Error> {
        Ok(Self::new(def.mass, def.moment_of_inertia)?.with_center_of_mass(def.center_of_mass))
    }
}

impl From<MassProperties> for MassPropertiesDef {
    fn from(props: MassProperties) -> Self {
        Self {
            mass: props.mass,
            moment_of_inertia: props.moment_of_inertia,
            center_of_mass: props.center_of_mass,
        }
    }
}

/// Physical make-up of one missile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Airframe {
    pub mass: MassProperties,
    pub thrusters: ThrusterArray,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of length `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }

    /// Elapsed time in milliseconds.
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed_secs * 1000.0
    }
}
