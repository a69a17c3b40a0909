//! A single guided missile.
//!
//! Owns all of its mutable state, including its random generator, so
//! distinct missiles can be stepped concurrently. One instance must only be
//! stepped by one caller at a time, which `&mut self` enforces.

use glam::DVec3;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use vernier_core::config::GuidanceConfig;
use vernier_core::enums::SeedPolicy;
use vernier_core::error::{ConfigError, GuidanceError};
use vernier_core::events::GuidanceEvent;
use vernier_core::math::{direction_or_zero, normalized_or_identity};
use vernier_core::types::{
    Airframe, MassProperties, RigidBodyState, SimTime, ThrusterArray, ThrusterSpec,
};

use crate::blender::{self, LinearShaping};
use crate::dead_reckoning::{DeadReckoningState, SeekContext};
use crate::integrator;
use crate::propulsion;
use crate::rng;
use crate::target::TargetProvider;
use crate::thrusters::VernierAllocator;

/// Result of one full guidance tick.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub state: RigidBodyState,
    /// Goal direction used this tick.
    pub goal_direction: DVec3,
    /// Distance to the target at the start of the tick.
    pub distance_to_target: f64,
    pub events: Vec<GuidanceEvent>,
}

/// The state that must survive a save/restore.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersistedMissile {
    pub body: RigidBodyState,
    pub dead_reckoning: DeadReckoningState,
}

#[derive(Debug, Clone)]
pub struct Missile {
    body: RigidBodyState,
    airframe: Airframe,
    config: GuidanceConfig,
    dead_reckoning: DeadReckoningState,
    allocator: VernierAllocator,
    rng: ChaCha8Rng,
    clock: SimTime,
    last_position: DVec3,
    goal_direction: DVec3,
    distance_to_target: f64,
}

impl Missile {
    /// Builds a missile from its parts, validating the airframe and config.
    pub fn new(
        body: RigidBodyState,
        mass: MassProperties,
        thrusters: Vec<ThrusterSpec>,
        config: GuidanceConfig,
        seed: SeedPolicy,
    ) -> Result<Self, ConfigError> {
        let thrusters = ThrusterArray::new(thrusters)?;
        Self::from_airframe(body, Airframe { mass, thrusters }, config, rng::rng_for(seed, 0))
    }

    /// Builds a missile around an already validated airframe and a caller
    /// supplied generator.
    pub fn from_airframe(
        body: RigidBodyState,
        airframe: Airframe,
        config: GuidanceConfig,
        rng: ChaCha8Rng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if !(body.position.is_finite()
            && body.orientation.is_finite()
            && body.linear_velocity.is_finite()
            && body.angular_velocity.is_finite())
        {
            return Err(ConfigError::NonFinite {
                name: "initial rigid body state",
            });
        }
        let body = RigidBodyState {
            orientation: normalized_or_identity(body.orientation),
            ..body
        };
        Ok(Self {
            last_position: body.position,
            goal_direction: body.forward(),
            distance_to_target: 0.0,
            body,
            airframe,
            config,
            dead_reckoning: DeadReckoningState::default(),
            allocator: VernierAllocator::new(),
            rng,
            clock: SimTime::default(),
        })
    }

    /// Runs one tick against a live target: updates dead reckoning, derives
    /// the goal direction, then applies the guidance step.
    pub fn step<T: TargetProvider + ?Sized>(&mut self, target: &T, dt: f64) -> StepOutcome {
        let heading = direction_or_zero(self.body.position - self.last_position);
        self.last_position = self.body.position;

        let update = self.dead_reckoning.update(
            &self.config.dead_reckoning,
            &SeekContext {
                position: self.body.position,
                target: target.target_position(),
                heading,
                elapsed_secs: self.clock.elapsed_secs,
            },
        );
        self.distance_to_target = update.distance_to_target;

        let state = self.compute_guidance_step(update.goal_direction, dt);
        StepOutcome {
            state,
            goal_direction: self.goal_direction,
            distance_to_target: update.distance_to_target,
            events: update.engaged.into_iter().collect(),
        }
    }

    /// Applies one tick of propulsion, shaping and integration toward
    /// `goal_direction`. Non-positive or non-finite `dt` leaves the state
    /// untouched.
    pub fn compute_guidance_step(&mut self, goal_direction: DVec3, dt: f64) -> RigidBodyState {
        if !(dt > 0.0 && dt.is_finite()) {
            log::warn!("ignoring guidance step with dt = {dt}");
            return self.body;
        }
        let goal = direction_or_zero(goal_direction);
        self.goal_direction = goal;

        let vernier = self.allocator.contribution(
            &self.body,
            &self.airframe.mass,
            &self.airframe.thrusters,
            &self.config.vernier,
            goal,
        );
        let main = propulsion::main_propulsion_local(
            self.body.forward(),
            goal,
            &self.config.main_propulsion,
        );
        let accelerations =
            blender::net_accelerations(&self.body, &self.airframe.mass, vernier, main, &self.config);

        blender::apply_angular(
            &mut self.body,
            accelerations.angular_acceleration,
            dt,
            &self.config.dynamics,
        );
        blender::apply_linear(
            &mut self.body,
            accelerations.linear_acceleration,
            &LinearShaping {
                goal_direction: goal,
                dt,
                elapsed_millis: self.clock.elapsed_millis(),
                locked: self.dead_reckoning.is_locked(),
            },
            &self.config,
        );
        integrator::integrate(&mut self.body, dt, self.config.dynamics.gravitational_acceleration);
        blender::perturb_orientation(&mut self.body, dt, &mut self.rng);

        self.clock.advance(dt);
        self.body
    }

    /// Locks dead reckoning toward `target` now.
    ///
    /// Fails if already locked or dead reckoning is disabled.
    pub fn try_start_dead_reckoning(&mut self, target: DVec3) -> Result<GuidanceEvent, GuidanceError> {
        self.dead_reckoning.engage(
            &self.config.dead_reckoning,
            self.body.position,
            target,
            self.clock.elapsed_secs,
        )
    }

    /// Locks dead reckoning unless it is already locked or disabled.
    pub fn start_dead_reckoning_if_not_started(&mut self, target: DVec3) -> Option<GuidanceEvent> {
        if self.dead_reckoning.is_locked() || !self.config.dead_reckoning.enabled {
            return None;
        }
        self.try_start_dead_reckoning(target).ok()
    }

    pub fn state(&self) -> &RigidBodyState {
        &self.body
    }

    pub fn airframe(&self) -> &Airframe {
        &self.airframe
    }

    pub fn config(&self) -> &GuidanceConfig {
        &self.config
    }

    pub fn dead_reckoning(&self) -> &DeadReckoningState {
        &self.dead_reckoning
    }

    pub fn is_locked(&self) -> bool {
        self.dead_reckoning.is_locked()
    }

    /// Simulated flight time (s).
    pub fn elapsed_secs(&self) -> f64 {
        self.clock.elapsed_secs
    }

    pub fn goal_direction(&self) -> DVec3 {
        self.goal_direction
    }

    /// Distance to the target as of the last [`Missile::step`].
    pub fn distance_to_target(&self) -> f64 {
        self.distance_to_target
    }

    pub fn persisted(&self) -> PersistedMissile {
        PersistedMissile {
            body: self.body,
            dead_reckoning: self.dead_reckoning,
        }
    }
}
