//! Simulation engine.
//!
//! `SimulationEngine` owns the hecs ECS world, processes orchestrator
//! commands, runs all systems at a fixed tick rate, and produces
//! `SimSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use glam::DVec3;
use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use vernier_core::commands::{MissileLaunch, SimCommand};
use vernier_core::components::{LastKnownTarget, MissileId, TargetId, TargetLink, TargetMotion};
use vernier_core::config::GuidanceConfig;
use vernier_core::constants::TICK_RATE;
use vernier_core::error::ConfigError;
use vernier_core::events::{GuidanceEvent, SimEvent};
use vernier_core::state::SimSnapshot;
use vernier_core::types::{Airframe, SimTime};
use vernier_guidance::missile::{Missile, PersistedMissile};

use crate::error::SimError;
use crate::systems;
use crate::systems::launch_schedule::LaunchSchedule;
use crate::world_setup::{self, LaunchDefaults};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Master RNG seed. Same seed = same simulation.
    pub seed: u64,
    /// Ticks per simulated second.
    pub tick_rate: u32,
    /// Guidance for launches that do not carry their own.
    pub guidance: GuidanceConfig,
    /// Airframe for launches that do not carry their own.
    pub airframe: Airframe,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_rate: TICK_RATE,
            guidance: GuidanceConfig::default(),
            airframe: Airframe::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    paused: bool,
    dt: f64,
    seed: u64,
    rng: ChaCha8Rng,
    guidance: GuidanceConfig,
    airframe: Airframe,
    next_missile_id: u64,
    next_target_id: u64,
    command_queue: VecDeque<SimCommand>,
    launch_schedule: LaunchSchedule,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<SimEvent>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        if config.tick_rate == 0 {
            return Err(ConfigError::NonPositive {
                name: "tick_rate",
                value: 0.0,
            }
            .into());
        }
        config.guidance.validate()?;
        log::info!(
            "simulation seed {} at {} Hz",
            config.seed,
            config.tick_rate
        );

        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            paused: false,
            dt: 1.0 / f64::from(config.tick_rate),
            seed: config.seed,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            guidance: config.guidance,
            airframe: config.airframe,
            next_missile_id: 0,
            next_target_id: 0,
            command_queue: VecDeque::new(),
            launch_schedule: LaunchSchedule::default(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
        })
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SimCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SimCommand>) {
        self.command_queue.extend(commands);
    }

    /// Replace the launch schedule.
    pub fn set_launch_schedule(&mut self, schedule: LaunchSchedule) {
        self.launch_schedule = schedule;
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    /// Commands are applied even while paused; systems are not.
    pub fn tick(&mut self) -> SimSnapshot {
        self.process_commands();

        if !self.paused {
            self.run_systems();
            self.time.advance(self.dt);
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(&self.world, &self.time, self.paused, events)
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Seconds per tick.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Launches still waiting in the schedule.
    pub fn pending_launches(&self) -> usize {
        self.launch_schedule.pending()
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Persisted state of one missile.
    pub fn missile(&self, id: MissileId) -> Option<PersistedMissile> {
        let entity = world_setup::find_missile(&self.world, id)?;
        let missile = self.world.get::<&Missile>(entity).ok()?;
        Some(missile.persisted())
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.handle_command(command) {
                log::warn!("command rejected at tick {}: {err}", self.time.tick);
                self.events.push(SimEvent::CommandRejected {
                    reason: err.to_string(),
                    tick: self.time.tick,
                });
            }
        }
    }

    /// Handle a single command.
    fn handle_command(&mut self, command: SimCommand) -> Result<(), SimError> {
        let tick = self.time.tick;
        match command {
            SimCommand::SpawnTarget { position, velocity } => {
                let target_id = TargetId(self.next_target_id);
                self.next_target_id += 1;
                world_setup::spawn_target(&mut self.world, target_id, position, velocity);
                self.events.push(SimEvent::TargetSpawned { target_id, tick });
            }
            SimCommand::SetTargetPosition {
                target_id,
                position,
            } => {
                self.target_motion_mut(target_id)?.position = position;
            }
            SimCommand::SetTargetVelocity {
                target_id,
                velocity,
            } => {
                self.target_motion_mut(target_id)?.velocity = velocity;
            }
            SimCommand::RemoveTarget { target_id } => self.remove_target(target_id)?,
            SimCommand::LaunchMissile(launch) => self.launch_missile(&launch)?,
            SimCommand::StartDeadReckoning { missile_id } => {
                self.start_dead_reckoning(missile_id)?
            }
            SimCommand::DestroyMissile { missile_id } => {
                let entity = world_setup::find_missile(&self.world, missile_id)
                    .ok_or(SimError::UnknownMissile(missile_id))?;
                let _ = self.world.despawn(entity);
                log::debug!("missile {} destroyed at tick {tick}", missile_id.0);
                self.events
                    .push(SimEvent::MissileDestroyed { missile_id, tick });
            }
            SimCommand::Pause => self.paused = true,
            SimCommand::Resume => self.paused = false,
        }
        Ok(())
    }

    fn target_motion_mut(&mut self, target_id: TargetId) -> Result<&mut TargetMotion, SimError> {
        self.world
            .query_mut::<(&TargetId, &mut TargetMotion)>()
            .into_iter()
            .find(|(_, (id, _))| **id == target_id)
            .map(|(_, (_, motion))| motion)
            .ok_or(SimError::UnknownTarget(target_id))
    }

    fn remove_target(&mut self, target_id: TargetId) -> Result<(), SimError> {
        let (entity, motion) = world_setup::find_target(&self.world, target_id)
            .ok_or(SimError::UnknownTarget(target_id))?;

        let chasing: Vec<hecs::Entity> = self
            .world
            .query::<&TargetLink>()
            .iter()
            .filter(|(_, link)| link.target == target_id)
            .map(|(entity, _)| entity)
            .collect();
        for missile in chasing {
            let _ = self.world.insert_one(
                missile,
                LastKnownTarget {
                    position: motion.position,
                },
            );
        }

        let _ = self.world.despawn(entity);
        self.events.push(SimEvent::TargetRemoved {
            target_id,
            tick: self.time.tick,
        });
        Ok(())
    }

    fn launch_missile(&mut self, launch: &MissileLaunch) -> Result<(), SimError> {
        let missile_id = MissileId(self.next_missile_id);
        let defaults = LaunchDefaults {
            airframe: &self.airframe,
            guidance: &self.guidance,
            master_seed: self.seed,
            now_secs: self.time.elapsed_secs,
        };
        world_setup::spawn_missile(&mut self.world, &mut self.rng, missile_id, launch, &defaults)?;
        self.next_missile_id += 1;

        log::info!(
            "missile {} launched at target {} on tick {}",
            missile_id.0,
            launch.target_id.0,
            self.time.tick
        );
        self.events.push(SimEvent::MissileLaunched {
            missile_id,
            target_id: launch.target_id,
            tick: self.time.tick,
        });
        Ok(())
    }

    fn start_dead_reckoning(&mut self, missile_id: MissileId) -> Result<(), SimError> {
        let entity = world_setup::find_missile(&self.world, missile_id)
            .ok_or(SimError::UnknownMissile(missile_id))?;
        let target = self.pursued_point(entity);

        let mut missile = self
            .world
            .get::<&mut Missile>(entity)
            .map_err(|_| SimError::UnknownMissile(missile_id))?;
        let target = target.unwrap_or_else(|| missile.state().position + missile.state().forward());
        let GuidanceEvent::DeadReckoningEngaged {
            locked_direction,
            distance_to_target,
            ..
        } = missile.try_start_dead_reckoning(target)?;
        drop(missile);

        self.events.push(SimEvent::DeadReckoningEngaged {
            missile_id,
            locked_direction,
            distance_to_target,
            tick: self.time.tick,
        });
        Ok(())
    }

    /// Live or last known position of the target a missile chases.
    fn pursued_point(&self, missile: hecs::Entity) -> Option<DVec3> {
        let link = *self.world.get::<&TargetLink>(missile).ok()?;
        world_setup::find_target(&self.world, link.target)
            .map(|(_, motion)| motion.position)
            .or_else(|| {
                self.world
                    .get::<&LastKnownTarget>(missile)
                    .ok()
                    .map(|last| last.position)
            })
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let tick = self.time.tick;
        // 1. Launch schedule
        for launch in systems::launch_schedule::run(&mut self.launch_schedule, tick) {
            if let Err(err) = self.launch_missile(&launch) {
                log::warn!("scheduled launch failed at tick {tick}: {err}");
                self.events.push(SimEvent::CommandRejected {
                    reason: err.to_string(),
                    tick,
                });
            }
        }
        // 2. Target motion
        systems::target_motion::run(&mut self.world, self.dt);
        // 3. Scheduled dead reckoning
        systems::dead_reckoning::run(&mut self.world, &mut self.events, tick);
        // 4. Missile guidance
        systems::guidance::run(&mut self.world, self.dt, &mut self.events, tick);
        // 5. Cleanup (lifetime expiry)
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer, &mut self.events, tick);
    }
}
