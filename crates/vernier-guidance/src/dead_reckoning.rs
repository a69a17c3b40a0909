//! Dead-reckoning state machine.
//!
//! Pure functions over plain data, no ECS dependency. While seeking, the
//! goal direction tracks the live target. Once locked, the goal is derived
//! from the direction captured at lock time, so a target that jinks in the
//! last metre cannot pull the missile into a spiral.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use vernier_core::config::DeadReckoningConfig;
use vernier_core::constants::{
    HYSTERESIS_BASE_COMMITMENT, HYSTERESIS_DIRECTION_EVENTS, HYSTERESIS_TARGET_EVENTS,
};
use vernier_core::enums::{ActivationGate, DeadReckoningPhase, LockPolicy};
use vernier_core::error::GuidanceError;
use vernier_core::events::GuidanceEvent;
use vernier_core::math::{direction_or_zero, lerp_clamped, lerp_vec_clamped};

/// Persistent dead-reckoning state of one missile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeadReckoningState {
    pub phase: DeadReckoningPhase,
    /// Unit direction to the target captured at lock.
    pub locked_direction: Option<DVec3>,
    /// Target position captured at lock.
    pub locked_point: Option<DVec3>,
    /// Debounced count of alignment crossings since lock.
    pub alignment_events: u32,
    /// Whether alignment was last seen above the high threshold.
    pub aligned: bool,
}

/// Input to the state machine for one tick.
pub struct SeekContext {
    pub position: DVec3,
    pub target: DVec3,
    /// Unit direction of actual travel over the last tick, or zero.
    pub heading: DVec3,
    pub elapsed_secs: f64,
}

/// Output from the state machine.
pub struct SeekUpdate {
    pub goal_direction: DVec3,
    pub distance_to_target: f64,
    /// Set on the tick the lock engaged.
    pub engaged: Option<GuidanceEvent>,
}

impl DeadReckoningState {
    pub fn is_locked(&self) -> bool {
        self.phase == DeadReckoningPhase::Locked
    }

    /// Evaluates one tick: may lock automatically, then returns the goal.
    pub fn update(&mut self, config: &DeadReckoningConfig, ctx: &SeekContext) -> SeekUpdate {
        let to_target = ctx.target - ctx.position;
        let distance_to_target = to_target.length();
        let direction_to_target = direction_or_zero(to_target);
        let alignment = ctx.heading.dot(direction_to_target);

        let mut engaged = None;
        if !self.is_locked() {
            if !should_engage(config, distance_to_target, alignment) {
                return SeekUpdate {
                    goal_direction: direction_to_target,
                    distance_to_target,
                    engaged: None,
                };
            }
            engaged = Some(self.lock(ctx.position, ctx.target, ctx.elapsed_secs));
        }

        let goal_direction = match config.lock {
            LockPolicy::Frozen => self.locked_direction.unwrap_or(direction_to_target),
            LockPolicy::Hysteresis { high, low } => {
                self.track_alignment(alignment, high, low);
                self.hysteresis_goal(ctx.position, direction_to_target)
            }
        };

        SeekUpdate {
            goal_direction,
            distance_to_target,
            engaged,
        }
    }

    /// Engages on request. Fails if already locked or disabled.
    pub fn engage(
        &mut self,
        config: &DeadReckoningConfig,
        position: DVec3,
        target: DVec3,
        elapsed_secs: f64,
    ) -> Result<GuidanceEvent, GuidanceError> {
        if self.is_locked() {
            return Err(GuidanceError::DeadReckoningAlreadyEngaged);
        }
        if !config.enabled {
            return Err(GuidanceError::DeadReckoningDisabled);
        }
        Ok(self.lock(position, target, elapsed_secs))
    }

    fn lock(&mut self, position: DVec3, target: DVec3, elapsed_secs: f64) -> GuidanceEvent {
        let to_target = target - position;
        let locked_direction = direction_or_zero(to_target);
        self.phase = DeadReckoningPhase::Locked;
        self.locked_direction = Some(locked_direction);
        self.locked_point = Some(target);
        log::debug!(
            "dead reckoning engaged at {:.3}s, {:.3} m from target, direction {:?}",
            elapsed_secs,
            to_target.length(),
            locked_direction
        );
        GuidanceEvent::DeadReckoningEngaged {
            locked_direction,
            locked_point: target,
            distance_to_target: to_target.length(),
            elapsed_secs,
        }
    }

    /// Counts a rising crossing of `high`; re-arms after falling below `low`.
    fn track_alignment(&mut self, alignment: f64, high: f64, low: f64) {
        if !self.aligned && alignment > high {
            self.alignment_events += 1;
            self.aligned = true;
        } else if self.aligned && alignment < low {
            self.aligned = false;
        }
    }

    fn hysteresis_goal(&self, position: DVec3, direction_to_target: DVec3) -> DVec3 {
        let locked_direction = self.locked_direction.unwrap_or(direction_to_target);
        let to_locked_point = self
            .locked_point
            .map(|point| direction_or_zero(point - position))
            .unwrap_or(locked_direction);
        let events = f64::from(self.alignment_events);

        let committed = lerp_vec_clamped(
            to_locked_point,
            locked_direction,
            lerp_clamped(HYSTERESIS_BASE_COMMITMENT, 1.0, events / HYSTERESIS_DIRECTION_EVENTS),
        );
        let blended = lerp_vec_clamped(
            direction_to_target,
            committed,
            lerp_clamped(HYSTERESIS_BASE_COMMITMENT, 1.0, events / HYSTERESIS_TARGET_EVENTS),
        );
        direction_or_zero(blended)
    }
}

fn should_engage(config: &DeadReckoningConfig, distance_to_target: f64, alignment: f64) -> bool {
    if !config.enabled || distance_to_target >= config.activation_range {
        return false;
    }
    match config.gate {
        ActivationGate::DistanceOnly => true,
        ActivationGate::DistanceAndAlignment { min_alignment } => alignment > min_alignment,
    }
}
