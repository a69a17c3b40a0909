//! Launch schedule system: queues scheduled launches when their tick comes.

use serde::{Deserialize, Serialize};

use vernier_core::commands::MissileLaunch;

/// A single scheduled launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchEntry {
    /// Tick at which this missile launches.
    pub launch_at_tick: u64,
    pub launch: MissileLaunch,
    /// Whether this entry has already fired.
    #[serde(default)]
    pub launched: bool,
}

/// All scheduled launches of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchSchedule {
    pub entries: Vec<LaunchEntry>,
}

impl LaunchSchedule {
    pub fn push(&mut self, launch_at_tick: u64, launch: MissileLaunch) {
        self.entries.push(LaunchEntry {
            launch_at_tick,
            launch,
            launched: false,
        });
    }

    /// Entries not yet launched.
    pub fn pending(&self) -> usize {
        self.entries.iter().filter(|e| !e.launched).count()
    }
}

/// Marks due entries as launched and returns them in schedule order.
pub fn run(schedule: &mut LaunchSchedule, current_tick: u64) -> Vec<MissileLaunch> {
    let mut due = Vec::new();
    for entry in &mut schedule.entries {
        if !entry.launched && current_tick >= entry.launch_at_tick {
            due.push(entry.launch.clone());
            entry.launched = true;
        }
    }
    due
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use vernier_core::components::TargetId;

    use super::*;

    #[test]
    fn test_entries_fire_once_at_their_tick() {
        let mut schedule = LaunchSchedule::default();
        schedule.push(0, MissileLaunch::new(TargetId(0), DVec3::ZERO, DVec3::Z));
        schedule.push(10, MissileLaunch::new(TargetId(1), DVec3::ZERO, DVec3::Z));

        assert_eq!(run(&mut schedule, 0).len(), 1);
        assert!(run(&mut schedule, 5).is_empty());
        let due = run(&mut schedule, 10);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].target_id, TargetId(1));
        assert!(run(&mut schedule, 11).is_empty());
        assert_eq!(schedule.pending(), 0);
    }
}
