//! Tests for the simulation engine, command handling and scheduled behaviour.

use glam::DVec3;
use test_log::test;

use vernier_core::commands::{MissileLaunch, SimCommand};
use vernier_core::components::{MissileId, ScheduledDeadReckoning, TargetId};
use vernier_core::enums::DeadReckoningPhase;
use vernier_core::events::SimEvent;
use vernier_core::state::SimSnapshot;

use crate::engine::{SimConfig, SimulationEngine};
use crate::error::SimError;
use crate::scenario::{Scenario, BUILTIN_SCENARIOS};

fn engine(seed: u64) -> SimulationEngine {
    SimulationEngine::new(SimConfig {
        seed,
        ..Default::default()
    })
    .unwrap()
}

/// One target at `target`, one missile launched from the origin.
fn single_engagement(seed: u64, target: DVec3, launch: MissileLaunch) -> SimulationEngine {
    let mut engine = engine(seed);
    engine.queue_command(SimCommand::SpawnTarget {
        position: target,
        velocity: DVec3::ZERO,
    });
    engine.queue_command(SimCommand::LaunchMissile(launch));
    engine
}

fn run_collecting(engine: &mut SimulationEngine, ticks: usize) -> (Vec<SimEvent>, SimSnapshot) {
    let mut events = Vec::new();
    let mut last = SimSnapshot::default();
    for _ in 0..ticks {
        last = engine.tick();
        events.extend(last.events.iter().cloned());
    }
    (events, last)
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = Scenario::builtin("salvo").unwrap().into_engine(Some(12345)).unwrap();
    let mut engine_b = Scenario::builtin("salvo").unwrap().into_engine(Some(12345)).unwrap();

    for _ in 0..300 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = Scenario::builtin("salvo").unwrap().into_engine(Some(111)).unwrap();
    let mut engine_b = Scenario::builtin("salvo").unwrap().into_engine(Some(222)).unwrap();

    let mut diverged = false;
    for _ in 0..100 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

#[test]
fn test_builtin_scenarios_run_clean() {
    for name in BUILTIN_SCENARIOS {
        let mut engine = Scenario::builtin(name).unwrap().into_engine(None).unwrap();
        let (events, _) = run_collecting(&mut engine, 500);
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, SimEvent::CommandRejected { .. })),
            "scenario {name} produced rejected commands: {events:?}"
        );
        assert_eq!(engine.pending_launches(), 0);
    }
}

// ---- Tick timing ----

#[test]
fn test_tick_timing_50_ticks_one_second() {
    let mut engine = engine(1);
    for _ in 0..50 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 50);
    assert!(
        (engine.time().elapsed_secs - 1.0).abs() < 1e-10,
        "50 ticks should equal 1.0 seconds, got {}",
        engine.time().elapsed_secs
    );
}

#[test]
fn test_zero_tick_rate_rejected() {
    let result = SimulationEngine::new(SimConfig {
        tick_rate: 0,
        ..Default::default()
    });
    assert!(matches!(result, Err(SimError::Config(_))));
}

// ---- Pause/Resume ----

#[test]
fn test_pause_stops_simulation() {
    let mut engine = single_engagement(
        5,
        DVec3::new(0.0, 0.0, 20.0),
        MissileLaunch::new(TargetId(0), DVec3::ZERO, DVec3::Z),
    );
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 10);

    engine.queue_command(SimCommand::Pause);
    let frozen = engine.tick();
    for _ in 0..10 {
        let snap = engine.tick();
        assert!(snap.paused);
        assert_eq!(snap.missiles, frozen.missiles);
    }
    assert_eq!(engine.time().tick, 10, "Time should not advance while paused");

    engine.queue_command(SimCommand::Resume);
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 20);
    assert!(!engine.is_paused());
}

// ---- Targets ----

#[test]
fn test_target_moves_at_constant_velocity() {
    let mut engine = engine(2);
    engine.queue_command(SimCommand::SpawnTarget {
        position: DVec3::ZERO,
        velocity: DVec3::new(1.0, 0.0, -2.0),
    });
    let mut snap = engine.tick();
    assert!(matches!(
        snap.events.as_slice(),
        [SimEvent::TargetSpawned {
            target_id: TargetId(0),
            tick: 0
        }]
    ));
    for _ in 0..49 {
        snap = engine.tick();
    }
    let target = &snap.targets[0];
    assert!((target.position.x - 1.0).abs() < 1e-9);
    assert!((target.position.z + 2.0).abs() < 1e-9);
}

#[test]
fn test_set_target_position_and_unknown_target() {
    let mut engine = engine(2);
    engine.queue_command(SimCommand::SpawnTarget {
        position: DVec3::ZERO,
        velocity: DVec3::ZERO,
    });
    engine.tick();

    engine.queue_command(SimCommand::SetTargetPosition {
        target_id: TargetId(0),
        position: DVec3::new(3.0, 4.0, 5.0),
    });
    engine.queue_command(SimCommand::SetTargetVelocity {
        target_id: TargetId(7),
        velocity: DVec3::X,
    });
    let snap = engine.tick();
    assert_eq!(snap.targets[0].position, DVec3::new(3.0, 4.0, 5.0));
    assert!(matches!(
        snap.events.as_slice(),
        [SimEvent::CommandRejected { .. }]
    ));
}

#[test]
fn test_removed_target_keeps_missile_homing() {
    let mut engine = single_engagement(
        9,
        DVec3::new(0.0, 0.0, 30.0),
        MissileLaunch::new(TargetId(0), DVec3::ZERO, DVec3::Z),
    );
    run_collecting(&mut engine, 20);

    engine.queue_command(SimCommand::RemoveTarget {
        target_id: TargetId(0),
    });
    let snap = engine.tick();
    assert!(snap.targets.is_empty());
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::TargetRemoved { .. })));

    let (_, snap) = run_collecting(&mut engine, 50);
    let missile = &snap.missiles[0];
    assert!(missile.distance_to_target.is_finite());
    assert!(missile.distance_to_target < 30.0);
}

// ---- Missiles ----

#[test]
fn test_launch_appears_in_snapshot() {
    let mut engine = single_engagement(
        3,
        DVec3::new(0.0, 0.0, 20.0),
        MissileLaunch::new(TargetId(0), DVec3::ZERO, DVec3::Z),
    );
    let snap = engine.tick();
    assert_eq!(snap.missiles.len(), 1);
    assert_eq!(snap.missiles[0].missile_id, MissileId(0));
    assert_eq!(snap.missiles[0].phase, DeadReckoningPhase::Seeking);
    assert!(snap.events.iter().any(|e| matches!(
        e,
        SimEvent::MissileLaunched {
            missile_id: MissileId(0),
            target_id: TargetId(0),
            ..
        }
    )));
}

#[test]
fn test_launch_at_unknown_target_rejected() {
    let mut engine = engine(4);
    engine.queue_command(SimCommand::LaunchMissile(MissileLaunch::new(
        TargetId(3),
        DVec3::ZERO,
        DVec3::Z,
    )));
    let snap = engine.tick();
    assert!(snap.missiles.is_empty());
    assert!(matches!(
        snap.events.as_slice(),
        [SimEvent::CommandRejected { .. }]
    ));
}

#[test]
fn test_start_dead_reckoning_command_is_one_shot() {
    let mut engine = single_engagement(
        6,
        DVec3::new(0.0, 0.0, 20.0),
        MissileLaunch::new(TargetId(0), DVec3::ZERO, DVec3::Z),
    );
    engine.tick();

    let missile_id = MissileId(0);
    engine.queue_command(SimCommand::StartDeadReckoning { missile_id });
    engine.queue_command(SimCommand::StartDeadReckoning { missile_id });
    let snap = engine.tick();
    assert!(matches!(
        snap.events.as_slice(),
        [
            SimEvent::DeadReckoningEngaged { .. },
            SimEvent::CommandRejected { .. }
        ]
    ));
    assert_eq!(snap.missiles[0].phase, DeadReckoningPhase::Locked);
    assert!(engine.missile(missile_id).unwrap().dead_reckoning.is_locked());

    // The goal stays frozen while the target is moved around.
    let goal = snap.missiles[0].goal_direction;
    engine.queue_command(SimCommand::SetTargetPosition {
        target_id: TargetId(0),
        position: DVec3::new(40.0, 0.0, 0.0),
    });
    for _ in 0..30 {
        let snap = engine.tick();
        assert_eq!(snap.missiles[0].goal_direction, goal);
    }
}

#[test]
fn test_scheduled_dead_reckoning_fires_once() {
    let mut engine = single_engagement(
        7,
        DVec3::new(0.0, 0.0, 50.0),
        MissileLaunch::new(TargetId(0), DVec3::ZERO, DVec3::Z).with_dead_reckoning_after(0.5),
    );
    let (events, snap) = run_collecting(&mut engine, 100);

    let engaged: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            SimEvent::DeadReckoningEngaged { tick, .. } => Some(*tick),
            _ => None,
        })
        .collect();
    assert_eq!(engaged.len(), 1, "expected exactly one lock: {events:?}");
    assert!((24..=27).contains(&engaged[0]), "locked at tick {}", engaged[0]);
    assert_eq!(snap.missiles[0].phase, DeadReckoningPhase::Locked);

    let remaining = engine.world().query::<&ScheduledDeadReckoning>().iter().count();
    assert_eq!(remaining, 0);
}

#[test]
fn test_lifetime_expiry_despawns_missile() {
    let mut engine = single_engagement(
        8,
        DVec3::new(0.0, 0.0, 50.0),
        MissileLaunch::new(TargetId(0), DVec3::ZERO, DVec3::Z).with_lifetime(1.0),
    );
    let (events, snap) = run_collecting(&mut engine, 80);
    let expired = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                SimEvent::MissileExpired {
                    missile_id: MissileId(0),
                    ..
                }
            )
        })
        .count();
    assert_eq!(expired, 1);
    assert!(snap.missiles.is_empty());
    assert!(engine.missile(MissileId(0)).is_none());
}

#[test]
fn test_destroy_missile() {
    let mut engine = single_engagement(
        10,
        DVec3::new(0.0, 0.0, 50.0),
        MissileLaunch::new(TargetId(0), DVec3::ZERO, DVec3::Z),
    );
    engine.tick();
    engine.queue_command(SimCommand::DestroyMissile {
        missile_id: MissileId(0),
    });
    engine.queue_command(SimCommand::DestroyMissile {
        missile_id: MissileId(0),
    });
    let snap = engine.tick();
    assert!(snap.missiles.is_empty());
    assert!(matches!(
        snap.events.as_slice(),
        [
            SimEvent::MissileDestroyed { .. },
            SimEvent::CommandRejected { .. }
        ]
    ));
}

#[test]
fn test_unrandomized_launch_keeps_stock_tuning() {
    let mut engine = single_engagement(
        12,
        DVec3::new(0.0, 0.0, 50.0),
        MissileLaunch::new(TargetId(0), DVec3::ZERO, DVec3::Z).without_randomization(),
    );
    engine.tick();
    let entity = crate::world_setup::find_missile(engine.world(), MissileId(0)).unwrap();
    let missile = engine
        .world()
        .get::<&vernier_guidance::missile::Missile>(entity)
        .unwrap();
    assert_eq!(missile.airframe(), &vernier_core::types::Airframe::default());
    assert_eq!(missile.config().dead_reckoning.activation_range, 1.0);
}

#[test]
fn test_velocity_never_exceeds_cap_in_salvo() {
    let mut engine = Scenario::builtin("salvo").unwrap().into_engine(None).unwrap();
    for _ in 0..600 {
        let snap = engine.tick();
        for missile in &snap.missiles {
            let cap = match missile.phase {
                DeadReckoningPhase::Seeking => 4.0,
                DeadReckoningPhase::Locked => 10.0,
            };
            assert!(missile.linear_velocity.length() <= cap + 1e-9);
            assert!(missile.angular_velocity.length() <= 5.0 + 1e-9);
        }
    }
}

// ---- Scenarios ----

#[test]
fn test_scenario_from_json() {
    let json = r#"{
        "name": "json",
        "seed": 5,
        "guidance": {"terminal_velocity": {"normal": 3.0}},
        "targets": [{"position": [0, 0, 12]}],
        "launches": [{
            "at_secs": 0.2,
            "launch": {
                "target_id": 0,
                "state": {
                    "position": [0, 0, 0], "orientation": [0, 0, 0, 1],
                    "linear_velocity": [0, 0, 1], "angular_velocity": [0, 0, 0]
                },
                "lifetime_secs": 10.0
            }
        }]
    }"#;
    let scenario = Scenario::from_json(json).unwrap();
    assert_eq!(scenario.tick_rate, 50);
    assert_eq!(scenario.guidance.terminal_velocity.normal, 3.0);
    assert_eq!(scenario.guidance.terminal_velocity.dead_reckoning, 10.0);

    let mut engine = scenario.into_engine(None).unwrap();
    assert_eq!(engine.seed(), 5);
    let (events, _) = run_collecting(&mut engine, 15);
    let launched_at = events.iter().find_map(|e| match e {
        SimEvent::MissileLaunched { tick, .. } => Some(*tick),
        _ => None,
    });
    assert_eq!(launched_at, Some(10));
}

#[test]
fn test_scenario_json_rejects_bad_airframe() {
    let json = r#"{"airframe": {"mass": {"mass": 0.0, "moment_of_inertia": [1, 1, 1]}}}"#;
    assert!(matches!(
        Scenario::from_json(json),
        Err(SimError::Scenario(_))
    ));
}
