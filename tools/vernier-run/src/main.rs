//! vernier-run: headless scenario runner.
//!
//! Usage:
//!   vernier-run --scenario head-on --ticks 500
//!   vernier-run --scenario scenarios/custom.json --seed 7 --summary

use std::process;

use vernier_core::enums::DeadReckoningPhase;
use vernier_core::events::SimEvent;
use vernier_core::state::SimSnapshot;
use vernier_sim::scenario::{Scenario, BUILTIN_SCENARIOS};
use vernier_sim::SimulationEngine;

const DEFAULT_TICKS: u64 = 1500;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "help" || a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let scenario_arg = parse_flag(&args, "--scenario").unwrap_or("head-on");
    let scenario = match load_scenario(scenario_arg) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading scenario {scenario_arg}: {e}");
            process::exit(1);
        }
    };

    let ticks = match parse_flag(&args, "--ticks").map(str::parse::<u64>) {
        None => DEFAULT_TICKS,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            eprintln!("Error: --ticks expects a number: {e}");
            process::exit(1);
        }
    };

    let seed = match parse_flag(&args, "--seed").map(str::parse::<u64>) {
        None => None,
        Some(Ok(n)) => Some(n),
        Some(Err(e)) => {
            eprintln!("Error: --seed expects a number: {e}");
            process::exit(1);
        }
    };

    let summary = args.iter().any(|a| a == "--summary");

    log::info!("running scenario '{}' for {ticks} ticks", scenario.name);
    let mut engine = match scenario.into_engine(seed) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error building engine: {e}");
            process::exit(1);
        }
    };

    if summary {
        print_summary(&mut engine, ticks);
    } else {
        stream_snapshots(&mut engine, ticks);
    }
}

fn print_usage() {
    eprintln!(
        "vernier-run: thruster-vectored missile guidance simulator\n\
         \n\
         Options:\n\
         \n\
           --scenario <name|path> Built-in scenario name or JSON file (default: head-on)\n\
           --ticks <N>            Number of ticks to run (default: {DEFAULT_TICKS})\n\
           --seed <N>             Override the scenario seed\n\
           --summary              Print a run summary instead of per-tick JSON lines\n\
         \n\
         Built-in scenarios: {}\n\
         \n\
         Logging follows RUST_LOG (default: info).\n",
        BUILTIN_SCENARIOS.join(", ")
    );
}

fn parse_flag<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn load_scenario(arg: &str) -> Result<Scenario, vernier_sim::SimError> {
    match Scenario::builtin(arg) {
        Some(scenario) => Ok(scenario),
        None => Scenario::load(arg),
    }
}

/// One JSON snapshot per line on stdout.
fn stream_snapshots(engine: &mut SimulationEngine, ticks: u64) {
    for _ in 0..ticks {
        let snapshot = engine.tick();
        match serde_json::to_string(&snapshot) {
            Ok(line) => println!("{line}"),
            Err(e) => {
                eprintln!("Error serializing snapshot: {e}");
                process::exit(1);
            }
        }
    }
}

fn print_summary(engine: &mut SimulationEngine, ticks: u64) {
    let mut launched = 0usize;
    let mut locked = 0usize;
    let mut expired = 0usize;
    let mut rejected = 0usize;
    let mut closest: Vec<(u64, f64)> = Vec::new();
    let mut last = SimSnapshot::default();

    for _ in 0..ticks {
        last = engine.tick();
        for event in &last.events {
            match event {
                SimEvent::MissileLaunched { .. } => launched += 1,
                SimEvent::DeadReckoningEngaged { .. } => locked += 1,
                SimEvent::MissileExpired { .. } => expired += 1,
                SimEvent::CommandRejected { reason, .. } => {
                    rejected += 1;
                    eprintln!("rejected: {reason}");
                }
                _ => {}
            }
        }
        for missile in &last.missiles {
            let id = missile.missile_id.0;
            match closest.iter_mut().find(|(m, _)| *m == id) {
                Some((_, d)) => *d = d.min(missile.distance_to_target),
                None => closest.push((id, missile.distance_to_target)),
            }
        }
    }

    println!(
        "Ran {} ticks ({:.2} s), seed {}",
        last.time.tick,
        last.time.elapsed_secs,
        engine.seed()
    );
    println!("Launched: {launched}  Locked: {locked}  Expired: {expired}  Rejected: {rejected}");
    closest.sort_by_key(|(id, _)| *id);
    for (id, distance) in closest {
        println!("  missile {id}: closest approach {distance:.3} m");
    }
    for missile in &last.missiles {
        let phase = match missile.phase {
            DeadReckoningPhase::Seeking => "seeking",
            DeadReckoningPhase::Locked => "locked",
        };
        println!(
            "  missile {} in flight: {phase}, {:.3} m to go, speed {:.2} m/s",
            missile.missile_id.0,
            missile.distance_to_target,
            missile.linear_velocity.length()
        );
    }
}
