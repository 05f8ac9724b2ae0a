//! Headless path planning demo
//!
//! Runs both preset scenarios with a fixed frame time, the way a render
//! loop would drive the planner, and prints the resulting paths.

use swarm_pathfinder::*;

const CANVAS_WIDTH: f32 = 1000.0;
const CANVAS_HEIGHT: f32 = 800.0;
const FRAME_MS: f32 = 16.0;
const MAX_TICKS: usize = 2_000_000;

fn main() -> Result<()> {
    println!("=== Swarm Pathfinder Demo ===\n");

    println!("1. Open field");
    run_scenario(
        PlannerConfig::open_field(),
        Scenario::open_field(CANVAS_WIDTH, CANVAS_HEIGHT),
        2024,
    )?;

    println!("\n2. Single obstacle");
    run_scenario(
        PlannerConfig::single_obstacle(),
        Scenario::single_obstacle(CANVAS_WIDTH, CANVAS_HEIGHT),
        77,
    )?;

    println!("\n=== Demo complete ===");
    Ok(())
}

fn run_scenario(config: PlannerConfig, scenario: Scenario, seed: u64) -> Result<()> {
    println!("  Start:  {}", scenario.start);
    println!("  Target: {}", scenario.target);
    for obstacle in scenario.obstacles.iter() {
        println!("  Obstacle at {} (r = {:.0})", obstacle.center(), obstacle.radius());
    }

    let mut planner = PhaseController::with_seed(config, scenario, seed)?;

    let mut ticks = 0;
    while !planner.is_reached() && ticks < MAX_TICKS {
        planner.tick(FRAME_MS)?;
        ticks += 1;
    }

    if planner.is_reached() {
        println!("  ✓ Reached target after {} ticks", ticks);
    } else {
        println!("  ✗ Gave up after {} ticks", ticks);
    }

    println!("  Waypoints: {}", planner.path().len());
    for (i, waypoint) in planner.path().iter().enumerate() {
        println!("    {:>3}: {}", i, waypoint);
    }

    let snapshot = planner.snapshot();
    match serde_json::to_string(&snapshot) {
        Ok(json) => println!("  Final snapshot: {} bytes of JSON", json.len()),
        Err(e) => println!("  Snapshot serialization failed: {}", e),
    }

    Ok(())
}
