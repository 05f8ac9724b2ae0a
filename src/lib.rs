//! # Swarm Pathfinder
//!
//! Incremental path planning for a single robot using a vision-limited
//! particle swarm optimizer.
//!
//! ## Features
//! - Global-best PSO with linearly decaying inertia and time-scaled steps
//! - Fitness functions restricted to the robot's sensing circle, with
//!   optional circular obstacle avoidance
//! - Searching / moving / reached phase controller that assembles the path
//! - Injectable, seedable random source for reproducible runs
//! - Render-facing snapshots for an external drawing loop
//!
//! ## Resource Model
//! - Fixed-capacity buffers (heapless) for particles and obstacles; only the
//!   travelled path lives on the heap (`alloc`)
//! - `no_std` compatible with `default-features = false`
//! - Single-threaded, tick-driven; the host supplies elapsed time

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]

extern crate alloc;

/// Planner configuration block and presets
pub mod config;
/// Robot motion and static obstacles
pub mod control;
/// Cost functions minimized by the swarm
pub mod fitness;
/// Searching / moving / reached state machine
pub mod planner;
/// Particle Swarm Optimization engine
pub mod pso;
/// Seedable random sources
pub mod rng;
/// Core types (Point2D, Bounds, PlannerError)
pub mod types;

pub use config::PlannerConfig;
pub use control::{ObstacleModel, RobotModel};
pub use fitness::{Fitness, FitnessFunction};
pub use planner::{PhaseController, PlannerSnapshot, RobotPhase, Scenario};
pub use pso::{Particle, Swarm, SwarmOptions};
pub use types::*;
