//! Incremental path planning state machine
//!
//! The controller alternates between two activities until the robot is
//! close enough to the goal:
//! - **searching**: a fresh swarm is spawned at the robot and stepped one
//!   epoch per tick; once converged its global best becomes the next local
//!   target and is appended to the path
//! - **moving**: the robot drives straight to the local target
//!
//! On arrival the remaining distance to the goal decides between another
//! search and the terminal **reached** phase.
//!
//! # Example
//! ```ignore
//! use swarm_pathfinder::planner::{PhaseController, Scenario};
//! use swarm_pathfinder::PlannerConfig;
//!
//! let mut planner = PhaseController::with_seed(
//!     PlannerConfig::open_field(),
//!     Scenario::open_field(1000.0, 800.0),
//!     42,
//! )?;
//! while !planner.is_reached() {
//!     planner.tick(16.0)?;
//! }
//! ```

use crate::config::PlannerConfig;
use crate::control::{ObstacleModel, RobotModel, MAX_OBSTACLES};
use crate::fitness::FitnessFunction;
use crate::pso::{Swarm, MAX_PARTICLES};
use crate::rng::{self, SimRng};
use crate::types::*;
use core::fmt;
use core::str::FromStr;
use heapless::Vec;
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

/// Travelled path, start first. Grows by one waypoint per search episode
/// and has no fixed capacity.
pub type Path = alloc::vec::Vec<Point2D>;

/// Robot phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotPhase {
    /// Optimizing the next local target
    Searching,
    /// Driving to the committed local target
    Moving,
    /// Goal reached, nothing left to do
    Reached,
}

impl RobotPhase {
    /// Lowercase phase name
    pub const fn as_str(&self) -> &'static str {
        match self {
            RobotPhase::Searching => "searching",
            RobotPhase::Moving => "moving",
            RobotPhase::Reached => "reached",
        }
    }
}

impl fmt::Display for RobotPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RobotPhase {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "searching" => Ok(RobotPhase::Searching),
            "moving" => Ok(RobotPhase::Moving),
            "reached" => Ok(RobotPhase::Reached),
            _ => Err(PlannerError::InvalidPhase),
        }
    }
}

impl TryFrom<u8> for RobotPhase {
    type Error = PlannerError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(RobotPhase::Searching),
            1 => Ok(RobotPhase::Moving),
            2 => Ok(RobotPhase::Reached),
            _ => Err(PlannerError::InvalidPhase),
        }
    }
}

/// Field layout for a planning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Field rectangle
    pub bounds: Bounds,
    /// Robot start position (first path waypoint)
    pub start: Point2D,
    /// The goal
    pub target: Point2D,
    /// Static obstacles
    pub obstacles: Vec<ObstacleModel, MAX_OBSTACLES>,
    /// Use the obstacle-avoiding fitness function
    pub avoid_obstacles: bool,
}

impl Scenario {
    /// Empty field without obstacle avoidance
    pub fn new(bounds: Bounds, start: Point2D, target: Point2D) -> Self {
        Self {
            bounds,
            start,
            target,
            obstacles: Vec::new(),
            avoid_obstacles: false,
        }
    }

    /// Start 100 units in from the top-left corner, goal 100 units in from
    /// the bottom-right corner
    pub fn open_field(width: f32, height: f32) -> Self {
        Self::new(
            Bounds::from_canvas(width, height),
            Point2D::new(100.0, 100.0),
            Point2D::new(width - 100.0, height - 100.0),
        )
    }

    /// Open field with one obstacle of radius 100 at the field midpoint
    pub fn single_obstacle(width: f32, height: f32) -> Self {
        let midpoint = Point2D::new(width / 2.0, height / 2.0);
        Self {
            obstacles: [ObstacleModel::new(midpoint, 100.0)].into_iter().collect(),
            avoid_obstacles: true,
            ..Self::open_field(width, height)
        }
    }

    /// Add an obstacle and enable obstacle avoidance
    pub fn add_obstacle(&mut self, obstacle: ObstacleModel) -> Result<()> {
        self.obstacles
            .push(obstacle)
            .map_err(|_| PlannerError::CapacityExceeded)?;
        self.avoid_obstacles = true;
        Ok(())
    }

    /// Obstacles intersecting the sensing circle at `center`
    pub fn obstacles_in_view(
        &self,
        center: Point2D,
        radius: f32,
    ) -> Vec<ObstacleModel, MAX_OBSTACLES> {
        self.obstacles
            .iter()
            .filter(|obstacle| obstacle.is_in_view(center, radius))
            .copied()
            .collect()
    }

    fn validate(&self) -> Result<()> {
        if !self.bounds.is_valid() || !self.start.is_finite() || !self.target.is_finite() {
            return Err(PlannerError::InvalidConfiguration);
        }
        Ok(())
    }
}

/// Render-facing view of one particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleView {
    /// Particle position
    pub position: Point2D,
    /// Position lies outside the field
    pub out_of_bounds: bool,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannerSnapshot {
    /// Current phase
    pub phase: RobotPhase,
    /// Robot position
    pub robot: Point2D,
    /// The goal
    pub target: Point2D,
    /// Travelled path
    pub path: Path,
    /// Static obstacles
    pub obstacles: Vec<ObstacleModel, MAX_OBSTACLES>,
    /// Live particles while searching
    pub particles: Vec<ParticleView, MAX_PARTICLES>,
    /// Swarm best fitness while searching
    pub best_fitness: Option<f32>,
    /// Swarm epoch while searching
    pub epoch: Option<u32>,
    /// Configured epoch cap
    pub max_epoch: u32,
    /// Sensing circle (robot position, vision radius) while searching
    pub sensing_circle: Option<(Point2D, f32)>,
}

/// Searching / moving / reached controller
pub struct PhaseController {
    config: PlannerConfig,
    scenario: Scenario,
    robot: RobotModel,
    phase: RobotPhase,
    swarm: Option<Swarm<FitnessFunction>>,
    local_target: Option<Point2D>,
    path: Path,
    rng: SimRng,
}

impl PhaseController {
    /// Create a controller; the robot starts at `scenario.start` in
    /// [`RobotPhase::Searching`]
    pub fn new(config: PlannerConfig, scenario: Scenario, rng: SimRng) -> Result<Self> {
        config.validate()?;
        scenario.validate()?;

        Ok(Self {
            robot: RobotModel::new(scenario.start, config.robot_speed),
            path: alloc::vec![scenario.start],
            config,
            scenario,
            phase: RobotPhase::Searching,
            swarm: None,
            local_target: None,
            rng,
        })
    }

    /// Reproducible controller
    pub fn with_seed(config: PlannerConfig, scenario: Scenario, seed: u64) -> Result<Self> {
        Self::new(config, scenario, rng::seeded(seed))
    }

    /// Controller seeded from operating system entropy
    #[cfg(feature = "std")]
    pub fn from_entropy(config: PlannerConfig, scenario: Scenario) -> Result<Self> {
        Self::new(config, scenario, rng::from_entropy())
    }

    /// Advance the simulation by one tick of `dt_ms` wall-clock milliseconds.
    ///
    /// The swarm is stepped with `dt_ms * simulation_speed`; the robot moves
    /// with the unscaled `dt_ms` since its speed is in units per millisecond.
    /// Errors leave the controller in its last valid state.
    pub fn tick(&mut self, dt_ms: f32) -> Result<RobotPhase> {
        let outcome = match self.phase {
            RobotPhase::Searching => self.tick_searching(dt_ms),
            RobotPhase::Moving => self.tick_moving(dt_ms),
            RobotPhase::Reached => {
                self.swarm = None;
                Ok(())
            }
        };

        if let Err(err) = outcome {
            error!("Planner tick failed in phase {}: {}", self.phase, err);
            return Err(err);
        }
        Ok(self.phase)
    }

    fn tick_searching(&mut self, dt_ms: f32) -> Result<()> {
        if self.swarm.is_none() {
            self.swarm = Some(self.spawn_swarm()?);
            return Ok(());
        }

        if let Some(swarm) = self.swarm.as_mut() {
            if !swarm.has_reached_optima() {
                return swarm.next_epoch(dt_ms * self.config.simulation_speed);
            }
        }

        if let Some(swarm) = self.swarm.take() {
            let local_target = swarm.global_best_position();
            self.path.push(local_target);
            self.local_target = Some(local_target);
            self.phase = RobotPhase::Moving;
            debug!(
                "Local target {} committed (fitness {:.3}), path has {} waypoints",
                local_target,
                swarm.global_best_fitness(),
                self.path.len()
            );
        }
        Ok(())
    }

    fn tick_moving(&mut self, dt_ms: f32) -> Result<()> {
        let local_target = self.local_target.ok_or(PlannerError::InvalidPhase)?;

        if self.robot.move_to(local_target, dt_ms) {
            let remaining = self.robot.position().distance_to(&self.scenario.target);
            if remaining < self.config.target_distance_threshold {
                self.phase = RobotPhase::Reached;
                debug!(
                    "Target reached at {} ({:.3} from goal) after {} waypoints",
                    self.robot.position(),
                    remaining,
                    self.path.len()
                );
            } else {
                self.phase = RobotPhase::Searching;
                self.swarm = None;
                debug!("Arrived at {}, {:.3} from goal, searching again", local_target, remaining);
            }
        }
        Ok(())
    }

    fn spawn_swarm(&mut self) -> Result<Swarm<FitnessFunction>> {
        let origin = self.robot.position();
        let vision = self.config.vision_radius;
        let target = self.scenario.target;
        let b = self.scenario.bounds;

        let fitness = if self.scenario.avoid_obstacles {
            let in_view = self.scenario.obstacles_in_view(origin, vision);
            debug!(
                "Searching from {} with {}/{} obstacles in view",
                origin,
                in_view.len(),
                self.scenario.obstacles.len()
            );
            FitnessFunction::distance_from_target_within_vision_avoid_obstacles(
                origin, vision, target, &in_view, b.min_x, b.max_x, b.min_y, b.max_y,
            )?
        } else {
            debug!("Searching from {}", origin);
            FitnessFunction::distance_from_target_within_vision(
                origin, vision, target, b.min_x, b.max_x, b.min_y, b.max_y,
            )
        };

        Swarm::new(
            self.config.particle_count,
            self.config.particle_spawn_density,
            origin,
            self.config.max_initial_particle_speed,
            fitness,
            self.config.swarm_options(),
            rng::fork(&mut self.rng),
        )
    }

    /// Force the controller into `phase`, dropping any live swarm.
    ///
    /// Used by hosts that persist or override the phase; an inconsistent
    /// choice (moving without a local target) surfaces on the next tick as
    /// [`PlannerError::InvalidPhase`].
    pub fn set_phase(&mut self, phase: RobotPhase) {
        if phase != self.phase {
            warn!("Phase overridden: {} -> {}", self.phase, phase);
        }
        self.swarm = None;
        self.phase = phase;
    }

    /// [`PhaseController::set_phase`] from a phase name; unknown names are
    /// rejected and the current phase is kept
    pub fn set_phase_named(&mut self, name: &str) -> Result<()> {
        match name.parse::<RobotPhase>() {
            Ok(phase) => {
                self.set_phase(phase);
                Ok(())
            }
            Err(err) => {
                error!("Invalid robot phase {:?}, staying in {}", name, self.phase);
                Err(err)
            }
        }
    }

    /// Restart the run from the scenario start; obstacles and config are kept
    pub fn reset(&mut self) {
        self.path.clear();
        self.path.push(self.scenario.start);
        self.robot = RobotModel::new(self.scenario.start, self.config.robot_speed);
        self.phase = RobotPhase::Searching;
        self.swarm = None;
        self.local_target = None;
    }

    /// Tick with a fixed `dt_ms` until reached or `max_ticks` elapse.
    ///
    /// Returns whether the goal was reached.
    pub fn run_until_reached(&mut self, dt_ms: f32, max_ticks: usize) -> Result<bool> {
        for _ in 0..max_ticks {
            if self.tick(dt_ms)? == RobotPhase::Reached {
                return Ok(true);
            }
        }
        Ok(self.is_reached())
    }

    /// Current phase
    pub fn phase(&self) -> RobotPhase {
        self.phase
    }

    /// True in the terminal phase
    pub fn is_reached(&self) -> bool {
        self.phase == RobotPhase::Reached
    }

    /// The robot
    pub fn robot(&self) -> &RobotModel {
        &self.robot
    }

    /// The goal
    pub fn target(&self) -> Point2D {
        self.scenario.target
    }

    /// Travelled path, start first
    pub fn path(&self) -> &[Point2D] {
        &self.path
    }

    /// Static obstacles
    pub fn obstacles(&self) -> &[ObstacleModel] {
        &self.scenario.obstacles
    }

    /// Live swarm, only while searching
    pub fn swarm(&self) -> Option<&Swarm<FitnessFunction>> {
        self.swarm.as_ref()
    }

    /// Local target currently being driven to
    pub fn local_target(&self) -> Option<Point2D> {
        self.local_target
    }

    /// Active configuration
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Field layout
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Render-facing snapshot of the current frame
    pub fn snapshot(&self) -> PlannerSnapshot {
        let particles = self
            .swarm
            .iter()
            .flat_map(|swarm| swarm.particles())
            .map(|p| ParticleView {
                position: p.position,
                out_of_bounds: p.out_of_bounds,
            })
            .collect();

        PlannerSnapshot {
            phase: self.phase,
            robot: self.robot.position(),
            target: self.scenario.target,
            path: self.path.clone(),
            obstacles: self.scenario.obstacles.clone(),
            particles,
            best_fitness: self.swarm.as_ref().map(|s| s.global_best_fitness()),
            epoch: self.swarm.as_ref().map(|s| s.current_epoch()),
            max_epoch: self.config.max_epoch,
            sensing_circle: (self.phase == RobotPhase::Searching)
                .then(|| (self.robot.position(), self.config.vision_radius)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> PlannerConfig {
        PlannerConfig {
            max_epoch: 20,
            ..PlannerConfig::open_field()
        }
    }

    fn quick_planner(seed: u64) -> PhaseController {
        PhaseController::with_seed(quick_config(), Scenario::open_field(1000.0, 800.0), seed)
            .unwrap()
    }

    #[test]
    fn test_phase_names() {
        assert_eq!("searching".parse::<RobotPhase>(), Ok(RobotPhase::Searching));
        assert_eq!("moving".parse::<RobotPhase>(), Ok(RobotPhase::Moving));
        assert_eq!("reached".parse::<RobotPhase>(), Ok(RobotPhase::Reached));
        assert_eq!("hovering".parse::<RobotPhase>(), Err(PlannerError::InvalidPhase));
        assert_eq!(RobotPhase::try_from(3u8), Err(PlannerError::InvalidPhase));
        assert_eq!(RobotPhase::Moving.to_string(), "moving");
    }

    #[test]
    fn test_initial_state() {
        let planner = quick_planner(1);

        assert_eq!(planner.phase(), RobotPhase::Searching);
        assert_eq!(planner.path(), &[Point2D::new(100.0, 100.0)]);
        assert_eq!(planner.robot().position(), Point2D::new(100.0, 100.0));
        assert!(planner.swarm().is_none());
    }

    #[test]
    fn test_swarm_spawned_lazily_then_stepped() {
        let mut planner = quick_planner(2);

        planner.tick(16.0).unwrap();
        assert_eq!(planner.swarm().map(|s| s.current_epoch()), Some(0));

        planner.tick(16.0).unwrap();
        assert_eq!(planner.swarm().map(|s| s.current_epoch()), Some(1));
    }

    #[test]
    fn test_commit_after_convergence() {
        let mut planner = quick_planner(3);

        // Spawn, 20 epochs, then the commit tick
        for _ in 0..21 {
            assert_eq!(planner.tick(16.0).unwrap(), RobotPhase::Searching);
        }
        let best = planner.swarm().map(|s| s.global_best_position()).unwrap();

        assert_eq!(planner.tick(16.0).unwrap(), RobotPhase::Moving);
        assert!(planner.swarm().is_none());
        assert_eq!(planner.local_target(), Some(best));
        assert_eq!(planner.path().len(), 2);
        assert_eq!(planner.path()[1], best);
    }

    #[test]
    fn test_moving_without_local_target_is_invalid() {
        let mut planner = quick_planner(4);

        planner.set_phase(RobotPhase::Moving);
        assert_eq!(planner.tick(16.0), Err(PlannerError::InvalidPhase));
        assert_eq!(planner.phase(), RobotPhase::Moving);

        planner.set_phase(RobotPhase::Searching);
        assert!(planner.tick(16.0).is_ok());
    }

    #[test]
    fn test_unknown_phase_name_keeps_state() {
        let mut planner = quick_planner(5);

        assert_eq!(planner.set_phase_named("flying"), Err(PlannerError::InvalidPhase));
        assert_eq!(planner.phase(), RobotPhase::Searching);
        assert!(planner.set_phase_named("reached").is_ok());
        assert!(planner.is_reached());
    }

    #[test]
    fn test_reached_is_terminal() {
        let mut planner = quick_planner(6);
        planner.set_phase(RobotPhase::Reached);

        let before = planner.robot().position();
        for _ in 0..10 {
            assert_eq!(planner.tick(16.0).unwrap(), RobotPhase::Reached);
        }
        assert_eq!(planner.robot().position(), before);
        assert_eq!(planner.path().len(), 1);
        assert!(planner.swarm().is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PlannerConfig {
            particle_count: 0,
            ..PlannerConfig::open_field()
        };
        assert_eq!(
            PhaseController::with_seed(config, Scenario::open_field(1000.0, 800.0), 1).err(),
            Some(PlannerError::InvalidConfiguration)
        );
    }

    #[test]
    fn test_snapshot_while_searching() {
        let mut planner =
            PhaseController::with_seed(quick_config(), Scenario::single_obstacle(1000.0, 800.0), 7)
                .unwrap();
        planner.tick(16.0).unwrap();

        let snapshot = planner.snapshot();
        assert_eq!(snapshot.phase, RobotPhase::Searching);
        assert_eq!(snapshot.particles.len(), 20);
        assert_eq!(snapshot.epoch, Some(0));
        assert_eq!(snapshot.max_epoch, 20);
        assert_eq!(snapshot.obstacles.len(), 1);
        assert_eq!(snapshot.sensing_circle, Some((Point2D::new(100.0, 100.0), 200.0)));
        assert!(snapshot.best_fitness.is_some());
    }

    #[test]
    fn test_reset_restores_start() {
        let mut planner = quick_planner(8);
        for _ in 0..200 {
            planner.tick(16.0).unwrap();
        }
        assert!(planner.path().len() >= 2);

        planner.reset();
        assert_eq!(planner.phase(), RobotPhase::Searching);
        assert_eq!(planner.path(), &[Point2D::new(100.0, 100.0)]);
        assert_eq!(planner.robot().position(), Point2D::new(100.0, 100.0));
        assert!(planner.local_target().is_none());
    }

    #[test]
    fn test_in_view_filtering() {
        let scenario = Scenario::single_obstacle(1000.0, 800.0);
        assert!(scenario.obstacles_in_view(Point2D::new(100.0, 100.0), 200.0).is_empty());
        assert_eq!(scenario.obstacles_in_view(Point2D::new(350.0, 300.0), 200.0).len(), 1);
    }
}
