//! Configuration management for the path planner
//!
//! Field names serialize to the labels used by the host's settings panel
//! ("Inertia Start", "c-1", ...), so a settings file written by the host
//! deserializes directly into [`PlannerConfig`].

use crate::pso::{SwarmOptions, MAX_PARTICLES};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Planner configuration block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Inertia weight at epoch 0
    #[serde(rename = "Inertia Start")]
    pub inertia_start: f32,
    /// Inertia weight at the final epoch
    #[serde(rename = "Inertia End")]
    pub inertia_end: f32,
    /// Cognitive coefficient (attraction to personal best)
    #[serde(rename = "c-1")]
    pub c1: f32,
    /// Social coefficient (attraction to global best)
    #[serde(rename = "c-2")]
    pub c2: f32,
    /// Radius of the initial particle scatter around the robot
    #[serde(rename = "Particle Spawn Density")]
    pub particle_spawn_density: f32,
    /// Swarm size
    #[serde(rename = "Particle Count")]
    pub particle_count: usize,
    /// Upper bound on the initial particle velocity magnitude
    #[serde(rename = "Max Initial Particle Speed")]
    pub max_initial_particle_speed: f32,
    /// Hard convergence cap
    #[serde(rename = "Max Epoch")]
    pub max_epoch: u32,
    /// Arrival tolerance against the true target
    #[serde(rename = "Target Distance Threshold")]
    pub target_distance_threshold: f32,
    /// Robot travel speed (units per millisecond)
    #[serde(rename = "Robot Speed")]
    pub robot_speed: f32,
    /// Sensing radius for fitness evaluation and obstacle filtering
    #[serde(rename = "Vision Radius")]
    pub vision_radius: f32,
    /// Scale applied to the wall-clock delta before stepping the swarm
    #[serde(rename = "Simulation Speed")]
    pub simulation_speed: f32,
}

impl PlannerConfig {
    /// Settings tuned for an open field without obstacles
    pub fn open_field() -> Self {
        Self {
            inertia_start: 1.0,
            inertia_end: 0.99,
            c1: 1.05,
            c2: 0.05,
            particle_spawn_density: 150.0,
            particle_count: 20,
            max_initial_particle_speed: 2.0,
            max_epoch: 1000,
            target_distance_threshold: 5.0,
            robot_speed: 0.15,
            vision_radius: 200.0,
            simulation_speed: 0.0001,
        }
    }

    /// Settings tuned for a field with a single large obstacle
    ///
    /// A larger swarm with a stronger social pull and a shorter sensing
    /// range, so the robot commits to shorter hops around the hazard.
    pub fn single_obstacle() -> Self {
        Self {
            c2: 0.07,
            particle_count: 50,
            vision_radius: 150.0,
            ..Self::open_field()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.particle_count == 0 || self.particle_count > MAX_PARTICLES {
            return Err(PlannerError::InvalidConfiguration);
        }
        if self.max_epoch == 0 {
            return Err(PlannerError::InvalidConfiguration);
        }
        if !(self.vision_radius > 0.0 && self.vision_radius.is_finite()) {
            return Err(PlannerError::InvalidConfiguration);
        }
        if !(self.robot_speed > 0.0 && self.robot_speed.is_finite()) {
            return Err(PlannerError::InvalidConfiguration);
        }
        if !(self.target_distance_threshold > 0.0) {
            return Err(PlannerError::InvalidConfiguration);
        }
        if !(self.simulation_speed > 0.0 && self.simulation_speed.is_finite()) {
            return Err(PlannerError::InvalidConfiguration);
        }
        if !(self.particle_spawn_density >= 0.0 && self.particle_spawn_density.is_finite()) {
            return Err(PlannerError::InvalidConfiguration);
        }
        if !(self.max_initial_particle_speed >= 0.0
            && self.max_initial_particle_speed.is_finite())
        {
            return Err(PlannerError::InvalidConfiguration);
        }
        let coefficients = [self.inertia_start, self.inertia_end, self.c1, self.c2];
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(PlannerError::InvalidConfiguration);
        }
        Ok(())
    }

    /// Snapshot of the PSO hyperparameters
    pub fn swarm_options(&self) -> SwarmOptions {
        SwarmOptions {
            inertia_start: self.inertia_start,
            inertia_end: self.inertia_end,
            c1: self.c1,
            c2: self.c2,
            max_epoch: self.max_epoch,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::open_field()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(PlannerConfig::open_field().validate().is_ok());
        assert!(PlannerConfig::single_obstacle().validate().is_ok());
    }

    #[test]
    fn test_single_obstacle_overrides() {
        let config = PlannerConfig::single_obstacle();
        assert_eq!(config.c2, 0.07);
        assert_eq!(config.particle_count, 50);
        assert_eq!(config.vision_radius, 150.0);
        assert_eq!(config.max_epoch, 1000);
    }

    #[test]
    fn test_swarm_options_snapshot() {
        let config = PlannerConfig::default();
        let options = config.swarm_options();
        assert_eq!(options.inertia_start, 1.0);
        assert_eq!(options.inertia_end, 0.99);
        assert_eq!(options.c1, 1.05);
        assert_eq!(options.c2, 0.05);
        assert_eq!(options.max_epoch, 1000);
    }
}
