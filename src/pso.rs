//! Particle Swarm Optimization for local target search
//!
//! Global-best PSO (star topology) over the 2D field:
//! - Particles spawn in a disk around the robot
//! - Linearly decaying inertia weight
//! - Time-scaled position update (`x += v * dt`) so stepping is frame-rate
//!   independent
//! - Hard stop after `max_epoch` epochs, no early-stopping tolerance
//!
//! A swarm lives for exactly one searching episode. It is built at the
//! robot's position, stepped until [`Swarm::has_reached_optima`], and then
//! dropped; nothing carries over to the next episode.

use crate::fitness::Fitness;
use crate::rng::{self, SimRng};
use crate::types::*;
use heapless::Vec;
use log::{debug, error, trace};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Maximum number of particles in swarm
pub const MAX_PARTICLES: usize = 128;

/// Particle in PSO swarm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Current position
    pub position: Point2D,
    /// Current velocity (units per simulated time unit)
    pub velocity: Point2D,
    /// Personal best position
    pub pbest_position: Point2D,
    /// Personal best fitness
    pub pbest_fitness: f32,
    /// Fitness at the current position
    pub fitness: f32,
    /// Current position lies outside the field rectangle
    pub out_of_bounds: bool,
}

/// PSO hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwarmOptions {
    /// Inertia weight at epoch 0
    pub inertia_start: f32,
    /// Inertia weight at `max_epoch`
    pub inertia_end: f32,
    /// Cognitive parameter (c1) - attraction to personal best
    pub c1: f32,
    /// Social parameter (c2) - attraction to global best
    pub c2: f32,
    /// Number of epochs before the swarm is considered converged
    pub max_epoch: u32,
}

impl SwarmOptions {
    /// Inertia weight for `epoch`, interpolated and clamped at `max_epoch`
    pub fn inertia_at(&self, epoch: u32) -> f32 {
        let t = epoch.min(self.max_epoch) as f32 / self.max_epoch.max(1) as f32;
        self.inertia_start + (self.inertia_end - self.inertia_start) * t
    }
}

/// Global-best PSO engine for one searching episode
pub struct Swarm<F: Fitness, R: RngCore = SimRng> {
    particles: Vec<Particle, MAX_PARTICLES>,
    gbest_position: Point2D,
    gbest_fitness: f32,
    current_epoch: u32,
    options: SwarmOptions,
    fitness: F,
    has_reached_optima: bool,
    rng: R,
}

impl<F: Fitness, R: RngCore> Swarm<F, R> {
    /// Scatter `particle_count` particles around `origin` and evaluate them.
    ///
    /// Positions are uniform over the disk of radius `spawn_density`;
    /// velocities have a uniform random direction and a magnitude of at most
    /// `max_initial_speed`.
    pub fn new(
        particle_count: usize,
        spawn_density: f32,
        origin: Point2D,
        max_initial_speed: f32,
        fitness: F,
        options: SwarmOptions,
        mut rng: R,
    ) -> Result<Self> {
        if particle_count == 0 || options.max_epoch == 0 {
            return Err(PlannerError::InvalidConfiguration);
        }
        if particle_count > MAX_PARTICLES {
            return Err(PlannerError::CapacityExceeded);
        }
        if !fitness.bounds().is_valid() || !origin.is_finite() {
            return Err(PlannerError::InvalidConfiguration);
        }
        if !(spawn_density >= 0.0 && spawn_density.is_finite())
            || !(max_initial_speed >= 0.0 && max_initial_speed.is_finite())
        {
            return Err(PlannerError::InvalidConfiguration);
        }

        let bounds = fitness.bounds();
        let mut particles = Vec::new();
        for _ in 0..particle_count {
            let radius = spawn_density * libm::sqrtf(rng::unit(&mut rng));
            let position = origin + Point2D::from_polar(radius, rng::angle(&mut rng));
            let speed = max_initial_speed * rng::unit(&mut rng);
            let velocity = Point2D::from_polar(speed, rng::angle(&mut rng));
            let cost = fitness.evaluate(position);

            particles
                .push(Particle {
                    position,
                    velocity,
                    pbest_position: position,
                    pbest_fitness: cost,
                    fitness: cost,
                    out_of_bounds: !bounds.contains(&position),
                })
                .map_err(|_| PlannerError::CapacityExceeded)?;
        }

        let (gbest_position, gbest_fitness) = best_of(&particles)
            .map(|p| (p.pbest_position, p.pbest_fitness))
            .ok_or(PlannerError::InvalidConfiguration)?;

        debug!(
            "Swarm spawned: {} particles around {}, initial best {:.3} at {}",
            particle_count, origin, gbest_fitness, gbest_position
        );

        Ok(Self {
            particles,
            gbest_position,
            gbest_fitness,
            current_epoch: 0,
            options,
            fitness,
            has_reached_optima: false,
            rng,
        })
    }

    /// Perform one optimization epoch.
    ///
    /// `dt` is simulated time; positions advance by `velocity * dt`.
    /// Stepping a converged swarm is rejected with
    /// [`PlannerError::ProtocolViolation`] and leaves the swarm untouched.
    pub fn next_epoch(&mut self, dt: f32) -> Result<()> {
        if self.has_reached_optima {
            error!(
                "next_epoch called on a converged swarm (epoch {}/{})",
                self.current_epoch, self.options.max_epoch
            );
            return Err(PlannerError::ProtocolViolation);
        }

        let inertia = self.options.inertia_at(self.current_epoch);
        let bounds = self.fitness.bounds();
        let gbest = self.gbest_position;

        for particle in self.particles.iter_mut() {
            let r1 = rng::unit(&mut self.rng);
            let r2 = rng::unit(&mut self.rng);

            let cognitive = (particle.pbest_position - particle.position) * (self.options.c1 * r1);
            let social = (gbest - particle.position) * (self.options.c2 * r2);
            particle.velocity = particle.velocity * inertia + cognitive + social;

            particle.position += particle.velocity * dt;
            particle.out_of_bounds = !bounds.contains(&particle.position);

            particle.fitness = self.fitness.evaluate(particle.position);
            if particle.fitness < particle.pbest_fitness {
                particle.pbest_fitness = particle.fitness;
                particle.pbest_position = particle.position;
            }
        }

        // Min-reduction over personal bests
        if let Some(best) = best_of(&self.particles) {
            if best.pbest_fitness < self.gbest_fitness {
                self.gbest_fitness = best.pbest_fitness;
                self.gbest_position = best.pbest_position;
            }
        }

        self.current_epoch += 1;
        trace!(
            "epoch {}/{} inertia {:.4} best {:.3}",
            self.current_epoch,
            self.options.max_epoch,
            inertia,
            self.gbest_fitness
        );

        if self.current_epoch >= self.options.max_epoch {
            self.has_reached_optima = true;
            debug!(
                "Swarm converged after {} epochs: best {:.3} at {}",
                self.current_epoch, self.gbest_fitness, self.gbest_position
            );
        }

        Ok(())
    }

    /// Step until convergence and return the best position found
    pub fn run_to_convergence(&mut self, dt: f32) -> Result<Point2D> {
        while !self.has_reached_optima {
            self.next_epoch(dt)?;
        }
        Ok(self.gbest_position)
    }

    /// Particles in spawn order
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Epochs completed so far
    pub fn current_epoch(&self) -> u32 {
        self.current_epoch
    }

    /// Convergence cap
    pub fn max_epoch(&self) -> u32 {
        self.options.max_epoch
    }

    /// Best position found by any particle
    pub fn global_best_position(&self) -> Point2D {
        self.gbest_position
    }

    /// Fitness at [`Swarm::global_best_position`]
    pub fn global_best_fitness(&self) -> f32 {
        self.gbest_fitness
    }

    /// True once `max_epoch` epochs have run
    pub fn has_reached_optima(&self) -> bool {
        self.has_reached_optima
    }

    /// Inertia weight the next epoch will use
    pub fn inertia(&self) -> f32 {
        self.options.inertia_at(self.current_epoch)
    }

    /// Hyperparameter snapshot taken at construction
    pub fn options(&self) -> &SwarmOptions {
        &self.options
    }

    /// Field rectangle used for the out-of-bounds flag
    pub fn bounds(&self) -> Bounds {
        self.fitness.bounds()
    }

    /// The objective this swarm minimizes
    pub fn fitness(&self) -> &F {
        &self.fitness
    }
}

fn best_of(particles: &[Particle]) -> Option<&Particle> {
    particles
        .iter()
        .min_by(|a, b| a.pbest_fitness.total_cmp(&b.pbest_fitness))
}
