//! Random sources for the optimizer
//!
//! Every random draw in the planner (initial scatter, initial velocity,
//! the per-epoch `r1`/`r2` factors) goes through a [`SimRng`] owned by the
//! caller, so a run is reproducible from a single seed.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Random generator used by the swarm and the phase controller
pub type SimRng = StdRng;

/// Deterministic generator for reproducible runs
pub fn seeded(seed: u64) -> SimRng {
    StdRng::seed_from_u64(seed)
}

/// Generator seeded from operating system entropy
#[cfg(feature = "std")]
pub fn from_entropy() -> SimRng {
    StdRng::from_entropy()
}

/// Derive an independent child generator, one per searching episode
pub fn fork<R: RngCore>(parent: &mut R) -> SimRng {
    StdRng::seed_from_u64(parent.next_u64())
}

/// Uniform f32 in [0.0, 1.0)
pub fn unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen::<f32>()
}

/// Uniform angle in [0, 2π)
pub fn angle<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    unit(rng) * core::f32::consts::TAU
}
