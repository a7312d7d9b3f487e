//! Injectable randomness and deterministic per-product seeds.
//!
//! The simulator draws every random number through [`RandomSource`], so tests
//! can script the walk exactly (force or suppress a markdown shock) without
//! touching a global generator. [`SeedHierarchy`] expands one master seed into
//! per-product sub-seeds via BLAKE3, independently of evaluation order, so a
//! parallel batch produces the same series as a sequential one.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Source of the two kinds of draws the price walk needs.
pub trait RandomSource {
    /// Uniform draw from `[low, high)`. Returns `low` when the range is empty.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// Bernoulli trial: true with the given probability.
    fn chance(&mut self, probability: f64) -> bool;
}

fn uniform_from<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}

impl RandomSource for StdRng {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        uniform_from(self, low, high)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.gen::<f64>() < probability
    }
}

impl RandomSource for ThreadRng {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        uniform_from(self, low, high)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.gen::<f64>() < probability
    }
}

/// Seeded generator for reproducible runs.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Deterministic seed hierarchy keyed by product id.
///
/// `sub_seed(master, "P-1000")` does not depend on which other products were
/// seeded before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedHierarchy {
    master_seed: u64,
}

impl SeedHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// Hierarchy with a master seed drawn from the thread RNG.
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive the sub-seed for one product.
    pub fn sub_seed(&self, product_id: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(product_id.as_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }
}
