//! Random source for board generation.
//!
//! Uses the `rand` crate with `SmallRng` (xoshiro256++), which works on
//! wasm32. Entropy comes from `getrandom` (browser crypto API) unless a seed
//! is given.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::types::Coordinate;

pub struct BoardRng {
    inner: SmallRng,
}

impl BoardRng {
    /// Create from system entropy (browser crypto.getRandomValues or OS).
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    /// Create with a specific seed for reproducible boards.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generate a random usize in [0, max).
    #[inline(always)]
    pub fn gen_range(&mut self, max: usize) -> usize {
        self.inner.random_range(0..max)
    }

    /// Pick a uniformly random position on a `rows` x `cols` grid.
    pub fn pick_cell(&mut self, rows: usize, cols: usize) -> Coordinate {
        Coordinate::new(self.gen_range(rows), self.gen_range(cols))
    }
}

impl Default for BoardRng {
    fn default() -> Self {
        Self::new()
    }
}
