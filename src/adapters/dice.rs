//! Seeded random source for the meal scheduler.
//!
//! Wraps any [`rand::Rng`]; the default engine is ChaCha8 so a fixed seed
//! replays the same meals across platforms.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::app::ports::RandomSource;

/// [`RandomSource`] backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct SeededDice<R = ChaCha8Rng> {
    rng: R,
}

impl SeededDice<ChaCha8Rng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }

    /// Seeded when `seed` is set, otherwise from OS entropy.
    pub fn from_config(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> SeededDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RandomSource for SeededDice<R> {
    fn uniform(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    fn carbs_between(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}
