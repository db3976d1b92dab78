//! Uniform random indices from a bounded integer source.
//!
//! Two draws from a source uniform over `[0, M]` are combined into one value
//! uniform over `[0, (M + 1)^2)`. Values at or above the largest multiple of
//! `n` in that range are rejected, so `value % n` carries no modulo bias.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::SystemTime;

/// `RAND_MAX` of glibc, the range GloVe's C tools draw from.
pub const C_RAND_MAX: u32 = i32::MAX as u32;

/// A source of integers uniformly distributed over `[0, max_value()]`.
pub trait RandomSource {
    fn max_value(&self) -> u32;
    fn next_raw(&mut self) -> u32;
}

/// Default source: `StdRng` narrowed to `[0, C_RAND_MAX]`.
pub struct StdSource {
    rng: StdRng,
    max: u32,
}

impl StdSource {
    pub fn seed_from_u64(seed: u64) -> Self {
        StdSource {
            rng: StdRng::seed_from_u64(seed),
            max: C_RAND_MAX,
        }
    }
}

impl RandomSource for StdSource {
    fn max_value(&self) -> u32 {
        self.max
    }

    fn next_raw(&mut self) -> u32 {
        self.rng.random_range(0..=self.max)
    }
}

/// Seed to use when none was configured: current Unix time in seconds.
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

pub struct IndexGenerator<S> {
    source: S,
}

impl<S: RandomSource> IndexGenerator<S> {
    pub fn new(source: S) -> Self {
        IndexGenerator { source }
    }

    /// Returns an integer uniformly distributed over `[0, n)`.
    ///
    /// Panics if `n == 0`.
    pub fn next_index(&mut self, n: u64) -> u64 {
        assert!(n > 0, "next_index requires n >= 1");
        let base = self.source.max_value() as u128 + 1;
        let range = base * base;
        let limit = range - range % n as u128;
        loop {
            let high = self.source.next_raw() as u128;
            let low = self.source.next_raw() as u128;
            let value = high * base + low;
            if value < limit {
                return (value % n as u128) as u64;
            }
        }
    }
}

impl IndexGenerator<StdSource> {
    pub fn seeded(seed: u64) -> Self {
        IndexGenerator::new(StdSource::seed_from_u64(seed))
    }
}
