//! Random source and configuration types.

use rand::{RngCore, SeedableRng};
use std::fmt;
use std::ops::Range;

/// Seedable random stream for deterministic generation.
///
/// Every generator borrows a random source per call and is a pure
/// function of it, so two streams started from the same seed produce
/// the same values from the same generators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Random {
    state: u64,
    gamma: u64,
}

impl Random {
    /// Create a new stream from a single seed value.
    pub fn from_u64(value: u64) -> Self {
        let state = splitmix64_mix(value);
        let gamma = mix_gamma(state);
        Random { state, gamma }
    }

    /// Create a stream seeded from the thread-local entropy source.
    pub fn from_entropy() -> Self {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        Random::from_u64(rng.gen())
    }

    /// Split off an independent stream, advancing this one.
    /// Uses the SplitMix64 splitting strategy for independence.
    pub fn split(&mut self) -> Random {
        let output = self.advance();
        let gamma = mix_gamma(output);
        Random {
            state: output,
            gamma,
        }
    }

    fn advance(&mut self) -> u64 {
        self.state = self.state.wrapping_add(self.gamma);
        splitmix64_mix(self.state)
    }
}

impl RngCore for Random {
    fn next_u32(&mut self) -> u32 {
        (self.advance() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.advance()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.advance().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Random {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Random::from_u64(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Random::from_u64(state)
    }
}

impl fmt::Display for Random {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Random({}, {})", self.state, self.gamma)
    }
}

/// Configuration for derivation and property checking.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Number of samples a property check draws.
    pub test_limit: usize,

    /// Seed of the random stream a property check starts from.
    pub seed: u64,

    /// Element count range for derived collections and maps (end exclusive).
    pub collection_sizes: Range<usize>,

    /// Probability that a derived optional value is present.
    pub optional_probability: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            test_limit: 100,
            seed: 42,
            collection_sizes: 2..10,
            optional_probability: 0.5,
        }
    }
}

impl Config {
    /// Create a new config with the given number of tests.
    pub fn with_tests(mut self, tests: usize) -> Self {
        self.test_limit = tests;
        self
    }

    /// Create a new config with the given property-check seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with the given derived collection sizes.
    pub fn with_collection_sizes(mut self, sizes: Range<usize>) -> Self {
        self.collection_sizes = sizes;
        self
    }

    /// Create a new config with the given derived optional presence probability.
    pub fn with_optional_probability(mut self, probability: f64) -> Self {
        self.optional_probability = probability;
        self
    }
}

/// SplitMix64 mixing function for high-quality output.
fn splitmix64_mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Generate a good gamma value for SplitMix64 splitting.
fn mix_gamma(mut z: u64) -> u64 {
    z = splitmix64_mix(z);
    // Ensure gamma is odd for maximal period
    (z | 1).wrapping_mul(0x9e3779b97f4a7c15)
}
