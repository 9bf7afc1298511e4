use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::PPM_SCALE;

/// Characters in a correlation token.
const TOKEN_LEN: usize = 8;

/// Every random draw a request needs.
pub trait RandomSource: Send {
    /// Uniform draw in `0..PPM_SCALE`.
    fn roll_ppm(&mut self) -> u32;

    /// Fresh token embedded in request bodies to defeat caching.
    fn correlation_token(&mut self) -> String;
}

/// Seed policy for a run; each worker derives its own generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RngSeed {
    #[default]
    Entropy,
    Fixed(u64),
}

impl RngSeed {
    #[must_use]
    pub fn for_worker(self, worker: usize) -> SeededRandom {
        let rng = match self {
            RngSeed::Entropy => StdRng::from_entropy(),
            RngSeed::Fixed(seed) => {
                let offset = u64::try_from(worker).unwrap_or(u64::MAX);
                StdRng::seed_from_u64(seed.wrapping_add(offset))
            }
        };
        SeededRandom(rng)
    }
}

#[derive(Debug, Clone)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn roll_ppm(&mut self) -> u32 {
        self.0.gen_range(0..PPM_SCALE)
    }

    fn correlation_token(&mut self) -> String {
        (0..TOKEN_LEN)
            .map(|_| char::from(self.0.sample(Alphanumeric)).to_ascii_lowercase())
            .collect()
    }
}
