// Noise injection for the heuristic scorer.
//
// The heuristic adds a small random jitter to every non-empty score to mimic
// the uncertainty of a real classifier. This is deliberate noise, not a bug,
// and it is the only non-deterministic step in the whole detection pipeline.
// It lives behind the NoiseSource trait so tests (and operators) can switch
// it off or pin it with a seed.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Upper bound (exclusive) of the jitter added to heuristic scores.
pub const MAX_JITTER: f64 = 0.2;

/// A source of additive noise in [0, MAX_JITTER).
pub trait NoiseSource: Send + Sync {
    fn sample(&self) -> f64;
}

/// Adds nothing. Makes the heuristic scorer fully deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNoise;

impl NoiseSource for NoNoise {
    fn sample(&self) -> f64 {
        0.0
    }
}

/// Uniform jitter in [0, MAX_JITTER), optionally seeded.
pub struct UniformJitter {
    rng: Mutex<StdRng>,
}

impl UniformJitter {
    /// Jitter seeded from the operating system.
    pub fn from_os() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Reproducible jitter: the same seed yields the same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl NoiseSource for UniformJitter {
    fn sample(&self) -> f64 {
        // A poisoned lock still holds a usable RNG
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.random_range(0.0..MAX_JITTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_noise_is_zero() {
        assert_eq!(NoNoise.sample(), 0.0);
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let jitter = UniformJitter::from_os();
        for _ in 0..1000 {
            let v = jitter.sample();
            assert!((0.0..MAX_JITTER).contains(&v), "jitter out of range: {v}");
        }
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let a = UniformJitter::seeded(42);
        let b = UniformJitter::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.sample(), b.sample());
        }
    }
}
