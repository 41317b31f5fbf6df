//! Gaussian noise model
//!
//! The random source is an explicit handle. Nothing here reads global RNG
//! state: a run that needs reproducible noise builds its source with
//! [`NoiseSource::seeded`], and [`NoiseSource::reseed`] rewinds it.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{FusionError, Result};

/// Seedable source of additive zero-mean Gaussian noise
#[derive(Debug, Clone)]
pub struct NoiseSource {
    seed: u64,
    rng: ChaCha8Rng,
}

impl NoiseSource {
    /// Deterministic source; the same seed always yields the same draws.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Source seeded from OS entropy. The chosen seed is kept so the run
    /// can be replayed.
    pub fn from_entropy() -> Self {
        let seed = rand::random::<u64>();
        log::info!("noise source seeded from entropy: seed={seed}");
        Self::seeded(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Return `signal` plus independent `N(0, sigma^2)` noise per sample.
    ///
    /// `sigma <= 0` returns an exact copy and draws nothing.
    pub fn add_gaussian(&mut self, signal: &[f64], sigma: f64) -> Result<Vec<f64>> {
        if !sigma.is_finite() {
            return Err(FusionError::invalid(format!(
                "noise standard deviation must be finite, got {sigma}"
            )));
        }
        if sigma <= 0.0 {
            return Ok(signal.to_vec());
        }

        let dist = Normal::new(0.0, sigma)
            .map_err(|e| FusionError::invalid(format!("noise distribution: {e}")))?;
        Ok(signal
            .iter()
            .map(|&x| x + dist.sample(&mut self.rng))
            .collect())
    }
}
