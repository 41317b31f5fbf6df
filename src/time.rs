//! Time base
//!
//! Equally spaced sample instants shared read-only by every stage of a run.

use crate::error::{FusionError, Result};

/// Upper bound on the number of samples in one run
pub const MAX_SAMPLES: usize = 1 << 28;

/// Sample instants `t[i] = i * dt` for `i` in `0..N`, `N = floor(duration / dt)`
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBase {
    dt: f64,
    samples: Vec<f64>,
}

impl TimeBase {
    /// Build a time base from a sample rate (Hz) and a horizon duration (s).
    pub fn new(sample_rate_hz: f64, duration_s: f64) -> Result<Self> {
        if !sample_rate_hz.is_finite() || sample_rate_hz <= 0.0 {
            return Err(FusionError::invalid(format!(
                "sample rate must be > 0 Hz, got {sample_rate_hz}"
            )));
        }
        if !duration_s.is_finite() || duration_s <= 0.0 {
            return Err(FusionError::invalid(format!(
                "duration must be > 0 s, got {duration_s}"
            )));
        }

        let dt = 1.0 / sample_rate_hz;
        // duration * rate avoids the 1/dt rounding of duration / dt; the
        // epsilon keeps exact multiples (10 s at 100 Hz) from flooring down.
        let n = (duration_s * sample_rate_hz + 1e-9).floor();
        if n > MAX_SAMPLES as f64 {
            return Err(FusionError::invalid(format!(
                "{duration_s} s at {sample_rate_hz} Hz exceeds {MAX_SAMPLES} samples"
            )));
        }
        let n = n as usize;
        let samples = (0..n).map(|i| i as f64 * dt).collect();

        Ok(Self { dt, samples })
    }

    /// Sample period in seconds.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// Horizon actually covered, `N * dt`.
    pub fn horizon(&self) -> f64 {
        self.samples.len() as f64 * self.dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_horizon_length() {
        let tb = TimeBase::new(100.0, 10.0).unwrap();
        assert_eq!(tb.len(), 1000);
        assert_eq!(tb.as_slice()[0], 0.0);
        assert!((tb.dt() - 0.01).abs() < 1e-15);
        assert!((tb.as_slice()[999] - 9.99).abs() < 1e-12);
    }

    #[test]
    fn test_equal_spacing() {
        let tb = TimeBase::new(50.0, 2.0).unwrap();
        for w in tb.as_slice().windows(2) {
            assert!((w[1] - w[0] - tb.dt()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_partial_period_is_floored() {
        let tb = TimeBase::new(10.0, 0.35).unwrap();
        assert_eq!(tb.len(), 3);
    }

    #[test]
    fn test_short_horizon_can_be_empty() {
        let tb = TimeBase::new(1.0, 0.5).unwrap();
        assert!(tb.is_empty());
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(TimeBase::new(0.0, 10.0).is_err());
        assert!(TimeBase::new(-100.0, 10.0).is_err());
        assert!(TimeBase::new(100.0, 0.0).is_err());
        assert!(TimeBase::new(100.0, f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_oversized_horizon() {
        assert!(matches!(
            TimeBase::new(100.0, 1e30),
            Err(FusionError::InvalidConfig(_))
        ));
        assert!(TimeBase::new(f64::MAX, 1.0).is_err());
        let n = MAX_SAMPLES as f64;
        assert!(TimeBase::new(1.0, n + 1.0).is_err());
    }
}
