//! Complementary fusion filter
//!
//! Blends an integrated rate signal (fast, drifts) with an absolute
//! reference signal (noisy, driftless):
//!
//! ```text
//! f[0] = r[0]
//! f[i] = alpha * (f[i-1] + g[i] * dt) + (1 - alpha) * r[i]
//! ```
//!
//! Each step is the affine map `x -> alpha * x + b[i]` with
//! `b[i] = alpha * g[i] * dt + (1 - alpha) * r[i]`, so the recurrence can also
//! be evaluated as a blocked prefix scan over composed maps.

use serde::{Deserialize, Serialize};

use crate::axis::Triad;
use crate::error::{FusionError, Result};

/// Default block length for [`FusionStrategy::BlockScan`]
pub const DEFAULT_SCAN_BLOCK: usize = 256;

/// Gyro weighting coefficient in `[0, 1]`
///
/// 1.0 trusts rate integration only, 0.0 trusts the reference only.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Alpha(f64);

impl Alpha {
    pub const REFERENCE_ONLY: Alpha = Alpha(0.0);
    pub const RATE_ONLY: Alpha = Alpha(1.0);

    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(FusionError::AlphaOutOfRange(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Alpha {
    type Error = FusionError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

/// How the recurrence is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionStrategy {
    /// One pass carrying the previous fused value
    #[default]
    Sequential,
    /// Compose per-block affine maps, carry across blocks, then fill each block
    BlockScan,
}

/// Complementary filter configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplementaryFilter {
    alpha: Alpha,
    strategy: FusionStrategy,
    block_len: usize,
}

impl ComplementaryFilter {
    pub fn new(alpha: Alpha) -> Self {
        if alpha == Alpha::RATE_ONLY {
            log::warn!("alpha = 1.0: pure rate integration, fused output will drift");
        }
        Self {
            alpha,
            strategy: FusionStrategy::Sequential,
            block_len: DEFAULT_SCAN_BLOCK,
        }
    }

    pub fn with_strategy(mut self, strategy: FusionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Block length for `BlockScan`; zero is treated as one.
    pub fn with_block_len(mut self, block_len: usize) -> Self {
        self.block_len = block_len.max(1);
        self
    }

    pub fn alpha(&self) -> Alpha {
        self.alpha
    }

    pub fn strategy(&self) -> FusionStrategy {
        self.strategy
    }

    /// Fuse one axis. Inputs are validated before any sample is touched.
    pub fn apply(&self, rate: &[f64], reference: &[f64], dt: f64) -> Result<Vec<f64>> {
        validate_inputs(rate, reference, dt)?;
        Ok(self.apply_unchecked(rate, reference, dt))
    }

    /// Fuse all three axes independently. Every axis is validated first.
    pub fn apply_triad(
        &self,
        rates: &Triad<Vec<f64>>,
        references: &Triad<Vec<f64>>,
        dt: f64,
    ) -> Result<Triad<Vec<f64>>> {
        for (axis, rate) in rates.iter() {
            validate_inputs(rate, references.get(axis), dt)?;
        }
        Ok(rates
            .as_ref()
            .map(|axis, rate| self.apply_unchecked(rate, references.get(axis), dt)))
    }

    fn apply_unchecked(&self, rate: &[f64], reference: &[f64], dt: f64) -> Vec<f64> {
        if reference.len() <= 1 {
            return reference.to_vec();
        }
        match self.strategy {
            FusionStrategy::Sequential => fuse_sequential(rate, reference, dt, self.alpha.value()),
            FusionStrategy::BlockScan => {
                fuse_block_scan(rate, reference, dt, self.alpha.value(), self.block_len)
            }
        }
    }
}

/// Fuse one axis with the sequential recurrence.
///
/// `alpha` outside `[0, 1]` (or NaN) is rejected, not clamped.
pub fn fuse(rate: &[f64], reference: &[f64], dt: f64, alpha: f64) -> Result<Vec<f64>> {
    let alpha = Alpha::new(alpha)?;
    ComplementaryFilter::new(alpha).apply(rate, reference, dt)
}

fn validate_inputs(rate: &[f64], reference: &[f64], dt: f64) -> Result<()> {
    FusionError::check_len("rate vs reference", reference.len(), rate.len())?;
    if !dt.is_finite() || dt <= 0.0 {
        return Err(FusionError::invalid(format!("dt must be > 0, got {dt}")));
    }
    Ok(())
}

fn fuse_sequential(rate: &[f64], reference: &[f64], dt: f64, alpha: f64) -> Vec<f64> {
    let mut fused = Vec::with_capacity(reference.len());
    let mut prev = reference[0];
    fused.push(prev);

    for (&g, &r) in rate.iter().zip(reference).skip(1) {
        let predicted = prev + g * dt;
        prev = alpha * predicted + (1.0 - alpha) * r;
        fused.push(prev);
    }
    fused
}

/// `x -> scale * x + offset`
#[derive(Debug, Clone, Copy)]
struct Affine {
    scale: f64,
    offset: f64,
}

impl Affine {
    const IDENTITY: Affine = Affine {
        scale: 1.0,
        offset: 0.0,
    };

    /// `self` followed by `x -> a * x + b`
    fn then(self, a: f64, b: f64) -> Affine {
        Affine {
            scale: a * self.scale,
            offset: a * self.offset + b,
        }
    }

    fn apply(self, x: f64) -> f64 {
        self.scale * x + self.offset
    }
}

fn fuse_block_scan(
    rate: &[f64],
    reference: &[f64],
    dt: f64,
    alpha: f64,
    block_len: usize,
) -> Vec<f64> {
    let n = reference.len();
    let beta = 1.0 - alpha;
    let offset = |i: usize| alpha * rate[i] * dt + beta * reference[i];

    // Pass 1: composite map per block over steps 1..n. Blocks are independent.
    let blocks: Vec<(usize, usize)> = (1..n)
        .step_by(block_len)
        .map(|start| (start, (start + block_len).min(n)))
        .collect();
    let composites: Vec<Affine> = blocks
        .iter()
        .map(|&(start, end)| {
            (start..end).fold(Affine::IDENTITY, |acc, i| acc.then(alpha, offset(i)))
        })
        .collect();

    // Pass 2: carry the state into each block.
    let mut entry = Vec::with_capacity(blocks.len());
    let mut carry = reference[0];
    for composite in &composites {
        entry.push(carry);
        carry = composite.apply(carry);
    }

    // Pass 3: fill each block from its entry value.
    let mut fused = vec![0.0; n];
    fused[0] = reference[0];
    for (&(start, end), &x0) in blocks.iter().zip(&entry) {
        let mut x = x0;
        for i in start..end {
            x = alpha * x + offset(i);
            fused[i] = x;
        }
    }
    fused
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(n: usize) -> (Vec<f64>, Vec<f64>) {
        let rate = (0..n).map(|i| (i as f64 * 0.37).sin() * 3.0).collect();
        let reference = (0..n).map(|i| (i as f64 * 0.11).cos() * 10.0 + 0.5).collect();
        (rate, reference)
    }

    #[test]
    fn test_first_sample_and_length() {
        let (g, r) = inputs(50);
        let f = fuse(&g, &r, 0.01, 0.97).unwrap();
        assert_eq!(f.len(), r.len());
        assert_eq!(f[0], r[0]);
    }

    #[test]
    fn test_alpha_zero_is_reference() {
        let (g, r) = inputs(100);
        assert_eq!(fuse(&g, &r, 0.01, 0.0).unwrap(), r);
    }

    #[test]
    fn test_alpha_one_is_pure_integration() {
        let (g, r) = inputs(100);
        let dt = 0.01;
        let f = fuse(&g, &r, dt, 1.0).unwrap();
        for i in 1..f.len() {
            assert_eq!(f[i], f[i - 1] + g[i] * dt);
        }
    }

    #[test]
    fn test_hand_computed_steps() {
        let g = [0.0, 10.0, -10.0];
        let r = [1.0, 2.0, 0.0];
        let f = fuse(&g, &r, 0.1, 0.5).unwrap();
        // f1 = 0.5 * (1 + 1) + 0.5 * 2 = 2.0
        // f2 = 0.5 * (2 - 1) + 0.5 * 0 = 0.5
        assert_eq!(f, vec![1.0, 2.0, 0.5]);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert!(fuse(&[], &[], 0.01, 0.5).unwrap().is_empty());
        assert_eq!(fuse(&[9.0], &[4.0], 0.01, 0.5).unwrap(), vec![4.0]);
    }

    #[test]
    fn test_rejects_bad_configuration() {
        let (g, r) = inputs(10);
        assert!(matches!(
            fuse(&g[..9], &r, 0.01, 0.5),
            Err(FusionError::LengthMismatch { .. })
        ));
        assert!(matches!(
            fuse(&g, &r, 0.01, 1.5),
            Err(FusionError::AlphaOutOfRange(_))
        ));
        assert!(fuse(&g, &r, 0.01, -0.1).is_err());
        assert!(fuse(&g, &r, 0.01, f64::NAN).is_err());
        assert!(fuse(&g, &r, 0.0, 0.5).is_err());
    }

    #[test]
    fn test_block_scan_matches_sequential() {
        let (g, r) = inputs(1001);
        let alpha = Alpha::new(0.97).unwrap();
        let seq = ComplementaryFilter::new(alpha).apply(&g, &r, 0.01).unwrap();
        for block in [1, 7, 64, 256, 5000] {
            let scan = ComplementaryFilter::new(alpha)
                .with_strategy(FusionStrategy::BlockScan)
                .with_block_len(block)
                .apply(&g, &r, 0.01)
                .unwrap();
            assert_eq!(scan.len(), seq.len());
            assert_eq!(scan[0], seq[0]);
            for (a, b) in scan.iter().zip(&seq) {
                assert!((a - b).abs() < 1e-9, "block {block}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_block_scan_limits_are_exact() {
        let (g, r) = inputs(300);
        let scan = |alpha: Alpha| {
            ComplementaryFilter::new(alpha)
                .with_strategy(FusionStrategy::BlockScan)
                .with_block_len(32)
                .apply(&g, &r, 0.01)
                .unwrap()
        };
        assert_eq!(scan(Alpha::REFERENCE_ONLY), r);
        let drift = scan(Alpha::RATE_ONLY);
        for i in 1..drift.len() {
            assert!((drift[i] - (drift[i - 1] + g[i] * 0.01)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_triad_axes_are_independent() {
        let (g, r) = inputs(40);
        let rates = Triad::new(g.clone(), vec![0.0; 40], g.iter().map(|x| -x).collect());
        let refs = Triad::new(r.clone(), r.clone(), vec![1.0; 40]);
        let filter = ComplementaryFilter::new(Alpha::new(0.9).unwrap());
        let fused = filter.apply_triad(&rates, &refs, 0.01).unwrap();
        assert_eq!(fused.pitch, filter.apply(&rates.pitch, &refs.pitch, 0.01).unwrap());
        assert_eq!(fused.roll, filter.apply(&rates.roll, &refs.roll, 0.01).unwrap());
        assert_eq!(fused.yaw, filter.apply(&rates.yaw, &refs.yaw, 0.01).unwrap());
    }

    #[test]
    fn test_triad_validates_before_computing() {
        let rates = Triad::new(vec![0.0; 5], vec![0.0; 5], vec![0.0; 4]);
        let refs = Triad::new(vec![0.0; 5], vec![0.0; 5], vec![0.0; 5]);
        let filter = ComplementaryFilter::new(Alpha::new(0.5).unwrap());
        assert!(filter.apply_triad(&rates, &refs, 0.01).is_err());
    }

    #[test]
    fn test_repeat_calls_are_bit_identical() {
        let (g, r) = inputs(500);
        assert_eq!(
            fuse(&g, &r, 0.01, 0.8).unwrap(),
            fuse(&g, &r, 0.01, 0.8).unwrap()
        );
    }
}
