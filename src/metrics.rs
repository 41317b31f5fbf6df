//! Error statistics of an estimate against ground truth

use serde::Serialize;

use crate::axis::Triad;
use crate::error::{FusionError, Result};

/// Root-mean-square of `estimate - truth`. Empty input gives 0.
pub fn rms_error(estimate: &[f64], truth: &[f64]) -> Result<f64> {
    FusionError::check_len("estimate vs truth", truth.len(), estimate.len())?;
    if truth.is_empty() {
        return Ok(0.0);
    }
    let sum_sq: f64 = estimate
        .iter()
        .zip(truth)
        .map(|(&e, &t)| (e - t) * (e - t))
        .sum();
    Ok((sum_sq / truth.len() as f64).sqrt())
}

/// Largest absolute error, optionally ignoring the first `skip` samples.
/// A NaN error anywhere in the window makes the peak NaN.
pub fn peak_error(estimate: &[f64], truth: &[f64], skip: usize) -> Result<f64> {
    FusionError::check_len("estimate vs truth", truth.len(), estimate.len())?;
    Ok(estimate
        .iter()
        .zip(truth)
        .skip(skip)
        .map(|(&e, &t)| (e - t).abs())
        .fold(0.0f64, |peak, err| {
            if peak.is_nan() || err.is_nan() {
                f64::NAN
            } else {
                peak.max(err)
            }
        }))
}

/// First index from which the absolute error stays within `tolerance` until
/// the end of the trace. `None` if the last sample is already outside it.
/// A non-finite error never counts as settled.
pub fn settling_index(estimate: &[f64], truth: &[f64], tolerance: f64) -> Result<Option<usize>> {
    FusionError::check_len("estimate vs truth", truth.len(), estimate.len())?;
    let mut settled = None;
    for i in (0..truth.len()).rev() {
        let err = (estimate[i] - truth[i]).abs();
        if !err.is_finite() || err > tolerance {
            break;
        }
        settled = Some(i);
    }
    Ok(settled)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisMetrics {
    pub rms_err: f64,
    pub peak_err: f64,
    pub settling_index: Option<usize>,
}

impl AxisMetrics {
    pub fn compute(estimate: &[f64], truth: &[f64], tolerance: f64) -> Result<Self> {
        Ok(Self {
            rms_err: rms_error(estimate, truth)?,
            peak_err: peak_error(estimate, truth, 0)?,
            settling_index: settling_index(estimate, truth, tolerance)?,
        })
    }
}

/// Metrics for each axis of `estimate` against `truth`.
pub fn evaluate(
    estimate: &Triad<Vec<f64>>,
    truth: &Triad<Vec<f64>>,
    tolerance: f64,
) -> Result<Triad<AxisMetrics>> {
    estimate
        .as_ref()
        .try_map(|axis, est| AxisMetrics::compute(est, truth.get(axis), tolerance))
}
