//! Motion profile generator
//!
//! Ground-truth pitch/roll/yaw traces: one sinusoid per axis plus a decaying
//! oscillatory disturbance on a single axis.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::axis::{Axis, Triad};
use crate::error::{FusionError, Result};
use crate::time::TimeBase;

/// `A * sin(2π f t)` for one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisMotion {
    /// Amplitude in degrees
    pub amplitude_deg: f64,
    /// Frequency in Hz
    pub frequency_hz: f64,
}

impl AxisMotion {
    pub fn new(amplitude_deg: f64, frequency_hz: f64) -> Self {
        Self {
            amplitude_deg,
            frequency_hz,
        }
    }

    pub fn angle_at(&self, t: f64) -> f64 {
        self.amplitude_deg * (TAU * self.frequency_hz * t).sin()
    }

    fn validate(&self, axis: Axis) -> Result<()> {
        if !self.amplitude_deg.is_finite() {
            return Err(FusionError::invalid(format!(
                "{axis} amplitude must be finite"
            )));
        }
        if !self.frequency_hz.is_finite() || self.frequency_hz < 0.0 {
            return Err(FusionError::invalid(format!(
                "{axis} frequency must be >= 0 Hz"
            )));
        }
        Ok(())
    }
}

/// Transient shock `Ad * sin(2π fd t) * exp(-k t)` added to one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Disturbance {
    /// Axis receiving the disturbance
    pub axis: Axis,
    /// Amplitude `Ad` in degrees (>= 0)
    pub amplitude_deg: f64,
    /// Oscillation frequency `fd` in Hz
    pub frequency_hz: f64,
    /// Envelope decay rate `k` in 1/s (>= 0)
    pub decay: f64,
}

impl Disturbance {
    /// A zero-amplitude disturbance on pitch.
    pub fn none() -> Self {
        Self {
            axis: Axis::Pitch,
            amplitude_deg: 0.0,
            frequency_hz: 0.0,
            decay: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.amplitude_deg > 0.0
    }

    /// Envelope magnitude `Ad * exp(-k t)`; non-increasing in `t` for `k >= 0`.
    pub fn envelope(&self, t: f64) -> f64 {
        self.amplitude_deg * (-self.decay * t).exp()
    }

    pub fn value_at(&self, t: f64) -> f64 {
        (TAU * self.frequency_hz * t).sin() * self.envelope(t)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amplitude_deg.is_finite() || self.amplitude_deg < 0.0 {
            return Err(FusionError::invalid("disturbance amplitude must be >= 0"));
        }
        if !self.frequency_hz.is_finite() {
            return Err(FusionError::invalid("disturbance frequency must be finite"));
        }
        if !self.decay.is_finite() || self.decay < 0.0 {
            return Err(FusionError::invalid("disturbance decay must be >= 0"));
        }
        Ok(())
    }
}

impl Default for Disturbance {
    fn default() -> Self {
        Self {
            axis: Axis::Pitch,
            amplitude_deg: 5.0,
            frequency_hz: 1.5,
            decay: 0.5,
        }
    }
}

/// Per-axis motion plus the disturbance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub axes: Triad<AxisMotion>,
    pub disturbance: Disturbance,
}

impl MotionConfig {
    pub fn validate(&self) -> Result<()> {
        for (axis, motion) in self.axes.iter() {
            motion.validate(axis)?;
        }
        self.disturbance.validate()
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            axes: Triad::new(
                AxisMotion::new(20.0, 0.2),
                AxisMotion::new(10.0, 0.1),
                AxisMotion::new(30.0, 0.15),
            ),
            disturbance: Disturbance::default(),
        }
    }
}

/// Generate the three ground-truth angle signals over `time`.
pub fn generate_motion(time: &TimeBase, config: &MotionConfig) -> Result<Triad<Vec<f64>>> {
    config.validate()?;

    let t = time.as_slice();
    let mut truth = config
        .axes
        .clone()
        .map(|_, motion| t.iter().map(|&ti| motion.angle_at(ti)).collect::<Vec<f64>>());

    let disturbance = &config.disturbance;
    if disturbance.is_active() {
        let target = truth.get_mut(disturbance.axis);
        for (angle, &ti) in target.iter_mut().zip(t) {
            *angle += disturbance.value_at(ti);
        }
    }

    log::debug!(
        "generated motion: {} samples, disturbance on {} (Ad={})",
        t.len(),
        disturbance.axis,
        disturbance.amplitude_deg
    );
    Ok(truth)
}

/// A generated ground-truth trace together with its time base
#[derive(Debug, Clone)]
pub struct MotionProfile {
    pub time: TimeBase,
    pub truth: Triad<Vec<f64>>,
}

impl MotionProfile {
    pub fn generate(time: TimeBase, config: &MotionConfig) -> Result<Self> {
        let truth = generate_motion(&time, config)?;
        Ok(Self { time, truth })
    }

    /// `(pitch, roll, yaw, time)`
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>, Vec<f64>, TimeBase) {
        let Triad { pitch, roll, yaw } = self.truth;
        (pitch, roll, yaw, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time() -> TimeBase {
        TimeBase::new(100.0, 10.0).unwrap()
    }

    #[test]
    fn test_pure_sinusoids_without_disturbance() {
        let tb = time();
        let config = MotionConfig {
            disturbance: Disturbance::none(),
            ..MotionConfig::default()
        };
        let truth = generate_motion(&tb, &config).unwrap();
        for (i, &t) in tb.as_slice().iter().enumerate() {
            assert_eq!(truth.pitch[i], 20.0 * (TAU * 0.2 * t).sin());
            assert_eq!(truth.roll[i], 10.0 * (TAU * 0.1 * t).sin());
            assert_eq!(truth.yaw[i], 30.0 * (TAU * 0.15 * t).sin());
        }
    }

    #[test]
    fn test_zero_amplitude_disturbance_is_exact_noop() {
        let tb = time();
        let mut config = MotionConfig::default();
        config.disturbance.amplitude_deg = 0.0;
        let disturbed = generate_motion(&tb, &config).unwrap();
        let clean = generate_motion(
            &tb,
            &MotionConfig {
                disturbance: Disturbance::none(),
                ..config.clone()
            },
        )
        .unwrap();
        assert_eq!(disturbed, clean);
    }

    #[test]
    fn test_disturbance_only_touches_its_axis() {
        let tb = time();
        let mut config = MotionConfig::default();
        config.disturbance.axis = Axis::Roll;
        let truth = generate_motion(&tb, &config).unwrap();
        let clean = generate_motion(
            &tb,
            &MotionConfig {
                disturbance: Disturbance::none(),
                ..config.clone()
            },
        )
        .unwrap();
        assert_eq!(truth.pitch, clean.pitch);
        assert_eq!(truth.yaw, clean.yaw);
        assert_ne!(truth.roll, clean.roll);
    }

    #[test]
    fn test_envelope_decays_below_five_percent() {
        let d = Disturbance {
            axis: Axis::Pitch,
            amplitude_deg: 5.0,
            frequency_hz: 1.5,
            decay: 0.5,
        };
        let t_end = 6.0 / d.decay;
        assert!(d.envelope(t_end) <= 0.05 * d.envelope(0.0));

        let mut prev = d.envelope(0.0);
        for i in 1..=1200 {
            let e = d.envelope(i as f64 * 0.01);
            assert!(e <= prev);
            prev = e;
        }
    }

    #[test]
    fn test_zero_decay_keeps_constant_envelope() {
        let d = Disturbance {
            decay: 0.0,
            ..Disturbance::default()
        };
        assert_eq!(d.envelope(100.0), d.amplitude_deg);
    }

    #[test]
    fn test_rejects_negative_decay_and_amplitude() {
        let tb = time();
        let mut config = MotionConfig::default();
        config.disturbance.decay = -0.1;
        assert!(generate_motion(&tb, &config).is_err());

        let mut config = MotionConfig::default();
        config.disturbance.amplitude_deg = -1.0;
        assert!(generate_motion(&tb, &config).is_err());
    }

    #[test]
    fn test_profile_parts_aligned() {
        let profile = MotionProfile::generate(time(), &MotionConfig::default()).unwrap();
        let (pitch, roll, yaw, tb) = profile.into_parts();
        assert_eq!(pitch.len(), tb.len());
        assert_eq!(roll.len(), tb.len());
        assert_eq!(yaw.len(), tb.len());
    }
}
