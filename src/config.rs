//! Simulation configuration
//!
//! Loaded from TOML; every section is optional and falls back to the
//! defaults below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FusionError, Result};
use crate::filter::{Alpha, ComplementaryFilter, FusionStrategy, DEFAULT_SCAN_BLOCK};
use crate::motion::MotionConfig;
use crate::time::TimeBase;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub sample_rate_hz: f64,
    pub duration_s: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 100.0,
            duration_s: 10.0,
        }
    }
}

impl TimingConfig {
    pub fn time_base(&self) -> Result<TimeBase> {
        TimeBase::new(self.sample_rate_hz, self.duration_s)
    }
}

/// Noise standard deviation per sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// deg/s
    pub gyro_noise_std: f64,
    /// deg
    pub accel_noise_std: f64,
    /// deg
    pub mag_noise_std: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            gyro_noise_std: 0.5,
            accel_noise_std: 2.0,
            mag_noise_std: 2.0,
        }
    }
}

impl SensorConfig {
    /// Noise-free sensors.
    pub fn clean() -> Self {
        Self {
            gyro_noise_std: 0.0,
            accel_noise_std: 0.0,
            mag_noise_std: 0.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let all = [
            ("gyro_noise_std", self.gyro_noise_std),
            ("accel_noise_std", self.accel_noise_std),
            ("mag_noise_std", self.mag_noise_std),
        ];
        for (name, sigma) in all {
            if !sigma.is_finite() || sigma < 0.0 {
                return Err(FusionError::invalid(format!("{name} must be >= 0")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub alpha: f64,
    pub strategy: FusionStrategy,
    pub scan_block: usize,
    /// Extra coefficients evaluated by a sweep
    pub sweep_alphas: Vec<f64>,
    /// Error bound (deg) used for settling detection
    pub settle_tolerance_deg: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            alpha: 0.97,
            strategy: FusionStrategy::Sequential,
            scan_block: DEFAULT_SCAN_BLOCK,
            sweep_alphas: Vec::new(),
            settle_tolerance_deg: 1.0,
        }
    }
}

impl FusionConfig {
    pub fn validate(&self) -> Result<()> {
        Alpha::new(self.alpha)?;
        for &alpha in &self.sweep_alphas {
            Alpha::new(alpha)?;
        }
        if self.scan_block == 0 {
            return Err(FusionError::invalid("scan_block must be > 0"));
        }
        if !self.settle_tolerance_deg.is_finite() || self.settle_tolerance_deg <= 0.0 {
            return Err(FusionError::invalid("settle_tolerance_deg must be > 0"));
        }
        Ok(())
    }

    /// Filter for `alpha` using this section's strategy settings.
    pub fn filter(&self, alpha: Alpha) -> ComplementaryFilter {
        ComplementaryFilter::new(alpha)
            .with_strategy(self.strategy)
            .with_block_len(self.scan_block)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Noise seed; `None` seeds from entropy
    pub seed: Option<u64>,
    pub timing: TimingConfig,
    pub motion: MotionConfig,
    pub sensors: SensorConfig,
    pub fusion: FusionConfig,
}

impl SimConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let cfg: SimConfig = toml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.timing.time_base()?;
        self.motion.validate()?;
        self.sensors.validate()?;
        self.fusion.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::Axis;

    #[test]
    fn test_defaults_validate() {
        let cfg = SimConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.timing.time_base().unwrap().len(), 1000);
        assert_eq!(cfg.fusion.alpha, 0.97);
        assert_eq!(cfg.motion.disturbance.axis, Axis::Pitch);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let cfg = SimConfig::from_toml_str(
            r#"
            seed = 7

            [timing]
            sample_rate_hz = 200.0

            [motion.disturbance]
            axis = "yaw"
            amplitude_deg = 3.0
            frequency_hz = 2.0
            decay = 1.0

            [fusion]
            alpha = 0.9
            strategy = "block_scan"
            sweep_alphas = [0.0, 0.5, 1.0]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.timing.sample_rate_hz, 200.0);
        assert_eq!(cfg.timing.duration_s, 10.0);
        assert_eq!(cfg.motion.disturbance.axis, Axis::Yaw);
        assert_eq!(cfg.motion.axes.pitch.amplitude_deg, 20.0);
        assert_eq!(cfg.fusion.strategy, FusionStrategy::BlockScan);
        assert_eq!(cfg.fusion.sweep_alphas.len(), 3);
        assert_eq!(cfg.sensors, SensorConfig::default());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(SimConfig::from_toml_str("[fusion]\nalpha = 1.2\n").is_err());
        assert!(SimConfig::from_toml_str("[fusion]\nsweep_alphas = [0.5, -0.1]\n").is_err());
        assert!(SimConfig::from_toml_str("[timing]\nduration_s = 0.0\n").is_err());
        assert!(SimConfig::from_toml_str("[sensors]\ngyro_noise_std = -1.0\n").is_err());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            SimConfig::from_toml_str("[timing\nsample_rate_hz = 1"),
            Err(FusionError::Toml(_))
        ));
    }
}
