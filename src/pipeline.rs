//! Simulation run and interactive re-fusion
//!
//! A [`SimulationRun`] generates motion and sensor observations once. Fusion
//! is a pure function of those fixed observations and a coefficient, so it
//! can be repeated for any number of coefficients without drawing new noise.

use serde::Serialize;

use crate::axis::Triad;
use crate::config::{FusionConfig, SimConfig};
use crate::error::{FusionError, Result};
use crate::filter::{Alpha, ComplementaryFilter};
use crate::metrics::{evaluate, AxisMetrics};
use crate::motion::generate_motion;
use crate::noise::NoiseSource;
use crate::sensors::{Accelerometer, Gyroscope, Magnetometer, SensorModel};
use crate::time::TimeBase;

/// Ground truth and sensor observations for one run
#[derive(Debug, Clone)]
pub struct SimulationRun {
    time: TimeBase,
    truth: Triad<Vec<f64>>,
    rates: Triad<Vec<f64>>,
    references: Triad<Vec<f64>>,
}

impl SimulationRun {
    /// Generate motion and observations, drawing noise from `noise`.
    ///
    /// Draw order: gyro pitch, roll, yaw; accelerometer pitch, roll;
    /// magnetometer yaw.
    pub fn generate(config: &SimConfig, noise: &mut NoiseSource) -> Result<Self> {
        config.validate()?;

        let time = config.timing.time_base()?;
        let truth = generate_motion(&time, &config.motion)?;

        let gyro = Gyroscope::new(config.sensors.gyro_noise_std);
        let accel = Accelerometer::new(config.sensors.accel_noise_std);
        let mag = Magnetometer::new(config.sensors.mag_noise_std);
        for sensor in [&gyro as &dyn SensorModel, &accel, &mag] {
            log::debug!("{:?}: noise std {}", sensor.kind(), sensor.noise_std());
        }

        let rates = truth
            .as_ref()
            .try_map(|_, signal| gyro.observe(signal, &time, noise))?;
        let (accel_pitch, accel_roll) =
            accel.observe_pitch_roll(&truth.pitch, &truth.roll, &time, noise)?;
        let mag_yaw = mag.observe(&truth.yaw, &time, noise)?;

        log::info!(
            "generated run: {} samples at dt={}s, seed={}",
            time.len(),
            time.dt(),
            noise.seed()
        );

        Ok(Self {
            time,
            truth,
            rates,
            references: Triad::new(accel_pitch, accel_roll, mag_yaw),
        })
    }

    /// Generate using the configured seed, or an entropy seed if none is set.
    pub fn from_config(config: &SimConfig) -> Result<Self> {
        let mut noise = match config.seed {
            Some(seed) => NoiseSource::seeded(seed),
            None => NoiseSource::from_entropy(),
        };
        Self::generate(config, &mut noise)
    }

    /// Wrap externally produced signals. All must match the time base length.
    pub fn from_signals(
        time: TimeBase,
        truth: Triad<Vec<f64>>,
        rates: Triad<Vec<f64>>,
        references: Triad<Vec<f64>>,
    ) -> Result<Self> {
        let n = time.len();
        for (_, signal) in truth.iter() {
            FusionError::check_len("ground truth vs time base", n, signal.len())?;
        }
        for (_, signal) in rates.iter() {
            FusionError::check_len("rate vs time base", n, signal.len())?;
        }
        for (_, signal) in references.iter() {
            FusionError::check_len("reference vs time base", n, signal.len())?;
        }
        Ok(Self {
            time,
            truth,
            rates,
            references,
        })
    }

    pub fn time(&self) -> &TimeBase {
        &self.time
    }

    pub fn truth(&self) -> &Triad<Vec<f64>> {
        &self.truth
    }

    pub fn rates(&self) -> &Triad<Vec<f64>> {
        &self.rates
    }

    pub fn references(&self) -> &Triad<Vec<f64>> {
        &self.references
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Fuse all three axes with `filter`.
    pub fn fuse(&self, filter: &ComplementaryFilter) -> Result<Triad<Vec<f64>>> {
        filter.apply_triad(&self.rates, &self.references, self.time.dt())
    }

    /// Fuse all three axes with the sequential filter at `alpha`.
    pub fn fuse_alpha(&self, alpha: f64) -> Result<Triad<Vec<f64>>> {
        self.fuse(&ComplementaryFilter::new(Alpha::new(alpha)?))
    }

    /// Error of the raw reference sensors against truth.
    pub fn reference_metrics(&self, tolerance: f64) -> Result<Triad<AxisMetrics>> {
        evaluate(&self.references, &self.truth, tolerance)
    }

    /// Fuse and score each coefficient in `alphas` over this run's fixed
    /// observations.
    pub fn sweep(&self, alphas: &[f64], fusion: &FusionConfig) -> Result<Vec<SweepPoint>> {
        let alphas = alphas
            .iter()
            .map(|&a| Alpha::new(a))
            .collect::<Result<Vec<_>>>()?;

        alphas
            .into_iter()
            .map(|alpha| {
                let fused = self.fuse(&fusion.filter(alpha))?;
                let metrics = evaluate(&fused, &self.truth, fusion.settle_tolerance_deg)?;
                Ok(SweepPoint {
                    alpha: alpha.value(),
                    metrics,
                })
            })
            .collect()
    }
}

/// Metrics for one coefficient of a sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPoint {
    pub alpha: f64,
    pub metrics: Triad<AxisMetrics>,
}

/// Cached fused signals for a live coefficient
///
/// A coefficient change recomputes all three axes and replaces the cache
/// wholesale; a rejected coefficient leaves the previous result in place.
#[derive(Debug, Clone)]
pub struct FusionSession {
    run: SimulationRun,
    fusion: FusionConfig,
    alpha: Alpha,
    fused: Triad<Vec<f64>>,
}

impl FusionSession {
    pub fn new(run: SimulationRun, fusion: FusionConfig) -> Result<Self> {
        fusion.validate()?;
        let alpha = Alpha::new(fusion.alpha)?;
        let fused = run.fuse(&fusion.filter(alpha))?;
        Ok(Self {
            run,
            fusion,
            alpha,
            fused,
        })
    }

    /// Re-fuse at `alpha` and return the new signals.
    pub fn set_alpha(&mut self, alpha: f64) -> Result<&Triad<Vec<f64>>> {
        let alpha = Alpha::new(alpha)?;
        let fused = self.run.fuse(&self.fusion.filter(alpha))?;
        log::debug!("re-fused {} samples at alpha={}", self.run.len(), alpha.value());
        self.alpha = alpha;
        self.fused = fused;
        Ok(&self.fused)
    }

    pub fn alpha(&self) -> Alpha {
        self.alpha
    }

    pub fn fused(&self) -> &Triad<Vec<f64>> {
        &self.fused
    }

    pub fn run(&self) -> &SimulationRun {
        &self.run
    }

    pub fn metrics(&self) -> Result<Triad<AxisMetrics>> {
        evaluate(&self.fused, &self.run.truth, self.fusion.settle_tolerance_deg)
    }
}
