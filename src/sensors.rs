//! Simulated IMU sensors
//!
//! Each sensor turns a ground-truth angle signal into what the device would
//! report: the gyroscope differentiates and adds rate noise, the
//! accelerometer and magnetometer observe the angle directly with angle noise.

use crate::error::{FusionError, Result};
use crate::noise::NoiseSource;
use crate::time::TimeBase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Gyroscope,
    Accelerometer,
    Magnetometer,
}

/// Something that observes a ground-truth angle signal
pub trait SensorModel {
    fn kind(&self) -> SensorKind;

    /// Noise standard deviation in the sensor's output unit
    fn noise_std(&self) -> f64;

    fn observe(
        &self,
        truth: &[f64],
        time: &TimeBase,
        noise: &mut NoiseSource,
    ) -> Result<Vec<f64>>;
}

/// Discrete derivative of `signal` with sample spacing `dt`.
///
/// Second-order central differences inside, first-order one-sided
/// differences at both ends. A single sample has zero rate.
pub fn gradient(signal: &[f64], dt: f64) -> Vec<f64> {
    let n = signal.len();
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let mut out = Vec::with_capacity(n);
            out.push((signal[1] - signal[0]) / dt);
            for i in 1..n - 1 {
                out.push((signal[i + 1] - signal[i - 1]) / (2.0 * dt));
            }
            out.push((signal[n - 1] - signal[n - 2]) / dt);
            out
        }
    }
}

/// Gyroscope model: derivative of `signal` (deg/s) plus rate noise.
pub fn simulate_rate(
    signal: &[f64],
    time: &TimeBase,
    dt: f64,
    sigma: f64,
    noise: &mut NoiseSource,
) -> Result<Vec<f64>> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(FusionError::invalid(format!("dt must be > 0, got {dt}")));
    }
    if (dt - time.dt()).abs() > 1e-9 * time.dt() {
        return Err(FusionError::invalid(format!(
            "dt {dt} does not match time base spacing {}",
            time.dt()
        )));
    }
    FusionError::check_len("ground truth vs time base", time.len(), signal.len())?;

    let rate = gradient(signal, dt);
    noise.add_gaussian(&rate, sigma)
}

/// Absolute angle sensor model: `signal` plus angle noise.
pub fn simulate_reference(signal: &[f64], sigma: f64, noise: &mut NoiseSource) -> Result<Vec<f64>> {
    noise.add_gaussian(signal, sigma)
}

/// Rate gyro, noise in deg/s
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gyroscope {
    noise_std: f64,
}

impl Gyroscope {
    pub fn new(noise_std: f64) -> Self {
        Self { noise_std }
    }
}

impl SensorModel for Gyroscope {
    fn kind(&self) -> SensorKind {
        SensorKind::Gyroscope
    }

    fn noise_std(&self) -> f64 {
        self.noise_std
    }

    fn observe(
        &self,
        truth: &[f64],
        time: &TimeBase,
        noise: &mut NoiseSource,
    ) -> Result<Vec<f64>> {
        simulate_rate(truth, time, time.dt(), self.noise_std, noise)
    }
}

/// Tilt from gravity, abstracted to a noisy pitch/roll observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accelerometer {
    noise_std: f64,
}

impl Accelerometer {
    pub fn new(noise_std: f64) -> Self {
        Self { noise_std }
    }

    /// Noisy (pitch, roll), drawn in that order.
    pub fn observe_pitch_roll(
        &self,
        pitch: &[f64],
        roll: &[f64],
        time: &TimeBase,
        noise: &mut NoiseSource,
    ) -> Result<(Vec<f64>, Vec<f64>)> {
        FusionError::check_len("roll vs time base", time.len(), roll.len())?;
        let noisy_pitch = self.observe(pitch, time, noise)?;
        let noisy_roll = self.observe(roll, time, noise)?;
        Ok((noisy_pitch, noisy_roll))
    }
}

impl SensorModel for Accelerometer {
    fn kind(&self) -> SensorKind {
        SensorKind::Accelerometer
    }

    fn noise_std(&self) -> f64 {
        self.noise_std
    }

    fn observe(
        &self,
        truth: &[f64],
        time: &TimeBase,
        noise: &mut NoiseSource,
    ) -> Result<Vec<f64>> {
        FusionError::check_len("ground truth vs time base", time.len(), truth.len())?;
        simulate_reference(truth, self.noise_std, noise)
    }
}

/// Heading from the magnetic field, abstracted to a noisy yaw observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Magnetometer {
    noise_std: f64,
}

impl Magnetometer {
    pub fn new(noise_std: f64) -> Self {
        Self { noise_std }
    }
}

impl SensorModel for Magnetometer {
    fn kind(&self) -> SensorKind {
        SensorKind::Magnetometer
    }

    fn noise_std(&self) -> f64 {
        self.noise_std
    }

    fn observe(
        &self,
        truth: &[f64],
        time: &TimeBase,
        noise: &mut NoiseSource,
    ) -> Result<Vec<f64>> {
        FusionError::check_len("ground truth vs time base", time.len(), truth.len())?;
        simulate_reference(truth, self.noise_std, noise)
    }
}
