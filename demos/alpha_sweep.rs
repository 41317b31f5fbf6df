//! Alpha Sweep Example
//!
//! Generates one noisy run with the default configuration and compares the
//! fused error across several gyro weights.

use imu_fusion_sim::config::FusionConfig;
use imu_fusion_sim::{NoiseSource, SimConfig, SimulationRun};

fn main() -> imu_fusion_sim::Result<()> {
    println!("Running IMU complementary-fusion alpha sweep...\n");

    let config = SimConfig {
        seed: Some(42),
        ..SimConfig::default()
    };

    println!("Configuration:");
    println!("  Sample rate: {} Hz", config.timing.sample_rate_hz);
    println!("  Duration: {} s", config.timing.duration_s);
    println!(
        "  Noise sigma: gyro {} deg/s, accel {} deg, mag {} deg",
        config.sensors.gyro_noise_std, config.sensors.accel_noise_std, config.sensors.mag_noise_std
    );
    println!(
        "  Disturbance: {} deg at {} Hz on {}, decay {}",
        config.motion.disturbance.amplitude_deg,
        config.motion.disturbance.frequency_hz,
        config.motion.disturbance.axis,
        config.motion.disturbance.decay
    );
    println!();

    let mut noise = NoiseSource::seeded(42);
    let run = SimulationRun::generate(&config, &mut noise)?;

    let fusion = FusionConfig::default();
    let reference = run.reference_metrics(fusion.settle_tolerance_deg)?;
    let alphas = [0.0, 0.5, 0.9, 0.97, 0.99, 1.0];
    let points = run.sweep(&alphas, &fusion)?;

    println!("RMS ERRORS (deg)");
    println!("================");
    println!(
        "  {:<10} {:>10} {:>10} {:>10}",
        "source", "pitch", "roll", "yaw"
    );
    println!(
        "  {:<10} {:>10.4} {:>10.4} {:>10.4}",
        "reference",
        reference.pitch.rms_err,
        reference.roll.rms_err,
        reference.yaw.rms_err
    );
    for point in &points {
        println!(
            "  {:<10} {:>10.4} {:>10.4} {:>10.4}",
            format!("a={}", point.alpha),
            point.metrics.pitch.rms_err,
            point.metrics.roll.rms_err,
            point.metrics.yaw.rms_err
        );
    }

    let best = points
        .iter()
        .min_by(|a, b| {
            let total = |p: &imu_fusion_sim::SweepPoint| {
                p.metrics.iter().map(|(_, m)| m.rms_err).sum::<f64>()
            };
            total(a).total_cmp(&total(b))
        })
        .map(|p| p.alpha);

    if let Some(alpha) = best {
        println!("\nLowest total RMS error at alpha = {alpha}");
    }
    println!("Done!");

    Ok(())
}
