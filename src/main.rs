use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use imu_fusion_sim::io::{
    ensure_outdir, write_manifest_json, write_sweep_csv, write_trace_csv, Manifest,
    OUTPUT_SCHEMA_VERSION,
};
use imu_fusion_sim::{FusionSession, NoiseSource, SimConfig, SimulationRun};

#[derive(Debug, Parser)]
#[command(name = "imu-fusion-sim")]
#[command(about = "Simulate 3-axis IMU motion and fuse it with a complementary filter")]
struct Cli {
    /// TOML configuration; built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "output-imu-fusion-sim")]
    outdir: PathBuf,

    /// Overrides the configured noise seed
    #[arg(long)]
    seed: Option<u64>,

    /// Overrides the configured fusion coefficient
    #[arg(long)]
    alpha: Option<f64>,

    /// Comma-separated coefficients to evaluate, e.g. 0,0.5,0.97,1
    #[arg(long)]
    sweep: Option<String>,
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    match path {
        Some(path) => SimConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config: {}", path.display())),
        None => Ok(SimConfig::default()),
    }
}

fn parse_sweep(raw: &str) -> Result<Vec<f64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .with_context(|| format!("invalid sweep coefficient '{s}'"))
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut cfg = load_config(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        cfg.seed = Some(seed);
    }
    if let Some(alpha) = cli.alpha {
        cfg.fusion.alpha = alpha;
    }
    if let Some(raw) = cli.sweep.as_deref() {
        cfg.fusion.sweep_alphas = parse_sweep(raw)?;
    }
    cfg.validate().context("invalid configuration")?;

    let mut noise = match cfg.seed {
        Some(seed) => NoiseSource::seeded(seed),
        None => NoiseSource::from_entropy(),
    };
    let seed = noise.seed();
    let run = SimulationRun::generate(&cfg, &mut noise).context("failed to generate run")?;
    let session = FusionSession::new(run, cfg.fusion.clone()).context("failed to fuse")?;

    ensure_outdir(&cli.outdir)
        .with_context(|| format!("failed to create output directory: {}", cli.outdir.display()))?;
    write_trace_csv(&cli.outdir.join("trace.csv"), session.run(), session.fused())
        .context("failed to write trace.csv")?;

    let tolerance = cfg.fusion.settle_tolerance_deg;
    let reference = session.run().reference_metrics(tolerance)?;
    let fused = session.metrics()?;
    println!("alpha = {}", session.alpha().value());
    println!("{:<6} {:>14} {:>14} {:>10}", "axis", "ref rms", "fused rms", "settled");
    for (axis, m) in fused.iter() {
        let settled = m
            .settling_index
            .map(|i| i.to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "{:<6} {:>14.6} {:>14.6} {:>10}",
            axis.name(),
            reference.get(axis).rms_err,
            m.rms_err,
            settled
        );
    }

    if !cfg.fusion.sweep_alphas.is_empty() {
        let points = session.run().sweep(&cfg.fusion.sweep_alphas, &cfg.fusion)?;
        write_sweep_csv(&cli.outdir.join("sweep.csv"), &points)
            .context("failed to write sweep.csv")?;
        log::info!("evaluated {} sweep coefficients", points.len());
    }

    write_manifest_json(
        &cli.outdir,
        &Manifest {
            schema_version: OUTPUT_SCHEMA_VERSION.to_string(),
            seed,
            alpha: session.alpha().value(),
            samples: session.run().len(),
            dt: session.run().time().dt(),
            sweep_alphas: cfg.fusion.sweep_alphas.clone(),
        },
    )
    .context("failed to write manifest.json")?;

    println!("wrote outputs to {}", cli.outdir.display());
    Ok(())
}
