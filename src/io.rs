use csv::WriterBuilder;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::axis::{Axis, Triad};
use crate::error::{FusionError, Result};
use crate::pipeline::{SimulationRun, SweepPoint};

pub const OUTPUT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub schema_version: String,
    /// Seed actually used, including one drawn from entropy
    pub seed: u64,
    pub alpha: f64,
    pub samples: usize,
    pub dt: f64,
    pub sweep_alphas: Vec<f64>,
}

fn fmt_f64(v: f64) -> String {
    format!("{v:.10}")
}

fn fmt_opt(v: Option<usize>) -> String {
    match v {
        Some(x) => x.to_string(),
        None => "NA".to_string(),
    }
}

pub fn ensure_outdir(outdir: &Path) -> Result<()> {
    fs::create_dir_all(outdir)?;
    Ok(())
}

/// One row per sample: time, then truth/rate/reference/fused for each axis.
pub fn write_trace_csv(path: &Path, run: &SimulationRun, fused: &Triad<Vec<f64>>) -> Result<()> {
    for (_, signal) in fused.iter() {
        FusionError::check_len("fused vs time base", run.len(), signal.len())?;
    }

    let mut wtr = WriterBuilder::new().has_headers(false).from_path(path)?;

    let mut header = vec!["t".to_string()];
    for axis in Axis::ALL {
        for column in ["true", "rate", "reference", "fused"] {
            header.push(format!("{axis}_{column}"));
        }
    }
    wtr.write_record(&header)?;

    for (i, &t) in run.time().as_slice().iter().enumerate() {
        let mut record = Vec::with_capacity(header.len());
        record.push(fmt_f64(t));
        for axis in Axis::ALL {
            record.push(fmt_f64(run.truth().get(axis)[i]));
            record.push(fmt_f64(run.rates().get(axis)[i]));
            record.push(fmt_f64(run.references().get(axis)[i]));
            record.push(fmt_f64(fused.get(axis)[i]));
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// One row per (alpha, axis).
pub fn write_sweep_csv(path: &Path, points: &[SweepPoint]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_path(path)?;

    wtr.write_record([
        "alpha",
        "axis",
        "rms_err",
        "peak_err",
        "settling_index",
        "schema_version",
    ])?;

    for point in points {
        for (axis, m) in point.metrics.iter() {
            wtr.write_record([
                fmt_f64(point.alpha).as_str(),
                axis.name(),
                &fmt_f64(m.rms_err),
                &fmt_f64(m.peak_err),
                &fmt_opt(m.settling_index),
                OUTPUT_SCHEMA_VERSION,
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_manifest_json(outdir: &Path, manifest: &Manifest) -> Result<PathBuf> {
    let path = outdir.join("manifest.json");
    let payload = serde_json::to_string_pretty(manifest)?;
    fs::write(&path, payload)?;
    Ok(path)
}
