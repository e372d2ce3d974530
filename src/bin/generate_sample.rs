use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// (treatment, plateau fitness, growth rate)
const TREATMENTS: [(&str, f64, f64); 3] = [
    ("ctrl", 1.0, 0.010),
    ("heat", 0.8, 0.006),
    ("mutator", 1.3, 0.014),
];
const TRIALS: u32 = 5;
const UPDATES: std::ops::RangeInclusive<u32> = 0..=1000;
const STEP: usize = 50;

fn logistic(t: f64, plateau: f64, rate: f64) -> f64 {
    plateau / (1.0 + (-(t - 400.0) * rate).exp())
}

/// Box-Muller transform for normal distribution
fn gauss(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-15);
    let u2: f64 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

fn write_trial(path: &Path, plateau: f64, rate: f64, rng: &mut StdRng) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = GzEncoder::new(BufWriter::new(file), Compression::default());

    writeln!(out, "update fitness size")?;
    for update in UPDATES.step_by(STEP) {
        let fitness = (logistic(update as f64, plateau, rate) + gauss(rng, 0.0, 0.05)).max(0.0);
        let size = 100 + rng.random_range(0..20) + update / 10;
        writeln!(out, "{update} {fitness:.5} {size}")?;
    }

    out.finish()
        .and_then(|mut w| w.flush())
        .with_context(|| format!("finishing {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_runs"));
    let mut rng = StdRng::seed_from_u64(42);

    let mut written = 0;
    for (treatment, plateau, rate) in TREATMENTS {
        for trial in 1..=TRIALS {
            let dir = out_dir.join(format!("{treatment}_{trial}"));
            fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
            let path = dir.join("fitness.dat.gz");
            write_trial(&path, plateau, rate, &mut rng)?;
            log::debug!("wrote {}", path.display());
            written += 1;
        }
    }

    println!(
        "Wrote {written} trials ({} treatments × {TRIALS}) to {}",
        TREATMENTS.len(),
        out_dir.display()
    );
    Ok(())
}
