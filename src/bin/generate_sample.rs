use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use abe_bench_plot::config::PlotConfig;
use abe_bench_plot::default_jobs;
use abe_bench_plot::driver::{ATTRIBUTES_COLUMN, NODES_COLUMN, TIME_COLUMN};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One benchmark phase: file, parameter column, sweep and linear cost model.
struct Phase {
    file: &'static str,
    label: &'static str,
    column: &'static str,
    sweep: Vec<u32>,
    /// Fixed cost in ms.
    base_ms: f64,
    /// Cost per attribute / node in ms.
    per_unit_ms: f64,
}

fn phases() -> Vec<Phase> {
    vec![
        Phase {
            file: "ABE_Setup_Runtime.csv",
            label: "Setup with 2^{i} attributes",
            column: ATTRIBUTES_COLUMN,
            sweep: (0..17).map(|i| 1u32 << i).collect(),
            base_ms: 1.2,
            per_unit_ms: 0.35,
        },
        Phase {
            file: "ABE_Keygen_Runtime.csv",
            label: "Keygen with tree of size {i}",
            column: NODES_COLUMN,
            sweep: (1..100).collect(),
            base_ms: 0.4,
            per_unit_ms: 0.3,
        },
        Phase {
            file: "ABE_Encryption_Runtime.csv",
            label: "Encrypt under {i} attributes",
            column: ATTRIBUTES_COLUMN,
            sweep: (0..100).collect(),
            base_ms: 1.5,
            per_unit_ms: 0.35,
        },
        Phase {
            file: "ABE_Decryption_Runtime.csv",
            label: "Decrypt with tree of size {i}",
            column: NODES_COLUMN,
            sweep: (1..100).collect(),
            base_ms: 1.8,
            per_unit_ms: 1.1,
        },
    ]
}

fn write_phase(dir: &Path, phase: &Phase, rng: &mut SimpleRng) -> Result<PathBuf> {
    let path = dir.join(phase.file);
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["Benchmark", phase.column, TIME_COLUMN])?;

    for &n in &phase.sweep {
        let mean = phase.base_ms + phase.per_unit_ms * n as f64;
        // 3 % multiplicative noise, never below a tenth of the mean.
        let ms = rng.gauss(mean, 0.03 * mean).max(0.1 * mean);
        writer.write_record([
            phase.label.replace("{i}", &n.to_string()),
            n.to_string(),
            format!("{ms:.4}"),
        ])?;
    }
    writer.flush()?;
    Ok(path)
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "sample_data".to_string()),
    );
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    for phase in phases() {
        let path = write_phase(&out_dir, &phase, &mut rng)?;
        println!("Wrote {} rows to {}", phase.sweep.len(), path.display());
    }

    // Same plot table as the built-in one, pointed at the CSV files.
    let mut jobs = default_jobs();
    for job in &mut jobs {
        job.source.set_extension("csv");
    }
    let config_path = out_dir.join("plots.json");
    std::fs::write(&config_path, PlotConfig::from_jobs(&jobs).to_json_pretty()?)
        .with_context(|| format!("writing {}", config_path.display()))?;
    println!("Wrote plot table to {}", config_path.display());

    Ok(())
}
