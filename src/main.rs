use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use abe_bench_plot::config::PlotConfig;
use abe_bench_plot::plot::backend::{FileBackend, ImageFormat};
use abe_bench_plot::{BenchmarkPlotter, ErrorPolicy, default_jobs, run};

/// Render ABE benchmark runtimes (setup, keygen, encrypt, decrypt) as
/// scatter plots.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Directory holding the input tables.
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Directory the images are written to (created if missing).
    #[arg(long, default_value = "plots")]
    out_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = ImageFormat::Png)]
    format: ImageFormat,

    /// JSON plot table to use instead of the built-in four ABE plots.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the built-in plot table as JSON and exit.
    #[arg(long)]
    print_config: bool,

    /// Stop at the first plot that fails.
    #[arg(long)]
    fail_fast: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", PlotConfig::from_jobs(&default_jobs()).to_json_pretty()?);
        return Ok(ExitCode::SUCCESS);
    }

    let jobs = match &cli.config {
        Some(path) => PlotConfig::load(path)?
            .to_jobs()
            .with_context(|| format!("loading plot table from {}", path.display()))?,
        None => default_jobs(),
    };

    let policy = if cli.fail_fast {
        ErrorPolicy::FailFast
    } else {
        ErrorPolicy::Continue
    };

    let mut plotter = BenchmarkPlotter::new(FileBackend::new(&cli.out_dir, cli.format));
    let report = run(&jobs, &cli.data_dir, &mut plotter, policy);

    for path in plotter.backend().written() {
        println!("{}", path.display());
    }
    for (outcome, err) in report.errors() {
        eprintln!("error: {} ({}): {err}", outcome.title, outcome.source.display());
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
