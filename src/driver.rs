use std::path::{Path, PathBuf};

use crate::data::loader::load_file;
use crate::error::{PlotError, Result};
use crate::plot::BenchmarkPlotter;
use crate::plot::backend::PlotBackend;
use crate::plot::spec::{AxisScale, PlotSpec};

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

/// One entry of the plot table: where the data lives and how to draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotJob {
    /// Input table; relative paths resolve against the run's data directory.
    pub source: PathBuf,
    pub x_column: String,
    pub y_column: String,
    pub spec: PlotSpec,
}

impl PlotJob {
    pub fn new(
        source: impl Into<PathBuf>,
        x_column: impl Into<String>,
        y_column: impl Into<String>,
        spec: PlotSpec,
    ) -> Self {
        PlotJob {
            source: source.into(),
            x_column: x_column.into(),
            y_column: y_column.into(),
            spec,
        }
    }
}

pub const TIME_COLUMN: &str = "Time(ms)";
pub const ATTRIBUTES_COLUMN: &str = "Attributes";
pub const NODES_COLUMN: &str = "NodesRequired";

/// The four ABE benchmark plots: setup, keygen, encrypt, decrypt.
pub fn default_jobs() -> Vec<PlotJob> {
    let log2 = AxisScale::Log { base: 2.0 };
    vec![
        PlotJob::new(
            "ABE_Setup_Runtime.xlsx",
            TIME_COLUMN,
            ATTRIBUTES_COLUMN,
            PlotSpec::new("ABE Setup runtime")
                .with_labels("Milliseconds", "Attributes (universe size)")
                .with_x_scale(log2)
                .with_y_scale(AxisScale::log()),
        ),
        PlotJob::new(
            "ABE_Keygen_Runtime.xlsx",
            TIME_COLUMN,
            NODES_COLUMN,
            PlotSpec::new("ABE Keygen runtime").with_labels("Milliseconds", "Total # nodes"),
        ),
        PlotJob::new(
            "ABE_Encryption_Runtime.xlsx",
            TIME_COLUMN,
            ATTRIBUTES_COLUMN,
            PlotSpec::new("ABE Encrypt runtime").with_labels("Milliseconds", "Attributes"),
        ),
        PlotJob::new(
            "ABE_Decryption_Runtime.xlsx",
            TIME_COLUMN,
            NODES_COLUMN,
            PlotSpec::new("ABE Decrypt runtime")
                .with_labels("Milliseconds", "Total # nodes that have to be satisfied"),
        ),
    ]
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// What to do after a job fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Log the failure and carry on with the remaining jobs.
    #[default]
    Continue,
    /// Stop at the first failure.
    FailFast,
}

#[derive(Debug)]
pub struct JobOutcome {
    pub title: String,
    pub source: PathBuf,
    /// Number of points rendered, or why nothing was.
    pub result: Result<usize>,
}

/// Per-job results of a run, in job order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<JobOutcome>,
}

impl RunReport {
    pub fn rendered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn errors(&self) -> impl Iterator<Item = (&JobOutcome, &PlotError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o, e)))
    }
}

fn run_job<B: PlotBackend>(
    job: &PlotJob,
    data_dir: &Path,
    plotter: &mut BenchmarkPlotter<B>,
) -> Result<usize> {
    let path = data_dir.join(&job.source);
    let dataset = load_file(&path)?;
    let figure = plotter.plot(&dataset, &job.x_column, &job.y_column, &job.spec)?;
    Ok(figure.len())
}

/// Load and plot every job in order.
///
/// Each job opens its own figure, so a failure in one cannot leave points
/// behind for the next.
pub fn run<B: PlotBackend>(
    jobs: &[PlotJob],
    data_dir: &Path,
    plotter: &mut BenchmarkPlotter<B>,
    policy: ErrorPolicy,
) -> RunReport {
    let mut report = RunReport::default();

    for job in jobs {
        let result = run_job(job, data_dir, plotter);
        let failed = result.is_err();
        if let Err(e) = &result {
            log::error!("{}: {e}", job.spec.title);
        }
        report.outcomes.push(JobOutcome {
            title: job.spec.title.clone(),
            source: job.source.clone(),
            result,
        });

        if failed && policy == ErrorPolicy::FailFast {
            log::warn!(
                "stopping after failure, {} job(s) not run",
                jobs.len() - report.outcomes.len()
            );
            break;
        }
    }

    log::info!(
        "{} of {} plot(s) rendered",
        report.rendered(),
        report.outcomes.len()
    );
    report
}
