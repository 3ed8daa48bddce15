use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::driver::PlotJob;
use crate::error::{PlotError, Result};
use crate::plot::spec::{AxisScale, Marker, PlotSpec};

// ---------------------------------------------------------------------------
// On-disk plot table
// ---------------------------------------------------------------------------

/// JSON form of the plot table:
///
/// ```json
/// { "plots": [ { "source": "ABE_Setup_Runtime.xlsx",
///                "x_column": "Time(ms)", "y_column": "Attributes",
///                "title": "ABE Setup runtime",
///                "x_scale": { "kind": "log", "base": 2 } } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    pub plots: Vec<JobConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    pub source: PathBuf,
    pub x_column: String,
    pub y_column: String,
    pub title: String,
    #[serde(default)]
    pub x_label: String,
    #[serde(default)]
    pub y_label: String,
    #[serde(default)]
    pub x_scale: ScaleConfig,
    #[serde(default)]
    pub y_scale: ScaleConfig,
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default = "default_size")]
    pub size: f64,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_marker() -> String {
    Marker::default().code().to_string()
}

fn default_size() -> f64 {
    PlotSpec::DEFAULT_MARKER_SIZE
}

fn default_color() -> String {
    "blue".to_string()
}

fn default_width() -> u32 {
    PlotSpec::DEFAULT_CANVAS.0
}

fn default_height() -> u32 {
    PlotSpec::DEFAULT_CANVAS.1
}

/// `kind` is `"linear"` or `"log"`; `base` only applies to `"log"`.
///
/// Without a `base`, `kind` may also be any shorthand [`AxisScale`] parses:
/// `"log2"`, `"log10"`, `"ln"` or `"log:<base>"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleConfig {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<f64>,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        ScaleConfig {
            kind: "linear".to_string(),
            base: None,
        }
    }
}

impl TryFrom<&ScaleConfig> for AxisScale {
    type Error = PlotError;

    fn try_from(cfg: &ScaleConfig) -> Result<Self> {
        match (cfg.kind.trim().to_ascii_lowercase().as_str(), cfg.base) {
            ("linear", None) => Ok(AxisScale::Linear),
            ("linear", Some(base)) => Err(PlotError::InvalidScale(format!(
                "base {base} given for a linear scale"
            ))),
            ("log", base) => AxisScale::log_base(base.unwrap_or(AxisScale::DEFAULT_LOG_BASE)),
            (_, None) => cfg.kind.parse(),
            (_, Some(base)) => Err(PlotError::InvalidScale(format!(
                "base {base} given with scale kind '{}', use kind \"log\"",
                cfg.kind
            ))),
        }
    }
}

impl From<AxisScale> for ScaleConfig {
    fn from(scale: AxisScale) -> Self {
        match scale {
            AxisScale::Linear => ScaleConfig::default(),
            AxisScale::Log { base } => ScaleConfig {
                kind: "log".to_string(),
                base: Some(base),
            },
        }
    }
}

impl JobConfig {
    pub fn to_job(&self) -> Result<PlotJob> {
        let spec = PlotSpec::new(self.title.clone())
            .with_labels(self.x_label.clone(), self.y_label.clone())
            .with_x_scale(AxisScale::try_from(&self.x_scale)?)
            .with_y_scale(AxisScale::try_from(&self.y_scale)?)
            .with_marker(self.marker.parse()?, self.size)
            .with_color(self.color.parse::<Color>()?)
            .with_canvas(self.width, self.height);
        spec.validate()?;

        Ok(PlotJob::new(
            self.source.clone(),
            self.x_column.clone(),
            self.y_column.clone(),
            spec,
        ))
    }
}

impl From<&PlotJob> for JobConfig {
    fn from(job: &PlotJob) -> Self {
        let spec = &job.spec;
        JobConfig {
            source: job.source.clone(),
            x_column: job.x_column.clone(),
            y_column: job.y_column.clone(),
            title: spec.title.clone(),
            x_label: spec.x_label.clone(),
            y_label: spec.y_label.clone(),
            x_scale: spec.x_scale.into(),
            y_scale: spec.y_scale.into(),
            marker: spec.marker.code().to_string(),
            size: spec.marker_size,
            color: spec.color.to_string(),
            width: spec.width,
            height: spec.height,
        }
    }
}

impl PlotConfig {
    pub fn from_jobs(jobs: &[PlotJob]) -> Self {
        PlotConfig {
            plots: jobs.iter().map(JobConfig::from).collect(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| PlotError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PlotError::Config(format!("reading {}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| PlotError::Config(format!("{}: {e}", path.display())))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PlotError::Config(e.to_string()))
    }

    /// Convert every entry; the first invalid one fails the whole table.
    pub fn to_jobs(&self) -> Result<Vec<PlotJob>> {
        if self.plots.is_empty() {
            return Err(PlotError::Config("no plots configured".to_string()));
        }
        self.plots
            .iter()
            .enumerate()
            .map(|(i, cfg)| {
                cfg.to_job().map_err(|e| match e {
                    PlotError::InvalidScale(msg) => {
                        PlotError::InvalidScale(format!("plot #{i} '{}': {msg}", cfg.title))
                    }
                    other => other,
                })
            })
            .collect()
    }
}
