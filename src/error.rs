use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between reading a table and drawing it.
#[derive(Debug, Error)]
pub enum PlotError {
    /// The input file is missing, unreadable, or not a table we understand.
    #[error("failed to read data source {}: {source:#}", path.display())]
    DataSource {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("dataset '{dataset}' has no column '{column}' (available: {})", available.join(", "))]
    ColumnNotFound {
        dataset: String,
        column: String,
        available: Vec<String>,
    },

    #[error("dataset '{dataset}': column '{column}' has {found} rows, expected {expected}")]
    ColumnLengthMismatch {
        dataset: String,
        column: String,
        expected: usize,
        found: usize,
    },

    /// Raised instead of rendering a figure with no points.
    #[error("dataset '{dataset}' has no plottable rows")]
    EmptyDataset { dataset: String },

    #[error("invalid axis scale: {0}")]
    InvalidScale(String),

    #[error("invalid plot style: {0}")]
    InvalidStyle(String),

    #[error("failed to render '{title}': {source:#}")]
    Backend {
        title: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid plot configuration: {0}")]
    Config(String),
}

pub type Result<T, E = PlotError> = std::result::Result<T, E>;
