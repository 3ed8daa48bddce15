//! Scatter plots of attribute-based-encryption benchmark runtimes.
//!
//! A run walks a table of [`driver::PlotJob`]s: each job loads one table of
//! measurements, picks two numeric columns and renders them through a
//! [`plot::backend::PlotBackend`].

pub mod color;
pub mod config;
pub mod data;
pub mod driver;
pub mod error;
pub mod plot;

pub use data::model::Dataset;
pub use driver::{ErrorPolicy, PlotJob, RunReport, default_jobs, run};
pub use error::PlotError;
pub use plot::BenchmarkPlotter;
pub use plot::figure::Figure;
pub use plot::spec::{AxisScale, Marker, PlotSpec};
