//! Plot layer: turns one dataset + column pair + spec into one figure.
//!
//! ```text
//!   Dataset ──┐
//!             ├─► BenchmarkPlotter::plot ──► Figure ──► PlotBackend::render
//!   PlotSpec ─┘     (extract, pair,                      (png / svg / memory)
//!                    scale, mask)
//! ```

pub mod backend;
pub mod figure;
pub mod spec;

use crate::data::model::Dataset;
use crate::error::{PlotError, Result};

use backend::PlotBackend;
use figure::Figure;
use spec::PlotSpec;

// ---------------------------------------------------------------------------
// BenchmarkPlotter
// ---------------------------------------------------------------------------

/// Renders datasets as scatter plots through a backend.
///
/// The plotter holds no drawing state of its own: every [`plot`] call builds
/// a new [`Figure`] and hands it to the backend exactly once.
///
/// [`plot`]: BenchmarkPlotter::plot
pub struct BenchmarkPlotter<B> {
    backend: B,
}

impl<B: PlotBackend> BenchmarkPlotter<B> {
    pub fn new(backend: B) -> Self {
        BenchmarkPlotter { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Scatter `y_column` against `x_column` using `spec`.
    ///
    /// Points keep the row order of the dataset. Rows with a `NaN` or
    /// infinite value, or a non-positive value on a log axis, are skipped
    /// with a warning.
    ///
    /// # Errors
    /// * [`PlotError::InvalidScale`] / [`PlotError::InvalidStyle`] – bad spec,
    ///   or data spanning more than an `f64` can hold
    /// * [`PlotError::ColumnNotFound`] – either column is absent
    /// * [`PlotError::EmptyDataset`] – no rows, or every row was skipped;
    ///   nothing is rendered in that case
    /// * [`PlotError::Backend`] – the backend failed to draw
    pub fn plot(
        &mut self,
        dataset: &Dataset,
        x_column: &str,
        y_column: &str,
        spec: &PlotSpec,
    ) -> Result<Figure> {
        let figure = build_figure(dataset, x_column, y_column, spec)?;

        self.backend
            .render(&figure)
            .map_err(|source| PlotError::Backend {
                title: spec.title.clone(),
                source,
            })?;

        log::info!(
            "plotted '{}': {} points from '{}' ({} vs {})",
            spec.title,
            figure.len(),
            dataset.name,
            y_column,
            x_column
        );
        Ok(figure)
    }
}

/// Extract, pair and scale the points for one figure without rendering it.
pub fn build_figure(
    dataset: &Dataset,
    x_column: &str,
    y_column: &str,
    spec: &PlotSpec,
) -> Result<Figure> {
    spec.validate()?;
    let xs = dataset.column(x_column)?;
    let ys = dataset.column(y_column)?;

    if dataset.is_empty() {
        return Err(PlotError::EmptyDataset {
            dataset: dataset.name.clone(),
        });
    }

    let mut points = Vec::with_capacity(xs.len());
    let mut display = Vec::with_capacity(xs.len());
    let mut masked = 0;

    for (row, (&x, &y)) in xs.iter().zip(ys).enumerate() {
        match (spec.x_scale.transform(x), spec.y_scale.transform(y)) {
            (Some(dx), Some(dy)) => {
                points.push((x, y));
                display.push((dx, dy));
            }
            _ => {
                log::warn!(
                    "'{}' data row {}: ({x_column}={x}, {y_column}={y}) cannot be shown on {} x {} axes, skipped",
                    dataset.name,
                    row + 1,
                    spec.x_scale,
                    spec.y_scale
                );
                masked += 1;
            }
        }
    }

    if display.is_empty() {
        return Err(PlotError::EmptyDataset {
            dataset: dataset.name.clone(),
        });
    }

    let figure = Figure {
        spec: spec.clone(),
        dataset: dataset.name.clone(),
        x_column: x_column.to_string(),
        y_column: y_column.to_string(),
        points,
        display,
        masked,
    };
    if !figure.has_drawable_ranges() {
        return Err(PlotError::InvalidStyle(format!(
            "'{}': values of {x_column} / {y_column} span too wide to draw (x {:?}, y {:?})",
            dataset.name,
            figure.x_range(),
            figure.y_range()
        )));
    }
    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::backend::RecordingBackend;
    use super::spec::AxisScale;
    use super::*;

    fn setup_rows() -> Dataset {
        Dataset::from_columns(
            "setup",
            [
                ("Attributes", vec![1.0, 2.0, 4.0]),
                ("Time(ms)", vec![10.0, 20.0, 40.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn log_base_two_x_axis_is_transformed() {
        let mut plotter = BenchmarkPlotter::new(RecordingBackend::default());
        let spec = PlotSpec::new("ABE Setup runtime")
            .with_x_scale(AxisScale::log_base(2.0).unwrap())
            .with_y_scale(AxisScale::log());

        let fig = plotter
            .plot(&setup_rows(), "Time(ms)", "Attributes", &spec)
            .unwrap();

        let xs: Vec<f64> = fig.display.iter().map(|p| p.0).collect();
        let expected = [10f64.log2(), 20f64.log2(), 40f64.log2()];
        for (got, want) in xs.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{got} != {want}");
        }
        assert_eq!(fig.points, [(10.0, 1.0), (20.0, 2.0), (40.0, 4.0)]);
        assert_eq!(plotter.backend().figures.len(), 1);
    }

    #[test]
    fn missing_column_renders_nothing() {
        let mut plotter = BenchmarkPlotter::new(RecordingBackend::default());
        let err = plotter
            .plot(&setup_rows(), "Time(ms)", "NodesRequired", &PlotSpec::new("t"))
            .unwrap_err();
        assert!(matches!(err, PlotError::ColumnNotFound { ref column, .. } if column == "NodesRequired"));
        assert!(plotter.backend().figures.is_empty());
    }

    #[test]
    fn empty_dataset_is_an_error() {
        let empty = Dataset::from_columns(
            "empty",
            [("Attributes", Vec::new()), ("Time(ms)", Vec::new())],
        )
        .unwrap();
        let mut plotter = BenchmarkPlotter::new(RecordingBackend::default());
        let err = plotter
            .plot(&empty, "Time(ms)", "Attributes", &PlotSpec::new("t"))
            .unwrap_err();
        assert!(matches!(err, PlotError::EmptyDataset { .. }));
        assert!(plotter.backend().figures.is_empty());
    }

    #[test]
    fn non_positive_values_are_masked_on_log_axes() {
        let ds = Dataset::from_columns(
            "enc",
            [
                ("Attributes", vec![0.0, 1.0, 2.0]),
                ("Time(ms)", vec![1.0, f64::NAN, 3.0]),
            ],
        )
        .unwrap();
        let spec = PlotSpec::new("t").with_y_scale(AxisScale::log());
        let fig = build_figure(&ds, "Time(ms)", "Attributes", &spec).unwrap();
        assert_eq!(fig.points, [(3.0, 2.0)]);
        assert_eq!(fig.masked, 2);
    }

    #[test]
    fn infinite_values_are_masked() {
        let ds = Dataset::from_columns(
            "setup",
            [
                ("Attributes", vec![1.0, 2.0, 4.0]),
                ("Time(ms)", vec![10.0, f64::INFINITY, 40.0]),
            ],
        )
        .unwrap();
        let fig = build_figure(&ds, "Time(ms)", "Attributes", &PlotSpec::new("t")).unwrap();
        assert_eq!(fig.points, [(10.0, 1.0), (40.0, 4.0)]);
        assert_eq!(fig.masked, 1);
        assert_eq!(fig.x_range(), 8.5..41.5);
    }

    #[test]
    fn span_wider_than_f64_renders_nothing() {
        let ds = Dataset::from_columns(
            "huge",
            [("Time(ms)", vec![-1e308, 1e308]), ("Attributes", vec![1.0, 2.0])],
        )
        .unwrap();
        let mut plotter = BenchmarkPlotter::new(RecordingBackend::default());
        let err = plotter
            .plot(&ds, "Time(ms)", "Attributes", &PlotSpec::new("t"))
            .unwrap_err();
        assert!(matches!(err, PlotError::InvalidStyle(_)), "{err}");
        assert!(plotter.backend().figures.is_empty());
    }

    #[test]
    fn all_rows_masked_is_empty() {
        let ds = Dataset::from_columns("d", [("a", vec![0.0]), ("b", vec![1.0])]).unwrap();
        let spec = PlotSpec::new("t").with_x_scale(AxisScale::log());
        let err = build_figure(&ds, "a", "b", &spec).unwrap_err();
        assert!(matches!(err, PlotError::EmptyDataset { .. }));
    }

    #[test]
    fn invalid_scale_is_rejected_before_rendering() {
        let spec = PlotSpec::new("t").with_x_scale(AxisScale::Log { base: 0.0 });
        let mut plotter = BenchmarkPlotter::new(RecordingBackend::default());
        let err = plotter
            .plot(&setup_rows(), "Time(ms)", "Attributes", &spec)
            .unwrap_err();
        assert!(matches!(err, PlotError::InvalidScale(_)));
        assert!(plotter.backend().figures.is_empty());
    }

    #[test]
    fn repeated_calls_give_identical_figures() {
        let mut plotter = BenchmarkPlotter::new(RecordingBackend::default());
        let spec = PlotSpec::new("t").with_x_scale(AxisScale::log());
        let a = plotter.plot(&setup_rows(), "Time(ms)", "Attributes", &spec).unwrap();
        let b = plotter.plot(&setup_rows(), "Time(ms)", "Attributes", &spec).unwrap();
        assert_eq!(a, b);
        let backend = plotter.into_backend();
        assert_eq!(backend.figures.len(), 2);
        assert_eq!(backend.figures[0].display, backend.figures[1].display);
    }

    #[test]
    fn backend_failure_names_the_plot() {
        struct Broken;
        impl PlotBackend for Broken {
            fn render(&mut self, _: &Figure) -> anyhow::Result<()> {
                anyhow::bail!("disk full")
            }
        }
        let mut plotter = BenchmarkPlotter::new(Broken);
        let err = plotter
            .plot(&setup_rows(), "Time(ms)", "Attributes", &PlotSpec::new("ABE Setup runtime"))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ABE Setup runtime") && msg.contains("disk full"), "{msg}");
    }
}
