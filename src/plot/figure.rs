use std::ops::Range;

use super::spec::PlotSpec;

/// One fully resolved scatter plot, ready for a backend.
///
/// `points` holds the raw `(x, y)` pairs in row order; `display` holds the
/// same pairs after each axis scale was applied. Masked rows appear in
/// neither.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub spec: PlotSpec,
    /// Name of the dataset the points came from.
    pub dataset: String,
    pub x_column: String,
    pub y_column: String,
    pub points: Vec<(f64, f64)>,
    pub display: Vec<(f64, f64)>,
    /// Rows dropped because a value could not be shown on its axis.
    pub masked: usize,
}

impl Figure {
    /// Fraction of the data span added on each side, as matplotlib's margins.
    pub const MARGIN: f64 = 0.05;

    pub fn len(&self) -> usize {
        self.display.len()
    }

    pub fn is_empty(&self) -> bool {
        self.display.is_empty()
    }

    /// Whether both padded axis ranges have a finite width.
    ///
    /// Finite points can still span more than `f64::MAX` (e.g. `-1e308` and
    /// `1e308`); such a figure cannot be laid out.
    pub fn has_drawable_ranges(&self) -> bool {
        let (x, y) = (self.x_range(), self.y_range());
        (x.end - x.start).is_finite() && (y.end - y.start).is_finite()
    }

    /// Display-coordinate range of the x axis, padded by [`Self::MARGIN`].
    pub fn x_range(&self) -> Range<f64> {
        padded_range(self.display.iter().map(|p| p.0))
    }

    /// Display-coordinate range of the y axis, padded by [`Self::MARGIN`].
    pub fn y_range(&self) -> Range<f64> {
        padded_range(self.display.iter().map(|p| p.1))
    }
}

fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    // Halves first so the span of two huge values does not overflow.
    let half_span = max / 2.0 - min / 2.0;
    if half_span.abs() < f64::EPSILON {
        // A single distinct value still needs a visible axis.
        return (min - 0.5)..(max + 0.5);
    }
    let pad = half_span * 2.0 * Figure::MARGIN;
    (min - pad)..(max + pad)
}
