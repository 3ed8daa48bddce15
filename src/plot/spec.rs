use std::fmt;
use std::str::FromStr;

use crate::color::Color;
use crate::error::{PlotError, Result};

// ---------------------------------------------------------------------------
// AxisScale
// ---------------------------------------------------------------------------

/// How values along one axis map to display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AxisScale {
    #[default]
    Linear,
    /// Logarithmic with the given base (10 unless overridden).
    Log { base: f64 },
}

impl AxisScale {
    pub const DEFAULT_LOG_BASE: f64 = 10.0;

    /// Base-10 logarithmic scale.
    pub fn log() -> Self {
        AxisScale::Log {
            base: Self::DEFAULT_LOG_BASE,
        }
    }

    /// Logarithmic scale with an explicit base.
    pub fn log_base(base: f64) -> Result<Self> {
        let scale = AxisScale::Log { base };
        scale.validate()?;
        Ok(scale)
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            AxisScale::Linear => Ok(()),
            AxisScale::Log { base } if base.is_finite() && base > 0.0 && base != 1.0 => Ok(()),
            AxisScale::Log { base } => Err(PlotError::InvalidScale(format!(
                "log base must be positive, finite and not 1 (got {base})"
            ))),
        }
    }

    /// Map a data value to its display coordinate.
    ///
    /// Returns `None` for values the axis cannot show: `NaN`, infinities,
    /// and non-positive values on a log axis.
    pub fn transform(&self, v: f64) -> Option<f64> {
        if !v.is_finite() {
            return None;
        }
        let t = match *self {
            AxisScale::Linear => v,
            AxisScale::Log { .. } if v <= 0.0 => return None,
            AxisScale::Log { base } => v.log(base),
        };
        t.is_finite().then_some(t)
    }

    /// Map a display coordinate back to the data value (used for tick labels).
    pub fn inverse(&self, t: f64) -> f64 {
        match *self {
            AxisScale::Linear => t,
            AxisScale::Log { base } => base.powf(t),
        }
    }

    pub fn is_log(&self) -> bool {
        matches!(self, AxisScale::Log { .. })
    }
}

impl FromStr for AxisScale {
    type Err = PlotError;

    /// `linear`, `log` (base 10), `log2`, `log10`, `ln`, or `log:<base>`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(AxisScale::Linear),
            "log" | "log10" => Ok(AxisScale::log()),
            "log2" => AxisScale::log_base(2.0),
            "ln" => AxisScale::log_base(std::f64::consts::E),
            other => match other.strip_prefix("log:") {
                Some(base) => {
                    let base = base.parse::<f64>().map_err(|_| {
                        PlotError::InvalidScale(format!("bad log base in '{s}'"))
                    })?;
                    AxisScale::log_base(base)
                }
                None => Err(PlotError::InvalidScale(format!(
                    "unknown scale '{s}', expected linear or log"
                ))),
            },
        }
    }
}

impl fmt::Display for AxisScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisScale::Linear => write!(f, "linear"),
            AxisScale::Log { base } => write!(f, "log:{base}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Marker
// ---------------------------------------------------------------------------

/// Scatter marker shapes, named after matplotlib's marker codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Marker {
    /// `"."` – a small filled dot.
    #[default]
    Point,
    /// `"o"`
    Circle,
    /// `"x"`
    Cross,
    /// `"+"`
    Plus,
    /// `"s"`
    Square,
    /// `"^"`
    Triangle,
}

impl Marker {
    pub fn code(&self) -> &'static str {
        match self {
            Marker::Point => ".",
            Marker::Circle => "o",
            Marker::Cross => "x",
            Marker::Plus => "+",
            Marker::Square => "s",
            Marker::Triangle => "^",
        }
    }

    /// Pixel radius for a matplotlib-style marker area (`s`, in points²).
    ///
    /// `.` is drawn at half the diameter of `o`, as matplotlib does.
    pub fn radius(&self, area: f64) -> u32 {
        let r = area.max(0.0).sqrt() / 2.0;
        let r = match self {
            Marker::Point => r / 2.0,
            _ => r,
        };
        r.round().max(1.0) as u32
    }
}

impl FromStr for Marker {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim() {
            "." => Marker::Point,
            "o" => Marker::Circle,
            "x" => Marker::Cross,
            "+" => Marker::Plus,
            "s" => Marker::Square,
            "^" => Marker::Triangle,
            other => {
                return Err(PlotError::InvalidStyle(format!("unknown marker '{other}'")));
            }
        })
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// PlotSpec
// ---------------------------------------------------------------------------

/// How one dataset is rendered: text, axis scales and marker styling.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
    pub marker: Marker,
    /// Marker area in points², as matplotlib's `s`.
    pub marker_size: f64,
    pub color: Color,
    /// Canvas size in pixels.
    pub width: u32,
    pub height: u32,
}

impl PlotSpec {
    pub const DEFAULT_MARKER_SIZE: f64 = 100.0;
    /// A 10x10 inch figure at 100 dpi.
    pub const DEFAULT_CANVAS: (u32, u32) = (1000, 1000);

    pub fn new(title: impl Into<String>) -> Self {
        PlotSpec {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            x_scale: AxisScale::Linear,
            y_scale: AxisScale::Linear,
            marker: Marker::Point,
            marker_size: Self::DEFAULT_MARKER_SIZE,
            color: Color::BLUE,
            width: Self::DEFAULT_CANVAS.0,
            height: Self::DEFAULT_CANVAS.1,
        }
    }

    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn with_x_scale(mut self, scale: AxisScale) -> Self {
        self.x_scale = scale;
        self
    }

    pub fn with_y_scale(mut self, scale: AxisScale) -> Self {
        self.y_scale = scale;
        self
    }

    pub fn with_marker(mut self, marker: Marker, size: f64) -> Self {
        self.marker = marker;
        self.marker_size = size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Check scales and styling before any data is touched.
    pub fn validate(&self) -> Result<()> {
        self.x_scale.validate()?;
        self.y_scale.validate()?;
        if !(self.marker_size.is_finite() && self.marker_size > 0.0) {
            return Err(PlotError::InvalidStyle(format!(
                "marker size must be positive (got {})",
                self.marker_size
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(PlotError::InvalidStyle(format!(
                "canvas must be non-empty (got {}x{})",
                self.width, self.height
            )));
        }
        Ok(())
    }
}
