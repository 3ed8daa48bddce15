use std::fmt::Display;
use std::path::PathBuf;

use anyhow::Context;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::figure::Figure;
use super::spec::Marker;

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// Something that turns a [`Figure`] into pixels (or keeps it for later).
///
/// Every call gets a complete figure; implementations must not carry drawing
/// state from one call into the next.
pub trait PlotBackend {
    fn render(&mut self, figure: &Figure) -> anyhow::Result<()>;
}

impl<B: PlotBackend + ?Sized> PlotBackend for &mut B {
    fn render(&mut self, figure: &Figure) -> anyhow::Result<()> {
        (**self).render(figure)
    }
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// Keeps every rendered figure in order. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub figures: Vec<Figure>,
}

impl RecordingBackend {
    pub fn titles(&self) -> Vec<&str> {
        self.figures.iter().map(|f| f.spec.title.as_str()).collect()
    }
}

impl PlotBackend for RecordingBackend {
    fn render(&mut self, figure: &Figure) -> anyhow::Result<()> {
        self.figures.push(figure.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Image file backend (plotters)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// Writes one image per figure into `out_dir`, named after the title.
#[derive(Debug)]
pub struct FileBackend {
    out_dir: PathBuf,
    format: ImageFormat,
    written: Vec<PathBuf>,
}

impl FileBackend {
    pub fn new(out_dir: impl Into<PathBuf>, format: ImageFormat) -> Self {
        FileBackend {
            out_dir: out_dir.into(),
            format,
            written: Vec::new(),
        }
    }

    /// Paths written so far, in render order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Output path for a title; repeated titles get a numeric suffix.
    fn path_for(&self, title: &str) -> PathBuf {
        let stem = slug(title);
        let ext = self.format.extension();
        let mut path = self.out_dir.join(format!("{stem}.{ext}"));
        let mut n = 2;
        while self.written.contains(&path) {
            path = self.out_dir.join(format!("{stem}_{n}.{ext}"));
            n += 1;
        }
        path
    }
}

impl PlotBackend for FileBackend {
    fn render(&mut self, figure: &Figure) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("creating {}", self.out_dir.display()))?;

        let path = self.path_for(&figure.spec.title);
        let size = (figure.spec.width, figure.spec.height);
        let drawn = match self.format {
            ImageFormat::Png => draw(BitMapBackend::new(&path, size).into_drawing_area(), figure),
            ImageFormat::Svg => draw(SVGBackend::new(&path, size).into_drawing_area(), figure),
        };
        drawn.with_context(|| format!("drawing {}", path.display()))?;

        log::info!("wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

fn draw_err<E: Display>(e: E) -> anyhow::Error {
    anyhow::anyhow!("{e}")
}

/// Draw one scatter chart onto a fresh drawing area and flush it.
fn draw<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, figure: &Figure) -> anyhow::Result<()> {
    let spec = &figure.spec;
    root.fill(&WHITE).map_err(draw_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(figure.x_range(), figure.y_range())
        .map_err(draw_err)?;

    // Log axes are drawn in transformed space; ticks show the data value.
    let (x_scale, y_scale) = (spec.x_scale, spec.y_scale);
    let x_fmt = move |v: &f64| tick_label(x_scale.inverse(*v));
    let y_fmt = move |v: &f64| tick_label(y_scale.inverse(*v));

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .axis_desc_style(("sans-serif", 22))
        .label_style(("sans-serif", 16))
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .draw()
        .map_err(draw_err)?;

    let color = RGBColor(spec.color.red, spec.color.green, spec.color.blue);
    let r = spec.marker.radius(spec.marker_size);
    let ri = r as i32;
    let points = figure.display.iter().copied();

    match spec.marker {
        Marker::Point | Marker::Circle => {
            chart
                .draw_series(points.map(|p| Circle::new(p, r, color.filled())))
                .map_err(draw_err)?;
        }
        Marker::Cross => {
            chart
                .draw_series(points.map(|p| Cross::new(p, r, color.stroke_width(2))))
                .map_err(draw_err)?;
        }
        Marker::Plus => {
            chart
                .draw_series(points.map(|p| {
                    EmptyElement::at(p)
                        + PathElement::new(vec![(-ri, 0), (ri, 0)], color.stroke_width(2))
                        + PathElement::new(vec![(0, -ri), (0, ri)], color.stroke_width(2))
                }))
                .map_err(draw_err)?;
        }
        Marker::Square => {
            chart
                .draw_series(points.map(|p| {
                    EmptyElement::at(p) + Rectangle::new([(-ri, -ri), (ri, ri)], color.filled())
                }))
                .map_err(draw_err)?;
        }
        Marker::Triangle => {
            chart
                .draw_series(points.map(|p| TriangleMarker::new(p, r, color.filled())))
                .map_err(draw_err)?;
        }
    }

    root.present().map_err(draw_err)?;
    Ok(())
}

/// Compact tick text: integers plain, very large or small values in
/// scientific notation.
fn tick_label(v: f64) -> String {
    let a = v.abs();
    if a != 0.0 && !(1e-2..1e5).contains(&a) {
        format!("{v:.1e}")
    } else if (v - v.round()).abs() < 1e-9 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

/// `"ABE Setup runtime"` → `"abe_setup_runtime"`.
pub fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "figure".to_string()
    } else {
        trimmed.to_string()
    }
}
