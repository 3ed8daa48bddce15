use std::fmt;
use std::str::FromStr;

use palette::Srgb;

use crate::error::PlotError;

// ---------------------------------------------------------------------------
// Marker colour
// ---------------------------------------------------------------------------

/// An opaque sRGB colour for scatter markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Color { red, green, blue }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLUE
    }
}

impl From<Srgb<u8>> for Color {
    fn from(c: Srgb<u8>) -> Self {
        Color::rgb(c.red, c.green, c.blue)
    }
}

/// Expand matplotlib's single-letter colour codes to SVG colour names.
fn short_code(s: &str) -> Option<&'static str> {
    Some(match s {
        "b" => "blue",
        "g" => "green",
        "r" => "red",
        "c" => "cyan",
        "m" => "magenta",
        "y" => "yellow",
        "k" => "black",
        "w" => "white",
        _ => return None,
    })
}

impl FromStr for Color {
    type Err = PlotError;

    /// Accepts SVG/CSS colour names (`"blue"`), matplotlib one-letter codes
    /// (`"b"`), and hex triples (`"#1f77b4"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Srgb::<u8>::from_str(hex)
                .map(Color::from)
                .map_err(|e| PlotError::InvalidStyle(format!("bad hex colour '{s}': {e}")));
        }
        let lower = s.to_ascii_lowercase();
        let name = short_code(&lower).unwrap_or(&lower);
        palette::named::from_str(name)
            .map(Color::from)
            .ok_or_else(|| PlotError::InvalidStyle(format!("unknown colour '{s}'")))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}
