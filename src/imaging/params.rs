//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides resize targets, masks, and encoding attempts) and the
//! [`backend`](super::backend) (which does the actual pixel and codec work).
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100). Clamped on construction.
//! - [`Shape`]: Visible silhouette of the output: rectangle, circle, or ellipse.
//! - [`Unit`] / [`SizeSpec`]: Target size as the user entered it (pixels or centimeters at a dpi).
//! - [`TargetSize`]: Resolved pixel dimensions, always at least 1×1.
//! - [`ResizeParams`] / [`EncodeParams`]: What the backend should do for one step.

use super::calculations::{cm_to_px, round_px};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// Output silhouette.
///
/// Circle and ellipse add an alpha channel, which forces lossless output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Rectangle,
    /// Inscribed circle of diameter `min(width, height)`, centered.
    Circle,
    /// Ellipse inscribed in the full canvas.
    Ellipse,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::Rectangle => "rectangle",
            Shape::Circle => "circle",
            Shape::Ellipse => "ellipse",
        })
    }
}

impl FromStr for Shape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rectangle" | "rect" => Ok(Shape::Rectangle),
            "circle" => Ok(Shape::Circle),
            "ellipse" => Ok(Shape::Ellipse),
            other => Err(format!(
                "unknown shape '{other}' (expected rectangle, circle or ellipse)"
            )),
        }
    }
}

/// Unit the target width and height were entered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Px,
    Cm,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Unit::Px => "px",
            Unit::Cm => "cm",
        })
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "px" => Ok(Unit::Px),
            "cm" => Ok(Unit::Cm),
            other => Err(format!("unknown unit '{other}' (expected px or cm)")),
        }
    }
}

/// Target dimensions as entered by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeSpec {
    pub unit: Unit,
    pub width: f64,
    pub height: f64,
    /// Only meaningful for [`Unit::Cm`].
    pub dpi: u32,
    /// Lock height to width.
    pub square: bool,
}

impl SizeSpec {
    pub fn pixels(width: f64, height: f64) -> Self {
        Self {
            unit: Unit::Px,
            width,
            height,
            dpi: 300,
            square: false,
        }
    }

    pub fn centimeters(width: f64, height: f64, dpi: u32) -> Self {
        Self {
            unit: Unit::Cm,
            width,
            height,
            dpi,
            square: false,
        }
    }

    /// Height after applying the square lock.
    pub fn effective_height(&self) -> f64 {
        if self.square { self.width } else { self.height }
    }

    /// Resolve to concrete pixel dimensions.
    pub fn resolve(&self) -> TargetSize {
        let (w, h) = (self.width, self.effective_height());
        match self.unit {
            Unit::Px => TargetSize {
                width: round_px(w),
                height: round_px(h),
            },
            Unit::Cm => TargetSize {
                width: cm_to_px(w, self.dpi),
                height: cm_to_px(h, self.dpi),
            },
        }
    }
}

/// Concrete output dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

/// Lossy or lossless container for an encoded result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => ".jpg",
            OutputFormat::Png => ".png",
        }
    }
}

/// Parameters for an exact resize (no aspect preservation, no crop).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeParams {
    pub width: u32,
    pub height: u32,
}

/// Parameters for one encoding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeParams {
    Jpeg { quality: Quality },
    /// Lossless, best compression.
    Png,
}

impl EncodeParams {
    pub fn format(self) -> OutputFormat {
        match self {
            EncodeParams::Jpeg { .. } => OutputFormat::Jpeg,
            EncodeParams::Png => OutputFormat::Png,
        }
    }
}
