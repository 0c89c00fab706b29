//! Output frame description.
//!
//! The logical canvas is 64x64 units regardless of final pixel size;
//! callers rescale. A [`DrawCommand`] is one positioned, colored, sized
//! cell; list order is the compositing contract — later commands paint
//! over earlier ones.

use crate::color::Rgb;

pub const CANVAS_UNITS: f64 = 64.0;

/// Command extents must lie inside this band. The small overhang leaves
/// room for hair volume and dangling jewelry.
pub const MIN_EXTENT: f64 = -8.0;
pub const MAX_EXTENT: f64 = 72.0;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DrawCommand {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Rgb,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgb,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BackgroundSpec {
    pub gradient_stops: Vec<GradientStop>,
    pub texture_opacity: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Frame {
    pub background: BackgroundSpec,
    pub commands: Vec<DrawCommand>,
}

/// Append-only command sink every renderer writes through.
///
/// Clips each command to the documented extent band and drops degenerate
/// ones, so no renderer can emit an out-of-canvas or non-positive-size
/// command.
#[derive(Clone, Debug, Default)]
pub struct CommandBuf {
    commands: Vec<DrawCommand>,
}

impl CommandBuf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    pub fn extend(&mut self, other: CommandBuf) {
        self.commands.extend(other.commands);
    }

    /// One opaque unit cell.
    pub fn cell(&mut self, x: f64, y: f64, color: Rgb) {
        self.rect(x, y, 1.0, 1.0, color, None);
    }

    /// One translucent unit cell.
    pub fn cell_a(&mut self, x: f64, y: f64, color: Rgb, opacity: f64) {
        self.rect(x, y, 1.0, 1.0, color, Some(opacity));
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb, opacity: Option<f64>) {
        if !(x.is_finite() && y.is_finite() && width.is_finite() && height.is_finite()) {
            return;
        }
        let x0 = x.max(MIN_EXTENT);
        let y0 = y.max(MIN_EXTENT);
        let x1 = (x + width).min(MAX_EXTENT);
        let y1 = (y + height).min(MAX_EXTENT);
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let opacity = opacity.map(|o| o.clamp(0.0, 1.0)).filter(|&o| o < 1.0);
        if opacity == Some(0.0) {
            return;
        }
        self.commands.push(DrawCommand {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
            color,
            opacity,
        });
    }

    /// Horizontal run of unit height, from `x0` (inclusive) to `x1`
    /// (exclusive).
    pub fn hspan(&mut self, x0: f64, x1: f64, y: f64, color: Rgb) {
        self.rect(x0, y, x1 - x0, 1.0, color, None);
    }
}
