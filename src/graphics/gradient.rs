//! Linear gradient shader used for the progress track and fill.

use super::Color;

/// Stop positions of every progress gradient: left edge, slightly right of
/// center, right edge.
pub const GRADIENT_STOPS: [f32; 3] = [0.0, 0.52, 1.0];

/// How a gradient fills space outside its start and end points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileMode {
    /// Repeat the edge colors.
    Clamp,
}

/// A three-stop linear gradient between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub colors: [Color; 3],
    pub positions: [f32; 3],
    pub tile_mode: TileMode,
}

impl LinearGradient {
    /// Horizontal gradient from `(0, 0)` to `(width, 0)`: first color on the
    /// left, last on the right.
    ///
    /// The span depends on the resolved width, so callers build a fresh one
    /// on every paint pass.
    pub fn horizontal(colors: [Color; 3], width: f32) -> Self {
        Self {
            x0: 0.0,
            y0: 0.0,
            x1: width,
            y1: 0.0,
            colors,
            positions: GRADIENT_STOPS,
            tile_mode: TileMode::Clamp,
        }
    }

    /// Sample the gradient at a point.
    pub fn color_at(&self, x: f32, y: f32) -> Color {
        let dx = self.x1 - self.x0;
        let dy = self.y1 - self.y0;
        let length_sq = dx * dx + dy * dy;
        let t = if length_sq > 0.0 {
            ((x - self.x0) * dx + (y - self.y0) * dy) / length_sq
        } else {
            0.0
        };
        let t = match self.tile_mode {
            TileMode::Clamp if t.is_nan() => 0.0,
            TileMode::Clamp => t.clamp(0.0, 1.0),
        };

        let [p0, p1, p2] = self.positions;
        let [c0, c1, c2] = self.colors;
        if t <= p0 {
            c0
        } else if t <= p1 {
            c0.lerp(c1, (t - p0) / (p1 - p0))
        } else if t <= p2 {
            c1.lerp(c2, (t - p1) / (p2 - p1))
        } else {
            c2
        }
    }
}
