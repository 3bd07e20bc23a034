//! Drawing primitives shared by the progress widgets.
//!
//! The widgets never talk to a concrete renderer. They describe each pass as
//! a handful of calls on a [`Canvas`]: stroke an arc, fill a rounded
//! rectangle or an oval, draw a run of text. A canvas also owns text
//! measurement, since glyph metrics belong to whoever rasterizes the glyphs.
//!
//! - [`gradient`] builds the horizontal three-stop shaders
//! - [`terminal`] rasterizes canvas calls into a ratatui buffer

pub mod gradient;
pub mod terminal;

pub use gradient::{LinearGradient, TileMode, GRADIENT_STOPS};
pub use terminal::TerminalCanvas;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StyleError;

/// A packed ARGB color, `0xAARRGGBB`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const TRANSPARENT: Color = Color(0x0000_0000);
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Linear interpolation per channel, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color::from_argb(
            mix(self.alpha(), other.alpha()),
            mix(self.red(), other.red()),
            mix(self.green(), other.green()),
            mix(self.blue(), other.blue()),
        )
    }

    /// Composite this color over an opaque background.
    pub fn over(self, background: Color) -> Color {
        let a = self.alpha() as f32 / 255.0;
        let mix = |fg: u8, bg: u8| (fg as f32 * a + bg as f32 * (1.0 - a)).round() as u8;
        Color::from_argb(
            0xFF,
            mix(self.red(), background.red()),
            mix(self.green(), background.green()),
            mix(self.blue(), background.blue()),
        )
    }

    /// Parse `#RRGGBB` or `#AARRGGBB`. Six-digit colors are fully opaque.
    pub fn parse(value: &str) -> Result<Color, StyleError> {
        let invalid = || StyleError::InvalidColor(value.to_string());
        let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        let packed = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        match hex.len() {
            6 => Ok(Color(0xFF00_0000 | packed)),
            8 => Ok(Color(packed)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

impl From<Color> for ratatui::style::Color {
    fn from(color: Color) -> Self {
        ratatui::style::Color::Rgb(color.red(), color.green(), color.blue())
    }
}

/// An axis-aligned rectangle in device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    pub fn is_empty(&self) -> bool {
        !(self.left < self.right && self.top < self.bottom)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// Whether shapes are filled or outlined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintStyle {
    Fill,
    Stroke,
}

/// Decoration at the open ends of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeCap {
    Butt,
    Round,
    Square,
}

/// Shape paint. Reused across passes; only the shader is swapped per draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub anti_alias: bool,
    pub style: PaintStyle,
    pub stroke_cap: StrokeCap,
    pub stroke_width: f32,
    pub color: Color,
    pub shader: Option<LinearGradient>,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            anti_alias: false,
            style: PaintStyle::Fill,
            stroke_cap: StrokeCap::Butt,
            stroke_width: 0.0,
            color: Color::BLACK,
            shader: None,
        }
    }
}

impl Paint {
    /// Color at a point, taken from the shader when one is set.
    pub fn color_at(&self, x: f32, y: f32) -> Color {
        match &self.shader {
            Some(shader) => shader.color_at(x, y),
            None => self.color,
        }
    }
}

/// Glyph weight and slant selected by a text appearance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Typeface {
    #[default]
    Normal,
    Medium,
    Bold,
    Italic,
}

/// Text paint: color, size and typeface of a run of glyphs.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPaint {
    pub anti_alias: bool,
    pub color: Color,
    pub text_size: f32,
    pub typeface: Typeface,
}

impl Default for TextPaint {
    fn default() -> Self {
        Self {
            anti_alias: false,
            color: Color::BLACK,
            text_size: 12.0,
            typeface: Typeface::Normal,
        }
    }
}

/// Vertical glyph metrics relative to the baseline.
/// `ascent` is negative (above the baseline), `descent` positive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FontMetrics {
    pub ascent: f32,
    pub descent: f32,
}

impl FontMetrics {
    /// Midpoint between ascent and descent. Subtracting it from a vertical
    /// center yields a baseline that centers the glyphs.
    pub fn center_offset(&self) -> f32 {
        (self.ascent + self.descent) / 2.0
    }
}

/// A drawing surface supplied by the host for one paint pass.
#[cfg_attr(test, mockall::automock)]
pub trait Canvas {
    /// Stroke or fill the part of the oval's outline between `start_angle`
    /// and `start_angle + sweep_angle`, in degrees, clockwise from 3 o'clock.
    fn draw_arc(&mut self, oval: RectF, start_angle: f32, sweep_angle: f32, use_center: bool, paint: &Paint);

    fn draw_round_rect(&mut self, rect: RectF, rx: f32, ry: f32, paint: &Paint);

    fn draw_oval(&mut self, oval: RectF, paint: &Paint);

    /// Draw `text` with its left edge at `x` and its baseline at `y`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, paint: &TextPaint);

    /// Advance width of `text` in px.
    fn measure_text(&self, text: &str, paint: &TextPaint) -> f32;

    fn font_metrics(&self, paint: &TextPaint) -> FontMetrics;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("#FF0000", Color(0xFFFF0000))]
    #[case("#80FF0000", Color(0x80FF0000))]
    #[case(" #4caf50 ", Color(0xFF4CAF50))]
    fn parses_hex_colors(#[case] input: &str, #[case] expected: Color) {
        assert_eq!(Color::parse(input), Ok(expected));
    }

    #[rstest]
    #[case("FF0000")]
    #[case("#F00")]
    #[case("#GG0000")]
    #[case("")]
    fn rejects_malformed_colors(#[case] input: &str) {
        assert_eq!(Color::parse(input), Err(StyleError::InvalidColor(input.to_string())));
    }

    #[test]
    fn lerp_hits_endpoints_and_midpoint() {
        let a = Color(0xFF000000);
        let b = Color(0xFFFFFFFF);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Color(0xFF808080));
        assert_eq!(a.lerp(b, f32::NAN), a);
    }

    #[test]
    fn translucent_color_composites_over_background() {
        let half_white = Color(0x80FFFFFF);
        assert_eq!(half_white.over(Color::BLACK), Color(0xFF808080));
        assert_eq!(Color::TRANSPARENT.over(Color::BLACK), Color::BLACK);
    }

    #[test]
    fn font_metrics_center_offset() {
        let metrics = FontMetrics { ascent: -12.0, descent: 4.0 };
        assert_eq!(metrics.center_offset(), -4.0);
    }

    #[test]
    fn empty_rect_detection() {
        assert!(RectF::new(0.0, 0.0, 0.0, 10.0).is_empty());
        assert!(RectF::new(5.0, 5.0, 4.0, 10.0).is_empty());
        assert!(!RectF::new(0.0, 0.0, 1.0, 1.0).is_empty());
    }
}
