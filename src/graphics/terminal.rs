//! A [`Canvas`] that rasterizes into a ratatui [`Buffer`].
//!
//! Every terminal cell stands for a fixed box of device pixels. Shapes are
//! sampled at cell centers: a cell whose center falls inside the shape gets
//! its background set to the paint color at that point. Text is laid out one
//! glyph per cell, so the text size only affects where the run is anchored.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{Canvas, Color, FontMetrics, Paint, PaintStyle, RectF, TextPaint, Typeface};

/// Default pixel box of a single cell. Terminal cells are roughly twice as
/// tall as they are wide.
pub const DEFAULT_CELL_WIDTH: f32 = 8.0;
pub const DEFAULT_CELL_HEIGHT: f32 = 16.0;

/// Canvas over a rectangular region of a terminal buffer.
pub struct TerminalCanvas<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    cell_width: f32,
    cell_height: f32,
    background: Color,
}

impl<'a> TerminalCanvas<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect) -> Self {
        Self {
            buf,
            area,
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            background: Color::BLACK,
        }
    }

    /// Set the pixel box covered by one cell.
    pub fn cell_size(mut self, width: f32, height: f32) -> Self {
        self.cell_width = width.max(1.0);
        self.cell_height = height.max(1.0);
        self
    }

    /// Opaque color translucent paints are composited over.
    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Size of the canvas in device pixels.
    pub fn pixel_size(&self) -> (f32, f32) {
        (
            self.area.width as f32 * self.cell_width,
            self.area.height as f32 * self.cell_height,
        )
    }

    /// Paint every cell in `bounds` whose center satisfies `inside`.
    fn fill_cells(&mut self, bounds: RectF, paint: &Paint, inside: impl Fn(f32, f32) -> bool) {
        if bounds.is_empty() {
            return;
        }
        let (first_col, last_col) = self.cell_span(bounds.left, bounds.right, self.cell_width, self.area.width);
        let (first_row, last_row) = self.cell_span(bounds.top, bounds.bottom, self.cell_height, self.area.height);

        for row in first_row..last_row {
            for col in first_col..last_col {
                let x = (col as f32 + 0.5) * self.cell_width;
                let y = (row as f32 + 0.5) * self.cell_height;
                if !inside(x, y) {
                    continue;
                }
                let color = paint.color_at(x, y).over(self.background);
                self.buf
                    .get_mut(self.area.x + col, self.area.y + row)
                    .set_symbol(" ")
                    .set_bg(color.into());
            }
        }
    }

    /// Range of cell indices overlapping `[start, end)` px, clipped to `limit`.
    fn cell_span(&self, start: f32, end: f32, cell: f32, limit: u16) -> (u16, u16) {
        let first = (start / cell).floor().clamp(0.0, limit as f32) as u16;
        let last = (end / cell).ceil().clamp(0.0, limit as f32) as u16;
        (first, last)
    }
}

impl Canvas for TerminalCanvas<'_> {
    fn draw_arc(&mut self, oval: RectF, start_angle: f32, sweep_angle: f32, use_center: bool, paint: &Paint) {
        if sweep_angle == 0.0 || !sweep_angle.is_finite() || oval.is_empty() {
            return;
        }
        let half_stroke = match paint.style {
            PaintStyle::Stroke => paint.stroke_width / 2.0,
            PaintStyle::Fill => 0.0,
        };
        let style = paint.style;
        let bounds = inflate(oval, half_stroke);
        self.fill_cells(bounds, paint, |x, y| {
            let Some(angle) = ellipse_angle(oval, x, y) else {
                return false;
            };
            if !angle_in_sweep(angle, start_angle, sweep_angle) {
                return false;
            }
            let distance = ellipse_distance(oval, x, y);
            match style {
                PaintStyle::Stroke if use_center => distance <= half_stroke,
                PaintStyle::Stroke => distance.abs() <= half_stroke,
                PaintStyle::Fill => distance <= 0.0,
            }
        });
    }

    fn draw_round_rect(&mut self, rect: RectF, rx: f32, ry: f32, paint: &Paint) {
        match paint.style {
            PaintStyle::Fill => {
                self.fill_cells(rect, paint, |x, y| in_round_rect(rect, rx, ry, x, y));
            }
            PaintStyle::Stroke => {
                let half = paint.stroke_width / 2.0;
                let outer = inflate(rect, half);
                let inner = inflate(rect, -half);
                self.fill_cells(outer, paint, |x, y| {
                    in_round_rect(outer, rx + half, ry + half, x, y)
                        && !in_round_rect(inner, rx - half, ry - half, x, y)
                });
            }
        }
    }

    fn draw_oval(&mut self, oval: RectF, paint: &Paint) {
        self.draw_round_rect(oval, oval.width() / 2.0, oval.height() / 2.0, paint);
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, paint: &TextPaint) {
        if text.is_empty() {
            return;
        }
        let glyph_center = y + self.font_metrics(paint).center_offset();
        let row = (glyph_center / self.cell_height).floor();
        if row < 0.0 || row >= self.area.height as f32 {
            return;
        }
        let row = row as u16;

        let modifier = match paint.typeface {
            Typeface::Normal => Modifier::empty(),
            Typeface::Medium | Typeface::Bold => Modifier::BOLD,
            Typeface::Italic => Modifier::ITALIC,
        };

        let mut col = (x / self.cell_width).round() as i32;
        for ch in text.chars() {
            let width = ch.width().unwrap_or(0) as i32;
            if col >= 0 && col + width <= self.area.width as i32 {
                self.buf
                    .get_mut(self.area.x + col as u16, self.area.y + row)
                    .set_char(ch)
                    .set_style(Style::default().fg(paint.color.into()).add_modifier(modifier));
            }
            col += width;
        }
    }

    fn measure_text(&self, text: &str, _paint: &TextPaint) -> f32 {
        text.width() as f32 * self.cell_width
    }

    fn font_metrics(&self, _paint: &TextPaint) -> FontMetrics {
        FontMetrics {
            ascent: -0.75 * self.cell_height,
            descent: 0.25 * self.cell_height,
        }
    }
}

/// Grow (or, for a negative amount, shrink) a rectangle on every side.
fn inflate(rect: RectF, amount: f32) -> RectF {
    RectF::new(
        rect.left - amount,
        rect.top - amount,
        rect.right + amount,
        rect.bottom + amount,
    )
}

fn in_round_rect(rect: RectF, rx: f32, ry: f32, x: f32, y: f32) -> bool {
    if rect.is_empty() || !rect.contains(x, y) {
        return false;
    }
    let rx = rx.max(0.0).min(rect.width() / 2.0);
    let ry = ry.max(0.0).min(rect.height() / 2.0);
    if rx == 0.0 || ry == 0.0 {
        return true;
    }
    let qx = x.max(rect.left + rx).min(rect.right - rx);
    let qy = y.max(rect.top + ry).min(rect.bottom - ry);
    let nx = (x - qx) / rx;
    let ny = (y - qy) / ry;
    nx * nx + ny * ny <= 1.0
}

/// Parametric angle of a point around the oval's center, in `[0, 360)`,
/// clockwise from 3 o'clock since y grows downwards.
fn ellipse_angle(oval: RectF, x: f32, y: f32) -> Option<f32> {
    let rx = oval.width() / 2.0;
    let ry = oval.height() / 2.0;
    if rx <= 0.0 || ry <= 0.0 {
        return None;
    }
    let nx = (x - oval.center_x()) / rx;
    let ny = (y - oval.center_y()) / ry;
    Some(ny.atan2(nx).to_degrees().rem_euclid(360.0))
}

/// Signed distance along the ray from the center to the oval's outline:
/// negative inside, positive outside.
fn ellipse_distance(oval: RectF, x: f32, y: f32) -> f32 {
    let rx = oval.width() / 2.0;
    let ry = oval.height() / 2.0;
    let dx = x - oval.center_x();
    let dy = y - oval.center_y();
    let norm = ((dx / rx).powi(2) + (dy / ry).powi(2)).sqrt();
    if norm == 0.0 {
        return -rx.min(ry);
    }
    dx.hypot(dy) * (norm - 1.0) / norm
}

fn angle_in_sweep(angle: f32, start: f32, sweep: f32) -> bool {
    if sweep.abs() >= 360.0 {
        return true;
    }
    let (start, sweep) = if sweep < 0.0 { (start + sweep, -sweep) } else { (start, sweep) };
    (angle - start).rem_euclid(360.0) <= sweep
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::{LinearGradient, StrokeCap};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn fill(color: Color) -> Paint {
        Paint { color, ..Paint::default() }
    }

    fn bg_at(buf: &Buffer, x: u16, y: u16) -> ratatui::style::Color {
        buf.get(x, y).bg
    }

    #[rstest]
    #[case(0.0, 270.0, 10.0, false)]
    #[case(275.0, 270.0, 10.0, true)]
    #[case(5.0, 350.0, 20.0, true)]
    #[case(90.0, 170.0, 200.0, false)]
    #[case(270.0, 170.0, 200.0, true)]
    #[case(100.0, 170.0, -100.0, true)]
    #[case(200.0, 170.0, -100.0, false)]
    fn sweep_membership(#[case] angle: f32, #[case] start: f32, #[case] sweep: f32, #[case] inside: bool) {
        assert_eq!(angle_in_sweep(angle, start, sweep), inside);
    }

    #[test]
    fn round_rect_excludes_corners() {
        let rect = RectF::new(0.0, 0.0, 100.0, 20.0);
        assert!(in_round_rect(rect, 10.0, 10.0, 50.0, 10.0));
        assert!(!in_round_rect(rect, 10.0, 10.0, 0.5, 0.5));
        assert!(in_round_rect(rect, 0.0, 0.0, 0.5, 0.5));
    }

    #[test]
    fn filled_rect_paints_covered_cells() {
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        let mut canvas = TerminalCanvas::new(&mut buf, area);
        canvas.draw_round_rect(RectF::new(0.0, 0.0, 40.0, 32.0), 0.0, 0.0, &fill(Color(0xFFFF0000)));

        let red = ratatui::style::Color::Rgb(0xFF, 0, 0);
        assert_eq!(bg_at(&buf, 0, 0), red);
        assert_eq!(bg_at(&buf, 4, 1), red);
        assert_eq!(bg_at(&buf, 5, 0), ratatui::style::Color::Reset);
    }

    #[test]
    fn gradient_shader_colors_cells_by_x() {
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        let mut canvas = TerminalCanvas::new(&mut buf, area);
        let paint = Paint {
            shader: Some(LinearGradient::horizontal(
                [Color(0xFFFF0000), Color(0xFFFF0000), Color(0xFF0000FF)],
                80.0,
            )),
            ..Paint::default()
        };
        canvas.draw_round_rect(RectF::new(0.0, 0.0, 80.0, 16.0), 0.0, 0.0, &paint);

        assert_eq!(bg_at(&buf, 0, 0), ratatui::style::Color::Rgb(0xFF, 0, 0));
        assert_ne!(bg_at(&buf, 9, 0), ratatui::style::Color::Rgb(0xFF, 0, 0));
    }

    #[test]
    fn zero_sweep_arc_draws_nothing() {
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        let mut canvas = TerminalCanvas::new(&mut buf, area);
        let paint = Paint {
            style: PaintStyle::Stroke,
            stroke_cap: StrokeCap::Round,
            stroke_width: 16.0,
            ..fill(Color::WHITE)
        };
        canvas.draw_arc(RectF::new(8.0, 8.0, 72.0, 56.0), 170.0, 0.0, false, &paint);
        assert_eq!(buf, Buffer::empty(area));
    }

    #[test]
    fn stroked_arc_leaves_center_untouched() {
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        let mut canvas = TerminalCanvas::new(&mut buf, area);
        let paint = Paint {
            style: PaintStyle::Stroke,
            stroke_width: 16.0,
            ..fill(Color::WHITE)
        };
        canvas.draw_arc(RectF::new(0.0, 0.0, 160.0, 160.0), 0.0, 360.0, false, &paint);

        assert_eq!(bg_at(&buf, 10, 5), ratatui::style::Color::Reset);
        // 3 o'clock on the outline: x = 160, y = 80
        assert_eq!(bg_at(&buf, 19, 5), ratatui::style::Color::Rgb(0xFF, 0xFF, 0xFF));
    }

    #[test]
    fn text_is_placed_on_the_glyph_center_row() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);
        let mut canvas = TerminalCanvas::new(&mut buf, area);
        let paint = TextPaint::default();
        let metrics = canvas.font_metrics(&paint);
        let width = canvas.measure_text("50%", &paint);
        assert_eq!(width, 24.0);

        canvas.draw_text("50%", 16.0, 24.0 - metrics.center_offset(), &paint);
        assert_eq!(buf.get(2, 1).symbol(), "5");
        assert_eq!(buf.get(3, 1).symbol(), "0");
        assert_eq!(buf.get(4, 1).symbol(), "%");
    }
}
