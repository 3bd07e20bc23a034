//! Arc-shaped progress bar.
//!
//! The arc is part of an oval, centered on its top with the gap at the
//! bottom. The whole sweep is stroked with the dim gradient first, then the
//! finished part is stroked over it with the bright gradient. Two optional labels sit in the middle
//! of the arc and near its bottom edge.

use tracing::{debug, trace, warn};

use crate::error::StateError;
use crate::graphics::{Canvas, Color, LinearGradient, Paint, PaintStyle, RectF, StrokeCap, TextPaint};
use crate::state::Bundle;
use crate::style::{AttributeSource, DisplayMetrics, TextAppearance};
use crate::ui::invalidate::Invalidate;
use crate::ui::layout::{self, Constraints, Padding, Size};
use crate::ui::theme::{BRIGHT_PROGRESS_COLORS, DIM_PROGRESS_COLORS, PROGRESS_TEXT_COLOR};

use super::progress::{is_positive_length, Progress};

/// Style attribute names read at construction.
pub mod attr {
    pub const ANGLE: &str = "arc_angle";
    pub const STROKE_WIDTH: &str = "arc_stroke_width";
    pub const CENTRAL_TEXT: &str = "arc_central_text";
    pub const CENTRAL_TEXT_SIZE: &str = "arc_central_text_size";
    pub const CENTRAL_TEXT_COLOR: &str = "arc_central_text_color";
    pub const CENTRAL_TEXT_APPEARANCE: &str = "arc_central_text_appearance";
    pub const BOTTOM_TEXT: &str = "arc_bottom_text";
    pub const BOTTOM_TEXT_SIZE: &str = "arc_bottom_text_size";
    pub const BOTTOM_TEXT_COLOR: &str = "arc_bottom_text_color";
    pub const BOTTOM_TEXT_MARGIN: &str = "arc_bottom_text_margin";
    pub const BOTTOM_TEXT_APPEARANCE: &str = "arc_bottom_text_appearance";
    pub const MAX: &str = "arc_max";
    pub const PROGRESS: &str = "arc_progress";
}

mod key {
    pub const ANGLE: &str = "arc_angle";
    pub const STROKE_WIDTH: &str = "stroke_width";
    pub const CENTRAL_TEXT: &str = "central_text";
    pub const CENTRAL_TEXT_SIZE: &str = "central_text_size";
    pub const CENTRAL_TEXT_COLOR: &str = "central_text_color";
    pub const CENTRAL_TEXT_APPEARANCE: &str = "central_text_appearance";
    pub const BOTTOM_TEXT: &str = "bottom_text";
    pub const BOTTOM_TEXT_SIZE: &str = "bottom_text_size";
    pub const BOTTOM_TEXT_COLOR: &str = "bottom_text_color";
    pub const BOTTOM_TEXT_MARGIN: &str = "bottom_text_margin";
    pub const BOTTOM_TEXT_APPEARANCE: &str = "bottom_text_appearance";
    pub const MAX_PROGRESS: &str = "max_progress";
    pub const CURRENT_PROGRESS: &str = "current_progress";
}

pub const DEFAULT_ARC_ANGLE: f32 = 200.0;
const DEFAULT_STROKE_WIDTH_DP: f32 = 20.0;
const DEFAULT_CENTRAL_TEXT_SIZE_SP: f32 = 12.0;
const DEFAULT_BOTTOM_TEXT_SIZE_SP: f32 = 17.0;
const DEFAULT_BOTTOM_TEXT_MARGIN_DP: f32 = 20.0;
const DEFAULT_WIDTH_DP: f32 = 150.0;
const DEFAULT_HEIGHT_DP: f32 = 96.0;

const DEGREES_IN_CIRCLE: f32 = 360.0;

/// Angle of the top of the oval. Angles run clockwise from 3 o'clock:
/// right (0), bottom (90), left (180), top (270).
pub const HIGHEST_POINT: f32 = 270.0;

/// Progress bar drawn as an arc with its gap at the bottom.
pub struct ArcProgressBar {
    arc_angle: f32,
    stroke_width: f32,
    central_text: Option<String>,
    central_text_size: f32,
    central_text_color: Color,
    central_text_appearance: TextAppearance,
    bottom_text: Option<String>,
    bottom_text_size: f32,
    bottom_text_color: Color,
    bottom_text_margin: f32,
    bottom_text_appearance: TextAppearance,
    progress: Progress,

    padding: Padding,
    metrics: DisplayMetrics,
    /// Resolved size of the last measure pass.
    measured: Option<Size>,
    /// Rectangle the arc's oval is inscribed in.
    oval: RectF,
    paint: Paint,
    text_paint: TextPaint,
    invalidator: Box<dyn Invalidate>,
}

impl ArcProgressBar {
    /// Create a bar with default properties.
    pub fn new(metrics: DisplayMetrics, invalidator: impl Invalidate + 'static) -> Self {
        let stroke_width = metrics.dp_to_px(DEFAULT_STROKE_WIDTH_DP);
        Self {
            arc_angle: DEFAULT_ARC_ANGLE,
            stroke_width,
            central_text: None,
            central_text_size: metrics.sp_to_px(DEFAULT_CENTRAL_TEXT_SIZE_SP),
            central_text_color: PROGRESS_TEXT_COLOR,
            central_text_appearance: TextAppearance::Caption,
            bottom_text: None,
            bottom_text_size: metrics.sp_to_px(DEFAULT_BOTTOM_TEXT_SIZE_SP),
            bottom_text_color: Color::BLACK,
            bottom_text_margin: metrics.dp_to_px(DEFAULT_BOTTOM_TEXT_MARGIN_DP),
            bottom_text_appearance: TextAppearance::Body2,
            progress: Progress::default(),
            padding: Padding::default(),
            metrics,
            measured: None,
            oval: RectF::default(),
            paint: Paint {
                anti_alias: true,
                style: PaintStyle::Stroke,
                stroke_cap: StrokeCap::Round,
                stroke_width,
                ..Paint::default()
            },
            text_paint: TextPaint {
                anti_alias: true,
                ..TextPaint::default()
            },
            invalidator: Box::new(invalidator),
        }
    }

    /// Create a bar and override its defaults from a style source.
    /// Missing or malformed attributes keep their defaults.
    pub fn with_attributes(
        metrics: DisplayMetrics,
        attributes: &impl AttributeSource,
        invalidator: impl Invalidate + 'static,
    ) -> Self {
        let mut bar = Self::new(metrics, || {});
        bar.apply_attributes(attributes);
        bar.invalidator = Box::new(invalidator);
        bar
    }

    fn apply_attributes(&mut self, attributes: &impl AttributeSource) {
        let metrics = self.metrics;

        if let Some(angle) = attributes.get_float_or_none(attr::ANGLE) {
            self.set_arc_angle(angle);
        }
        if let Some(width) = attributes.get_dimension_px_or_none(attr::STROKE_WIDTH, &metrics) {
            self.set_stroke_width(width);
        }

        if let Some(text) = attributes.get_string_or_none(attr::CENTRAL_TEXT) {
            self.set_central_text(Some(text));
        }
        if let Some(size) = attributes.get_dimension_px_or_none(attr::CENTRAL_TEXT_SIZE, &metrics) {
            self.set_central_text_size(size);
        }
        if let Some(color) = attributes.get_color_or_none(attr::CENTRAL_TEXT_COLOR) {
            self.set_central_text_color(color);
        }
        if let Some(appearance) = attributes.get_text_appearance_or_none(attr::CENTRAL_TEXT_APPEARANCE) {
            self.set_central_text_appearance(appearance);
        }

        if let Some(text) = attributes.get_not_empty_string_or_none(attr::BOTTOM_TEXT) {
            self.set_bottom_text(Some(text));
        }
        if let Some(size) = attributes.get_dimension_px_or_none(attr::BOTTOM_TEXT_SIZE, &metrics) {
            self.set_bottom_text_size(size);
        }
        if let Some(color) = attributes.get_color_or_none(attr::BOTTOM_TEXT_COLOR) {
            self.set_bottom_text_color(color);
        }
        if let Some(margin) = attributes.get_dimension_px_or_none(attr::BOTTOM_TEXT_MARGIN, &metrics) {
            self.set_bottom_text_margin(margin);
        }
        if let Some(appearance) = attributes.get_text_appearance_or_none(attr::BOTTOM_TEXT_APPEARANCE) {
            self.set_bottom_text_appearance(appearance);
        }

        // Max first, so the initial progress clamps against the styled max.
        if let Some(max) = attributes.get_float_or_none(attr::MAX) {
            self.set_max_progress(max);
        }
        if let Some(progress) = attributes.get_float_or_none(attr::PROGRESS) {
            self.set_current_progress(progress);
        }
    }

    fn invalidate(&self) {
        self.invalidator.invalidate();
    }

    // Properties

    /// Degrees the full arc spans.
    pub fn arc_angle(&self) -> f32 {
        self.arc_angle
    }

    pub fn set_arc_angle(&mut self, angle: f32) {
        if !angle.is_finite() {
            warn!(angle, "rejecting non-finite arc angle");
            return;
        }
        self.arc_angle = angle;
        self.invalidate();
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        if !is_positive_length(width) {
            warn!(width, "rejecting non-positive stroke width");
            return;
        }
        self.stroke_width = width;
        self.paint.stroke_width = width;
        self.invalidate();
    }

    pub fn central_text(&self) -> Option<&str> {
        self.central_text.as_deref()
    }

    pub fn set_central_text(&mut self, text: Option<String>) {
        self.central_text = text;
        self.invalidate();
    }

    pub fn central_text_size(&self) -> f32 {
        self.central_text_size
    }

    pub fn set_central_text_size(&mut self, size: f32) {
        if !is_positive_length(size) {
            warn!(size, "rejecting non-positive central text size");
            return;
        }
        self.central_text_size = size;
        self.invalidate();
    }

    pub fn central_text_color(&self) -> Color {
        self.central_text_color
    }

    pub fn set_central_text_color(&mut self, color: Color) {
        self.central_text_color = color;
        self.invalidate();
    }

    pub fn central_text_appearance(&self) -> TextAppearance {
        self.central_text_appearance
    }

    pub fn set_central_text_appearance(&mut self, appearance: TextAppearance) {
        self.central_text_appearance = appearance;
        self.invalidate();
    }

    pub fn bottom_text(&self) -> Option<&str> {
        self.bottom_text.as_deref()
    }

    pub fn set_bottom_text(&mut self, text: Option<String>) {
        self.bottom_text = text;
        self.invalidate();
    }

    pub fn bottom_text_size(&self) -> f32 {
        self.bottom_text_size
    }

    pub fn set_bottom_text_size(&mut self, size: f32) {
        if !is_positive_length(size) {
            warn!(size, "rejecting non-positive bottom text size");
            return;
        }
        self.bottom_text_size = size;
        self.invalidate();
    }

    pub fn bottom_text_color(&self) -> Color {
        self.bottom_text_color
    }

    pub fn set_bottom_text_color(&mut self, color: Color) {
        self.bottom_text_color = color;
        self.invalidate();
    }

    /// Distance between the bottom label and the bottom edge.
    pub fn bottom_text_margin(&self) -> f32 {
        self.bottom_text_margin
    }

    pub fn set_bottom_text_margin(&mut self, margin: f32) {
        if !margin.is_finite() {
            warn!(margin, "rejecting non-finite bottom text margin");
            return;
        }
        self.bottom_text_margin = margin;
        self.invalidate();
    }

    pub fn bottom_text_appearance(&self) -> TextAppearance {
        self.bottom_text_appearance
    }

    pub fn set_bottom_text_appearance(&mut self, appearance: TextAppearance) {
        self.bottom_text_appearance = appearance;
        self.invalidate();
    }

    pub fn max_progress(&self) -> f32 {
        self.progress.max()
    }

    pub fn set_max_progress(&mut self, max: f32) {
        if self.progress.set_max(max) {
            self.invalidate();
        }
    }

    pub fn current_progress(&self) -> f32 {
        self.progress.current()
    }

    /// Values above the current max are stored as the max.
    pub fn set_current_progress(&mut self, progress: f32) {
        if self.progress.set_current(progress) {
            self.invalidate();
        }
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn set_padding(&mut self, padding: Padding) {
        self.padding = padding;
        self.invalidate();
    }

    // Geometry

    /// Smallest size the bar asks for, in px, before padding.
    pub fn suggested_minimum_size(&self) -> Size {
        Size::new(
            self.metrics.dp_to_px(DEFAULT_WIDTH_DP),
            self.metrics.dp_to_px(DEFAULT_HEIGHT_DP),
        )
    }

    /// Angle the arc starts at, so that it is symmetric around the top.
    pub fn start_angle(&self) -> f32 {
        HIGHEST_POINT - self.arc_angle / 2.0
    }

    /// Degrees covered by the finished part.
    pub fn finished_sweep_angle(&self) -> f32 {
        self.progress.fraction() * self.arc_angle
    }

    /// Rectangle the arc's oval is inscribed in, from the last measure pass.
    pub fn oval(&self) -> RectF {
        self.oval
    }

    pub fn measured_size(&self) -> Option<Size> {
        self.measured
    }

    /// Resolve the bar's size and lay out the arc inside it.
    pub fn measure(&mut self, constraints: Constraints) -> Size {
        let size = layout::resolve(constraints, self.suggested_minimum_size(), self.padding);
        self.measured = Some(size);
        self.oval = arc_oval(size, self.arc_angle, self.stroke_width);
        debug!(width = size.width, height = size.height, oval = ?self.oval, "measured arc progress bar");
        size
    }

    /// Draw the bar. Does nothing before the first measure pass.
    pub fn paint(&mut self, canvas: &mut dyn Canvas) {
        let Some(size) = self.measured else {
            warn!("arc progress bar painted before it was measured");
            return;
        };
        trace!(
            progress = self.progress.current(),
            max = self.progress.max(),
            sweep = self.finished_sweep_angle(),
            "painting arc progress bar"
        );

        self.draw_arc(canvas, size);

        if let Some(text) = self.central_text.as_deref().filter(|t| !t.is_empty()) {
            prepare_text_paint(
                &mut self.text_paint,
                self.central_text_appearance,
                self.central_text_color,
                self.central_text_size,
            );
            let offset = canvas.font_metrics(&self.text_paint).center_offset();
            let x = (size.width - canvas.measure_text(text, &self.text_paint)) / 2.0;
            canvas.draw_text(text, x, size.height / 2.0 - offset, &self.text_paint);
        }

        if let Some(text) = self.bottom_text.as_deref().filter(|t| !t.is_empty()) {
            prepare_text_paint(
                &mut self.text_paint,
                self.bottom_text_appearance,
                self.bottom_text_color,
                self.bottom_text_size,
            );
            let offset = canvas.font_metrics(&self.text_paint).center_offset();
            let x = (size.width - canvas.measure_text(text, &self.text_paint)) / 2.0;
            canvas.draw_text(text, x, size.height - offset - self.bottom_text_margin, &self.text_paint);
        }
    }

    fn draw_arc(&mut self, canvas: &mut dyn Canvas, size: Size) {
        let start_angle = self.start_angle();

        self.paint.shader = Some(LinearGradient::horizontal(DIM_PROGRESS_COLORS, size.width));
        canvas.draw_arc(self.oval, start_angle, self.arc_angle, false, &self.paint);

        self.paint.shader = Some(LinearGradient::horizontal(BRIGHT_PROGRESS_COLORS, size.width));
        canvas.draw_arc(self.oval, start_angle, self.finished_sweep_angle(), false, &self.paint);
    }

    // Saved state

    pub fn save_state(&self) -> Bundle {
        let mut bundle = Bundle::new();
        bundle.put_f32(key::ANGLE, self.arc_angle);
        bundle.put_f32(key::STROKE_WIDTH, self.stroke_width);
        bundle.put_text(key::CENTRAL_TEXT, self.central_text.as_deref());
        bundle.put_f32(key::CENTRAL_TEXT_SIZE, self.central_text_size);
        bundle.put_color(key::CENTRAL_TEXT_COLOR, self.central_text_color);
        bundle.put_appearance(key::CENTRAL_TEXT_APPEARANCE, self.central_text_appearance);
        bundle.put_text(key::BOTTOM_TEXT, self.bottom_text.as_deref());
        bundle.put_f32(key::BOTTOM_TEXT_SIZE, self.bottom_text_size);
        bundle.put_color(key::BOTTOM_TEXT_COLOR, self.bottom_text_color);
        bundle.put_f32(key::BOTTOM_TEXT_MARGIN, self.bottom_text_margin);
        bundle.put_appearance(key::BOTTOM_TEXT_APPEARANCE, self.bottom_text_appearance);
        bundle.put_f32(key::MAX_PROGRESS, self.progress.max());
        bundle.put_f32(key::CURRENT_PROGRESS, self.progress.current());
        bundle
    }

    /// Restore every property from a saved bundle and request one redraw.
    /// On error nothing is changed.
    pub fn restore_state(&mut self, bundle: &Bundle) -> Result<(), StateError> {
        let arc_angle = bundle.get_f32_where(key::ANGLE, "finite number", f32::is_finite)?;
        let stroke_width = bundle.get_f32_where(key::STROKE_WIDTH, "positive number", is_positive_length)?;
        let central_text = bundle.get_text(key::CENTRAL_TEXT)?;
        let central_text_size =
            bundle.get_f32_where(key::CENTRAL_TEXT_SIZE, "positive number", is_positive_length)?;
        let central_text_color = bundle.get_color(key::CENTRAL_TEXT_COLOR)?;
        let central_text_appearance = bundle.get_appearance(key::CENTRAL_TEXT_APPEARANCE)?;
        let bottom_text = bundle.get_text(key::BOTTOM_TEXT)?;
        let bottom_text_size =
            bundle.get_f32_where(key::BOTTOM_TEXT_SIZE, "positive number", is_positive_length)?;
        let bottom_text_color = bundle.get_color(key::BOTTOM_TEXT_COLOR)?;
        let bottom_text_margin = bundle.get_f32_where(key::BOTTOM_TEXT_MARGIN, "finite number", f32::is_finite)?;
        let bottom_text_appearance = bundle.get_appearance(key::BOTTOM_TEXT_APPEARANCE)?;
        let progress = Progress::restore(bundle, key::MAX_PROGRESS, key::CURRENT_PROGRESS)?;

        self.arc_angle = arc_angle;
        self.stroke_width = stroke_width;
        self.paint.stroke_width = stroke_width;
        self.central_text = central_text;
        self.central_text_size = central_text_size;
        self.central_text_color = central_text_color;
        self.central_text_appearance = central_text_appearance;
        self.bottom_text = bottom_text;
        self.bottom_text_size = bottom_text_size;
        self.bottom_text_color = bottom_text_color;
        self.bottom_text_margin = bottom_text_margin;
        self.bottom_text_appearance = bottom_text_appearance;
        self.progress = progress;
        self.invalidate();
        Ok(())
    }
}

/// Oval for an arc of `arc_angle` degrees in a box of `size`.
///
/// An oval inscribed in the box itself would leave the arc short of the
/// bottom edge, so the oval's height is grown as if the arc were closed into
/// a full ring. Every side is inset by half the stroke so the stroke stays
/// inside the box.
pub fn arc_oval(size: Size, arc_angle: f32, stroke_width: f32) -> RectF {
    let full_height = (1.0 + arc_angle / DEGREES_IN_CIRCLE) * size.height;
    let stroke_padding = stroke_width / 2.0;
    RectF::new(
        stroke_padding,
        stroke_padding,
        size.width - stroke_padding,
        full_height - stroke_padding,
    )
}

fn prepare_text_paint(paint: &mut TextPaint, appearance: TextAppearance, color: Color, size: f32) {
    paint.typeface = appearance.typeface();
    paint.color = color;
    paint.text_size = size;
}
