//! Line-shaped progress bar.
//!
//! A rounded track filled with the dim gradient, with the finished part on
//! top in the bright gradient. While the finished part is narrower than the
//! track is tall it is drawn as an oval that shrinks towards the left end,
//! so tiny progress values read as a dot instead of a squashed pill.

use tracing::{debug, trace, warn};

use crate::error::StateError;
use crate::graphics::{Canvas, LinearGradient, Paint, PaintStyle, RectF, StrokeCap};
use crate::state::Bundle;
use crate::style::{AttributeSource, DisplayMetrics};
use crate::ui::invalidate::Invalidate;
use crate::ui::layout::{self, Constraints, Padding, Size};
use crate::ui::theme::{BRIGHT_PROGRESS_COLORS, DIM_PROGRESS_COLORS};

use super::progress::{is_positive_length, Progress};

/// Style attribute names read at construction.
pub mod attr {
    pub const STROKE_WIDTH: &str = "line_stroke_width";
    pub const MAX: &str = "line_max";
    pub const PROGRESS: &str = "line_progress";
}

mod key {
    pub const STROKE_WIDTH: &str = "stroke_width";
    pub const MAX_PROGRESS: &str = "max_progress";
    pub const CURRENT_PROGRESS: &str = "current_progress";
}

/// Corner radius of the track and of the pill-shaped fill, in px.
pub const CORNER_RADIUS: f32 = 35.0;

const DEFAULT_STROKE_WIDTH_DP: f32 = 20.0;
const DEFAULT_WIDTH_DP: f32 = 320.0;
const DEFAULT_HEIGHT_DP: f32 = 20.0;

/// Shape of the finished part for the current progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillShape {
    /// Narrower than the track is tall.
    Oval(RectF),
    /// Full track height with rounded corners.
    RoundRect(RectF),
}

impl FillShape {
    pub fn rect(&self) -> RectF {
        match *self {
            FillShape::Oval(rect) | FillShape::RoundRect(rect) => rect,
        }
    }
}

/// Progress bar drawn as a horizontal rounded line.
pub struct LineProgressBar {
    stroke_width: f32,
    progress: Progress,

    padding: Padding,
    metrics: DisplayMetrics,
    measured: Option<Size>,
    track: RectF,
    paint: Paint,
    invalidator: Box<dyn Invalidate>,
}

impl LineProgressBar {
    pub fn new(metrics: DisplayMetrics, invalidator: impl Invalidate + 'static) -> Self {
        let stroke_width = metrics.dp_to_px(DEFAULT_STROKE_WIDTH_DP);
        Self {
            stroke_width,
            progress: Progress::default(),
            padding: Padding::default(),
            metrics,
            measured: None,
            track: RectF::default(),
            paint: Paint {
                anti_alias: true,
                style: PaintStyle::Fill,
                stroke_cap: StrokeCap::Round,
                stroke_width,
                ..Paint::default()
            },
            invalidator: Box::new(invalidator),
        }
    }

    /// Create a bar and override its defaults from a style source.
    pub fn with_attributes(
        metrics: DisplayMetrics,
        attributes: &impl AttributeSource,
        invalidator: impl Invalidate + 'static,
    ) -> Self {
        let mut bar = Self::new(metrics, || {});
        if let Some(width) = attributes.get_dimension_px_or_none(attr::STROKE_WIDTH, &metrics) {
            bar.set_stroke_width(width);
        }
        if let Some(max) = attributes.get_float_or_none(attr::MAX) {
            bar.set_max_progress(max);
        }
        if let Some(progress) = attributes.get_float_or_none(attr::PROGRESS) {
            bar.set_current_progress(progress);
        }
        bar.invalidator = Box::new(invalidator);
        bar
    }

    fn invalidate(&self) {
        self.invalidator.invalidate();
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

    pub fn suggested_minimum_size(&self) -> Size {
        Size::new(
            self.metrics.dp_to_px(DEFAULT_WIDTH_DP),
            self.metrics.dp_to_px(DEFAULT_HEIGHT_DP),
        )
    }

    /// The track rectangle from the last measure pass.
    pub fn track(&self) -> RectF {
        self.track
    }

    pub fn measured_size(&self) -> Option<Size> {
        self.measured
    }

    pub fn measure(&mut self, constraints: Constraints) -> Size {
        let size = layout::resolve(constraints, self.suggested_minimum_size(), self.padding);
        self.measured = Some(size);
        self.track = RectF::new(0.0, 0.0, size.width, size.height);
        debug!(width = size.width, height = size.height, "measured line progress bar");
        size
    }

    /// Shape of the finished part inside the current track.
    pub fn fill_shape(&self) -> FillShape {
        fill_shape(self.track, self.progress.fraction())
    }

    pub fn paint(&mut self, canvas: &mut dyn Canvas) {
        let Some(size) = self.measured else {
            warn!("line progress bar painted before it was measured");
            return;
        };
        let fill = self.fill_shape();
        trace!(
            progress = self.progress.current(),
            max = self.progress.max(),
            fill = ?fill,
            "painting line progress bar"
        );

        self.paint.shader = Some(LinearGradient::horizontal(DIM_PROGRESS_COLORS, size.width));
        canvas.draw_round_rect(self.track, CORNER_RADIUS, CORNER_RADIUS, &self.paint);

        self.paint.shader = Some(LinearGradient::horizontal(BRIGHT_PROGRESS_COLORS, size.width));
        match fill {
            FillShape::Oval(rect) => canvas.draw_oval(rect, &self.paint),
            FillShape::RoundRect(rect) => canvas.draw_round_rect(rect, CORNER_RADIUS, CORNER_RADIUS, &self.paint),
        }
    }

    pub fn save_state(&self) -> Bundle {
        let mut bundle = Bundle::new();
        bundle.put_f32(key::STROKE_WIDTH, self.stroke_width);
        bundle.put_f32(key::MAX_PROGRESS, self.progress.max());
        bundle.put_f32(key::CURRENT_PROGRESS, self.progress.current());
        bundle
    }

    /// Restore every property from a saved bundle and request one redraw.
    /// On error nothing is changed.
    pub fn restore_state(&mut self, bundle: &Bundle) -> Result<(), StateError> {
        let stroke_width = bundle.get_f32_where(key::STROKE_WIDTH, "positive number", is_positive_length)?;
        let progress = Progress::restore(bundle, key::MAX_PROGRESS, key::CURRENT_PROGRESS)?;

        self.stroke_width = stroke_width;
        self.paint.stroke_width = stroke_width;
        self.progress = progress;
        self.invalidate();
        Ok(())
    }
}

/// Lay out the finished part of `track` for a progress `fraction`.
///
/// Below the track height the fill is an oval, inset vertically by
/// `track_height / 2 - fill_width` (never negative).
pub fn fill_shape(track: RectF, fraction: f32) -> FillShape {
    let fill_width = track.width() * fraction;
    let track_height = track.height();
    let left = track.left;

    if fill_width < track_height {
        let inset = (track_height / 2.0 - fill_width).max(0.0);
        FillShape::Oval(RectF::new(left, track.top + inset, left + fill_width, track.bottom - inset))
    } else {
        FillShape::RoundRect(RectF::new(left, track.top, left + fill_width, track.bottom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::MockCanvas;
    use crate::style::StyleAttributes;
    use crate::ui::invalidate::{MockInvalidate, RedrawFlag};
    use crate::ui::layout::MeasureSpec;
    use mockall::Sequence;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn bar() -> (LineProgressBar, RedrawFlag) {
        let flag = RedrawFlag::new();
        (LineProgressBar::new(DisplayMetrics::default(), flag.clone()), flag)
    }

    #[test]
    fn measures_default_size_when_unconstrained() {
        let (mut bar, _) = bar();
        assert_eq!(bar.measure(Constraints::unspecified()), Size::new(320.0, 20.0));
        assert_eq!(bar.track(), RectF::new(0.0, 0.0, 320.0, 20.0));
    }

    #[test]
    fn padding_grows_the_requested_size() {
        let (mut bar, _) = bar();
        bar.set_padding(Padding::uniform(2.0));
        let size = bar.measure(Constraints::new(MeasureSpec::AtMost(1000.0), MeasureSpec::Unspecified));
        assert_eq!(size, Size::new(324.0, 24.0));
    }

    #[test]
    fn full_progress_fills_the_track_as_a_round_rect() {
        let (mut bar, _) = bar();
        bar.set_max_progress(100.0);
        bar.set_current_progress(100.0);
        bar.measure(Constraints::exactly(320.0, 20.0));

        assert_eq!(bar.fill_shape(), FillShape::RoundRect(RectF::new(0.0, 0.0, 320.0, 20.0)));
        assert_eq!(bar.fill_shape().rect().right, bar.track().right);
    }

    #[test]
    fn tiny_progress_is_an_inset_oval() {
        let (mut bar, _) = bar();
        bar.set_max_progress(200.0);
        bar.set_current_progress(1.0);
        bar.measure(Constraints::exactly(320.0, 20.0));

        let FillShape::Oval(rect) = bar.fill_shape() else {
            panic!("expected an oval fill");
        };
        assert!((rect.width() - 1.6).abs() < 1e-5);
        assert!((rect.top - 8.4).abs() < 1e-5);
        assert!((rect.bottom - 11.6).abs() < 1e-5);
    }

    #[rstest]
    #[case(0.0)]
    #[case(10.0)]
    fn zero_width_fill_is_a_collapsed_oval(#[case] progress: f32) {
        let (mut bar, _) = bar();
        bar.set_current_progress(progress);
        bar.set_max_progress(0.0);
        bar.set_current_progress(progress);
        bar.measure(Constraints::exactly(320.0, 20.0));

        assert_eq!(bar.fill_shape(), FillShape::Oval(RectF::new(0.0, 10.0, 0.0, 10.0)));
    }

    #[test]
    fn oval_inset_never_goes_negative() {
        // 15px of fill in a 20px tall track: 10 - 15 would be negative
        let shape = fill_shape(RectF::new(0.0, 0.0, 60.0, 20.0), 0.25);
        assert_eq!(shape, FillShape::Oval(RectF::new(0.0, 0.0, 15.0, 20.0)));
    }

    #[test]
    fn fill_starts_at_the_track_left_edge() {
        let shape = fill_shape(RectF::new(5.0, 0.0, 105.0, 20.0), 0.5);
        assert_eq!(shape, FillShape::RoundRect(RectF::new(5.0, 0.0, 55.0, 20.0)));
    }

    #[test]
    fn paints_track_then_round_rect_fill() {
        let (mut bar, _) = bar();
        bar.set_current_progress(50.0);
        bar.measure(Constraints::exactly(320.0, 20.0));

        let mut canvas = MockCanvas::new();
        let mut seq = Sequence::new();
        canvas
            .expect_draw_round_rect()
            .withf(|rect, rx, ry, paint| {
                *rect == RectF::new(0.0, 0.0, 320.0, 20.0)
                    && *rx == CORNER_RADIUS
                    && *ry == CORNER_RADIUS
                    && paint.style == PaintStyle::Fill
                    && paint.shader == Some(LinearGradient::horizontal(DIM_PROGRESS_COLORS, 320.0))
            })
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        canvas
            .expect_draw_round_rect()
            .withf(|rect, _, _, paint| {
                *rect == RectF::new(0.0, 0.0, 160.0, 20.0)
                    && paint.shader == Some(LinearGradient::horizontal(BRIGHT_PROGRESS_COLORS, 320.0))
            })
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        canvas.expect_draw_oval().never();

        bar.paint(&mut canvas);
    }

    #[test]
    fn paints_oval_fill_for_small_progress() {
        let (mut bar, _) = bar();
        bar.set_current_progress(2.0);
        bar.measure(Constraints::exactly(320.0, 20.0));

        let mut canvas = MockCanvas::new();
        canvas.expect_draw_round_rect().times(1).return_const(());
        canvas
            .expect_draw_oval()
            .withf(|rect, paint| {
                (rect.right - 6.4).abs() < 1e-4 && paint.shader.as_ref().map(|s| s.colors) == Some(BRIGHT_PROGRESS_COLORS)
            })
            .times(1)
            .return_const(());

        bar.paint(&mut canvas);
    }

    #[test]
    fn every_accepted_write_requests_one_redraw() {
        let mut invalidator = MockInvalidate::new();
        invalidator.expect_invalidate().times(3).return_const(());
        let mut bar = LineProgressBar::new(DisplayMetrics::default(), invalidator);

        bar.set_stroke_width(8.0);
        bar.set_max_progress(10.0);
        bar.set_current_progress(3.0);
        bar.set_max_progress(-10.0);
    }

    #[test]
    fn style_attributes_override_defaults() {
        let attrs = StyleAttributes::new()
            .with(attr::STROKE_WIDTH, "6dp")
            .with(attr::MAX, "489")
            .with(attr::PROGRESS, "12");
        let bar = LineProgressBar::with_attributes(DisplayMetrics::new(3.0, 3.0), &attrs, || {});

        assert_eq!(bar.stroke_width(), 18.0);
        assert_eq!(bar.max_progress(), 489.0);
        assert_eq!(bar.current_progress(), 12.0);
    }

    #[test]
    fn saved_state_round_trips_through_a_new_bar() {
        let (mut original, _) = bar();
        original.set_stroke_width(11.0);
        original.set_max_progress(489.0);
        original.set_current_progress(300.0);
        let json = original.save_state().to_json().unwrap();
        drop(original);

        let (mut restored, flag) = bar();
        restored.restore_state(&Bundle::from_json(&json).unwrap()).unwrap();

        assert_eq!(flag.requests(), 1);
        assert_eq!(restored.stroke_width(), 11.0);
        assert_eq!(restored.max_progress(), 489.0);
        assert_eq!(restored.current_progress(), 300.0);
    }

    #[test]
    fn restore_reports_mistyped_values() {
        let (mut bar, _) = bar();
        let mut bundle = bar.save_state();
        bundle.put_text(key::MAX_PROGRESS, Some("lots"));
        assert!(matches!(
            bar.restore_state(&bundle),
            Err(StateError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn negative_infinite_progress_is_rejected_and_state_still_round_trips() {
        let (mut original, flag) = bar();
        original.set_current_progress(f32::NEG_INFINITY);
        assert_eq!(original.current_progress(), 0.0);
        assert_eq!(flag.requests(), 0);

        let json = original.save_state().to_json().unwrap();
        let (mut restored, _) = bar();
        restored.restore_state(&Bundle::from_json(&json).unwrap()).unwrap();
        assert_eq!(restored.current_progress(), 0.0);
    }

    #[test]
    fn restore_refuses_a_non_positive_stroke_width() {
        let (mut bar, flag) = bar();
        let mut bundle = bar.save_state();
        bundle.put_f32(key::STROKE_WIDTH, -4.0);

        assert!(matches!(
            bar.restore_state(&bundle),
            Err(StateError::TypeMismatch { .. })
        ));
        assert_eq!(bar.stroke_width(), 20.0);
        assert_eq!(flag.requests(), 0);
    }
}
