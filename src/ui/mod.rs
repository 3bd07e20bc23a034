//! UI components for the progress widgets demo.
//!
//! The widgets themselves live in [`widgets`] and know nothing about the
//! terminal. [`Ui`] is the host: it owns both bars, feeds them the demo's
//! progress, lays them out over terminal cells and paints them through a
//! [`TerminalCanvas`].

mod help;
pub mod invalidate;
pub mod layout;
pub mod theme;
pub mod widgets;

pub use help::HelpView;
pub use invalidate::{Invalidate, RedrawFlag};
pub use theme::Theme;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use eyre::Result;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use tracing::{debug, info, warn};

use crate::graphics::terminal::{DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH};
use crate::graphics::TerminalCanvas;
use crate::state::{AppState, Bundle, Temporality};
use crate::style::{DisplayMetrics, StyleAttributes};
use layout::Constraints;
use widgets::{ArcProgressBar, LineProgressBar};

/// Progress added or removed by one arrow key press.
const PROGRESS_STEP: f32 = 5.0;
/// Degrees added or removed by one bracket key press.
const ARC_ANGLE_STEP: f32 = 10.0;
const MIN_ARC_ANGLE: f32 = 10.0;
const MAX_ARC_ANGLE: f32 = 360.0;

/// Height in rows of the line bar.
const LINE_ROWS: u16 = 2;

const ARC_STATE_PREFIX: &str = "arc";
const LINE_STATE_PREFIX: &str = "line";

/// The result of updating the UI in response to user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// Quit the application
    Quit,
    /// Toggle help overlay
    ToggleHelp,
    /// Toggle pause state
    TogglePause,
    /// Other update (no action needed)
    Other,
}

/// Main UI controller.
pub struct Ui {
    arc: ArcProgressBar,
    line: LineProgressBar,
    /// Shared by both bars; set whenever either asks for a repaint.
    redraw: RedrawFlag,
    attributes: StyleAttributes,
    metrics: DisplayMetrics,
    /// Whether to show help overlay
    show_help: bool,
    /// UI theme
    theme: Theme,
    /// Progress last pushed into the bars, as (completed, total).
    synced: Option<(f32, f32)>,
}

impl Ui {
    /// Create a UI controller with both bars styled from `attributes`.
    pub fn new(metrics: DisplayMetrics, attributes: StyleAttributes) -> Self {
        let redraw = RedrawFlag::new();
        let arc = ArcProgressBar::with_attributes(metrics, &attributes, redraw.clone());
        let line = LineProgressBar::with_attributes(metrics, &attributes, redraw.clone());
        // Nothing has been drawn yet.
        redraw.invalidate();

        Self {
            arc,
            line,
            redraw,
            attributes,
            metrics,
            show_help: false,
            theme: Theme::default(),
            synced: None,
        }
    }

    pub fn arc(&self) -> &ArcProgressBar {
        &self.arc
    }

    pub fn line(&self) -> &LineProgressBar {
        &self.line
    }

    /// Toggle help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        self.redraw.invalidate();
    }

    pub fn is_showing_help(&self) -> bool {
        self.show_help
    }

    /// Set the theme.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.redraw.invalidate();
    }

    /// Whether a frame is due, clearing the request.
    pub fn needs_redraw(&self) -> bool {
        self.redraw.take()
    }

    /// Request a frame regardless of widget state.
    pub fn request_redraw(&self) {
        self.redraw.invalidate();
    }

    /// Handle keyboard input.
    pub fn handle_key_event(&mut self, key: KeyEvent, app_state: &mut AppState) -> Result<UpdateKind> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(UpdateKind::Quit);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(UpdateKind::Quit),
            KeyCode::F(1) | KeyCode::Char('?') => return Ok(UpdateKind::ToggleHelp),
            KeyCode::Char('p') => return Ok(UpdateKind::TogglePause),
            KeyCode::Left | KeyCode::Char('-') => app_state.adjust(-PROGRESS_STEP),
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => app_state.adjust(PROGRESS_STEP),
            KeyCode::Char('[') => self.step_arc_angle(-ARC_ANGLE_STEP),
            KeyCode::Char(']') => self.step_arc_angle(ARC_ANGLE_STEP),
            KeyCode::Char('m') => {
                app_state.halve_total();
                debug!(total = app_state.total, "halved max progress");
            }
            _ => {}
        }

        Ok(UpdateKind::Other)
    }

    fn step_arc_angle(&mut self, delta: f32) {
        let angle = (self.arc.arc_angle() + delta).clamp(MIN_ARC_ANGLE, MAX_ARC_ANGLE);
        if angle != self.arc.arc_angle() {
            self.arc.set_arc_angle(angle);
        }
    }

    /// Push the demo's progress into both bars. Properties are only written
    /// when the progress changed since the last sync, so an idle demo does
    /// not keep requesting frames.
    pub fn sync(&mut self, app_state: &AppState) {
        let progress = (app_state.completed, app_state.total);
        let Some((completed, total)) = self.synced else {
            self.write_max(progress.1);
            self.write_progress(progress.0);
            self.synced = Some(progress);
            return;
        };

        if total != progress.1 {
            self.write_max(progress.1);
        }
        if completed != progress.0 {
            self.write_progress(progress.0);
        }
        self.synced = Some(progress);
    }

    fn write_max(&mut self, total: f32) {
        self.arc.set_max_progress(total);
        self.line.set_max_progress(total);
        self.write_labels();
    }

    fn write_progress(&mut self, completed: f32) {
        self.arc.set_current_progress(completed);
        self.line.set_current_progress(completed);
        self.write_labels();
    }

    fn write_labels(&mut self) {
        let percent = widgets::progress_fraction(self.arc.current_progress(), self.arc.max_progress()) * 100.0;
        self.arc.set_central_text(Some(format!("{percent:.0}%")));
        self.arc.set_bottom_text(Some(format!(
            "{:.0} / {:.0}",
            self.arc.current_progress(),
            self.arc.max_progress()
        )));
    }

    /// Rebuild both bars from the style source, carrying their saved state
    /// over, as a host does after a configuration change.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        info!(width, height, "terminal resized, rebuilding progress bars");
        let saved = self.save_state();

        self.arc = ArcProgressBar::with_attributes(self.metrics, &self.attributes, self.redraw.clone());
        self.line = LineProgressBar::with_attributes(self.metrics, &self.attributes, self.redraw.clone());

        if let Err(error) = self.restore_state(&saved) {
            warn!(%error, "failed to restore progress bars after resize");
            // Labels and progress are pushed again on the next sync.
            self.synced = None;
        }
        self.redraw.invalidate();
    }

    /// Saved state of both bars in one bundle.
    pub fn save_state(&self) -> Bundle {
        let mut bundle = self.arc.save_state().nest(ARC_STATE_PREFIX);
        bundle.extend(self.line.save_state().nest(LINE_STATE_PREFIX));
        bundle
    }

    pub fn restore_state(&mut self, bundle: &Bundle) -> Result<()> {
        self.arc.restore_state(&bundle.unnest(ARC_STATE_PREFIX))?;
        self.line.restore_state(&bundle.unnest(LINE_STATE_PREFIX))?;
        Ok(())
    }

    /// Render the UI.
    pub fn render(&mut self, frame: &mut Frame, app_state: &AppState) {
        let area = frame.size();
        if area.height < 3 {
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        let block = Block::default()
            .title(Span::styled(" Progress widgets ", self.theme.header_style))
            .borders(Borders::ALL)
            .style(self.theme.block_style);
        let inner = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);

        let widget_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(LINE_ROWS),
                Constraint::Length(1),
            ])
            .split(inner);

        let arc_area = fit_aspect(widget_chunks[0], self.arc.suggested_minimum_size());
        self.render_arc(frame, arc_area);

        let line_area = Rect {
            x: widget_chunks[2].x + 1,
            width: widget_chunks[2].width.saturating_sub(2),
            ..widget_chunks[2]
        };
        self.render_line(frame, line_area);

        self.render_status_line(frame, chunks[1], app_state);

        // Render help overlay if active (always on top)
        if self.show_help {
            HelpView::render(frame, area, &self.theme);
        }
    }

    fn render_arc(&mut self, frame: &mut Frame, area: Rect) {
        if area.is_empty() {
            return;
        }
        self.arc.measure(cell_constraints(area));
        let mut canvas = TerminalCanvas::new(frame.buffer_mut(), area).background(self.theme.canvas_background);
        self.arc.paint(&mut canvas);
    }

    fn render_line(&mut self, frame: &mut Frame, area: Rect) {
        if area.is_empty() {
            return;
        }
        self.line.measure(cell_constraints(area));
        let mut canvas = TerminalCanvas::new(frame.buffer_mut(), area).background(self.theme.canvas_background);
        self.line.paint(&mut canvas);
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect, app_state: &AppState) {
        let (status, status_style) = match app_state.temporality {
            Temporality::Live => ("LIVE", self.theme.status_live),
            Temporality::Paused => ("PAUSED", self.theme.status_paused),
        };

        let status_line = Line::from(vec![
            Span::styled(status, status_style),
            Span::styled(" | Progress: ", self.theme.label_style),
            Span::styled(
                format!("{:.1}/{:.1}", self.arc.current_progress(), self.arc.max_progress()),
                self.theme.value_style,
            ),
            Span::styled(" | Arc: ", self.theme.label_style),
            Span::styled(format!("{:.0}°", self.arc.arc_angle()), self.theme.value_style),
            Span::styled(" | Updates: ", self.theme.label_style),
            Span::styled(app_state.updates.to_string(), self.theme.value_style),
            Span::styled(" | Press ? for help", self.theme.help_style),
        ]);

        frame.render_widget(Paragraph::new(status_line), area);
    }
}

/// Exact pixel constraints covering `area`.
fn cell_constraints(area: Rect) -> Constraints {
    Constraints::exactly(
        f32::from(area.width) * DEFAULT_CELL_WIDTH,
        f32::from(area.height) * DEFAULT_CELL_HEIGHT,
    )
}

/// Largest rectangle inside `area` with the pixel aspect ratio of `size`,
/// centered.
fn fit_aspect(area: Rect, size: layout::Size) -> Rect {
    if area.is_empty() || size.width <= 0.0 || size.height <= 0.0 {
        return area;
    }
    let aspect = size.width / size.height;
    let width_px = f32::from(area.width) * DEFAULT_CELL_WIDTH;
    let height_px = f32::from(area.height) * DEFAULT_CELL_HEIGHT;

    let (fit_width_px, fit_height_px) = if width_px / height_px > aspect {
        (height_px * aspect, height_px)
    } else {
        (width_px, width_px / aspect)
    };
    let width = ((fit_width_px / DEFAULT_CELL_WIDTH).round() as u16).clamp(1, area.width);
    let height = ((fit_height_px / DEFAULT_CELL_HEIGHT).round() as u16).clamp(1, area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use rstest::rstest;

    fn ui() -> Ui {
        Ui::new(DisplayMetrics::default(), StyleAttributes::new())
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[rstest]
    #[case(press(KeyCode::Char('q')), UpdateKind::Quit)]
    #[case(press(KeyCode::Esc), UpdateKind::Quit)]
    #[case(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), UpdateKind::Quit)]
    #[case(press(KeyCode::Char('?')), UpdateKind::ToggleHelp)]
    #[case(press(KeyCode::F(1)), UpdateKind::ToggleHelp)]
    #[case(press(KeyCode::Char('p')), UpdateKind::TogglePause)]
    #[case(press(KeyCode::Char('x')), UpdateKind::Other)]
    fn keys_map_to_updates(#[case] key: KeyEvent, #[case] expected: UpdateKind) {
        let mut ui = ui();
        let mut state = AppState::new();
        assert_eq!(ui.handle_key_event(key, &mut state).unwrap(), expected);
    }

    #[test]
    fn arrow_keys_adjust_progress() {
        let mut ui = ui();
        let mut state = AppState::new();
        ui.handle_key_event(press(KeyCode::Right), &mut state).unwrap();
        ui.handle_key_event(press(KeyCode::Right), &mut state).unwrap();
        ui.handle_key_event(press(KeyCode::Left), &mut state).unwrap();
        assert_eq!(state.completed, PROGRESS_STEP);
    }

    #[test]
    fn brackets_step_the_arc_angle_within_bounds() {
        let mut ui = ui();
        let mut state = AppState::new();
        ui.handle_key_event(press(KeyCode::Char(']')), &mut state).unwrap();
        assert_eq!(ui.arc().arc_angle(), 210.0);

        for _ in 0..30 {
            ui.handle_key_event(press(KeyCode::Char('[')), &mut state).unwrap();
        }
        assert_eq!(ui.arc().arc_angle(), MIN_ARC_ANGLE);
    }

    #[test]
    fn sync_writes_progress_and_labels() {
        let mut ui = ui();
        let mut state = AppState::new();
        state.adjust(42.0);
        ui.sync(&state);

        assert_eq!(ui.arc().current_progress(), 42.0);
        assert_eq!(ui.line().current_progress(), 42.0);
        assert_eq!(ui.arc().central_text(), Some("42%"));
        assert_eq!(ui.arc().bottom_text(), Some("42 / 100"));
    }

    #[test]
    fn unchanged_progress_requests_no_frame() {
        let mut ui = ui();
        let state = AppState::new();
        ui.sync(&state);
        assert!(ui.needs_redraw());

        ui.sync(&state);
        assert!(!ui.needs_redraw());
    }

    #[test]
    fn halving_max_leaves_stale_progress_on_the_bars() {
        let mut ui = ui();
        let mut state = AppState::new();
        state.adjust(80.0);
        ui.sync(&state);

        ui.handle_key_event(press(KeyCode::Char('m')), &mut state).unwrap();
        ui.sync(&state);
        assert_eq!(ui.arc().max_progress(), 50.0);
        assert_eq!(ui.arc().current_progress(), 80.0);
        assert_eq!(ui.line().current_progress(), 80.0);
    }

    #[test]
    fn resize_carries_state_over() {
        let mut ui = ui();
        let mut state = AppState::new();
        state.adjust(30.0);
        ui.sync(&state);
        ui.handle_key_event(press(KeyCode::Char(']')), &mut state).unwrap();
        let before = ui.save_state();
        ui.needs_redraw();

        ui.handle_resize(100, 40);
        assert_eq!(ui.save_state(), before);
        assert!(ui.needs_redraw());
    }

    #[test]
    fn renders_into_a_terminal() {
        let mut ui = ui();
        let mut state = AppState::new();
        state.adjust(50.0);
        ui.sync(&state);

        let mut terminal = Terminal::new(TestBackend::new(60, 24)).unwrap();
        terminal.draw(|frame| ui.render(frame, &state)).unwrap();

        assert!(ui.arc().measured_size().is_some());
        assert!(ui.line().measured_size().is_some());
        let buffer = terminal.backend().buffer();
        let status: String = (0..buffer.area.width)
            .map(|x| buffer.get(x, buffer.area.height - 1).symbol().to_string())
            .collect();
        assert!(status.starts_with("LIVE | Progress: 50.0/100.0"));
    }

    #[test]
    fn tiny_terminal_is_left_alone() {
        let mut ui = ui();
        let state = AppState::new();
        let mut terminal = Terminal::new(TestBackend::new(10, 2)).unwrap();
        terminal.draw(|frame| ui.render(frame, &state)).unwrap();
        assert_eq!(ui.arc().measured_size(), None);
    }

    #[test]
    fn fit_aspect_centers_a_wide_box() {
        let area = Rect::new(0, 0, 100, 10);
        let fitted = fit_aspect(area, layout::Size::new(150.0, 96.0));
        assert_eq!(fitted.height, 10);
        assert_eq!(fitted.width, 31);
        assert_eq!(fitted.x, 34);
    }
}
