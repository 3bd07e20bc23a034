//! Application state and logic.
//!
//! Ties the simulated progress feed, the UI controller and terminal events
//! together in one loop.

use std::ops::Range;
use std::path::PathBuf;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::Terminal;
use tracing::{debug, info};

use crate::event::{Event, EventHandler};
use crate::monitor::ProgressMonitor;
use crate::state::AppState;
use crate::style::{DisplayMetrics, StyleAttributes};
use crate::ui::{self, Ui};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Terminal event polling interval.
    pub tick_rate_ms: u64,
    /// Interval between simulated progress updates.
    pub poll_interval_ms: u64,
    /// Range each simulated update is drawn from.
    pub progress_step: Range<f32>,
    /// Fixed seed for the simulated feed.
    pub seed: Option<u64>,
    pub density: f32,
    pub scaled_density: f32,
    /// JSON file of style attributes for both bars.
    pub style_path: Option<PathBuf>,
    pub log_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 100,
            poll_interval_ms: 400,
            progress_step: 0.5..4.0,
            seed: None,
            density: 1.0,
            scaled_density: 1.0,
            style_path: None,
            log_path: PathBuf::from("progress-widgets.log"),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn metrics(&self) -> DisplayMetrics {
        DisplayMetrics::new(self.density, self.scaled_density)
    }
}

/// Main application.
pub struct App {
    /// Application state
    state: AppState,
    /// Simulated progress feed
    monitor: ProgressMonitor,
    /// UI controller
    ui: Ui,
    /// Should the application exit?
    should_quit: bool,
}

impl App {
    /// Creates a new application instance.
    pub async fn new(config: AppConfig) -> Result<Self> {
        let attributes = match &config.style_path {
            Some(path) => {
                let attributes = StyleAttributes::load(path)?;
                info!(path = %path.display(), attributes = attributes.len(), "loaded style");
                attributes
            }
            None => StyleAttributes::new(),
        };

        let mut monitor = ProgressMonitor::new(config.progress_step.clone())
            .with_poll_interval(Duration::from_millis(config.poll_interval_ms));
        if let Some(seed) = config.seed {
            monitor = monitor.with_seed(seed);
        }

        Ok(Self {
            state: AppState::new(),
            monitor,
            ui: Ui::new(config.metrics(), attributes),
            should_quit: false,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    /// Runs the application main loop.
    pub async fn run(&mut self, terminal: &mut Terminal<impl Backend>, event_handler: &mut EventHandler) -> Result<()> {
        while !self.should_quit {
            self.ui.sync(&self.state);
            if self.ui.needs_redraw() {
                terminal.draw(|frame| self.ui.render(frame, &self.state))?;
            }

            match event_handler.next().await {
                Some(event) => self.handle_event(event)?,
                None => {
                    debug!("event stream closed");
                    break;
                }
            }

            self.update().await;
        }

        Ok(())
    }

    /// Runs the application main loop with Crossterm backend.
    pub async fn run_with_crossterm(&mut self, event_handler: &mut EventHandler) -> Result<()> {
        use ratatui::backend::CrosstermBackend;

        let mut terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;
        self.run(&mut terminal, event_handler).await
    }

    /// Applies simulated progress.
    async fn update(&mut self) {
        if let Some(update) = self.monitor.poll().await {
            self.state.apply(update);
        }
    }

    /// Handles input and other events.
    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Tick => Ok(()),
            Event::Resize(width, height) => {
                self.ui.handle_resize(width, height);
                Ok(())
            }
        }
    }

    /// Handles keyboard input.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        match self.ui.handle_key_event(key, &mut self.state)? {
            ui::UpdateKind::Quit => self.should_quit = true,
            ui::UpdateKind::TogglePause => {
                self.state.toggle_pause();
                info!(temporality = ?self.state.temporality, "toggled pause");
                self.ui.request_redraw();
            }
            ui::UpdateKind::ToggleHelp => self.ui.toggle_help(),
            ui::UpdateKind::Other => {}
        }
        Ok(())
    }
}
