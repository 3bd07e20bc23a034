//! Terminal event handling for the demo host.
//!
//! A blocking poller turns crossterm input into [`Event`]s and forwards them
//! over a channel; the main loop consumes them as a [`futures::Stream`]
//! through [`EventHandler`].

pub mod handler;

pub use handler::EventHandler;

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use eyre::Result;

/// What the main loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// New terminal size in cells.
    Resize(u16, u16),
    /// Nothing happened within one tick rate.
    Tick,
}

impl From<CrosstermEvent> for Event {
    fn from(event: CrosstermEvent) -> Self {
        match event {
            // Release events would double every key press on some platforms
            CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => Event::Key(key),
            CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
            _ => Event::Tick,
        }
    }
}

/// Blocks for at most one tick rate per call.
pub struct EventDispatcher {
    tick_rate: Duration,
}

impl EventDispatcher {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            Ok(event::read()?.into())
        } else {
            Ok(Event::Tick)
        }
    }
}
