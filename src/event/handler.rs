//! Event stream for the demo host.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::Stream;
use tokio::sync::mpsc;
use tracing::warn;

use super::{Event, EventDispatcher};

/// Stream of terminal events, fed by a background polling task.
pub struct EventHandler {
    event_rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Spawn the polling task. Must be called inside a tokio runtime.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        // crossterm polling blocks, so it gets a thread of its own.
        tokio::task::spawn_blocking(move || {
            let dispatcher = EventDispatcher::new(tick_rate);
            loop {
                match dispatcher.next() {
                    Ok(event) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        warn!(%error, "failed to read terminal event");
                        std::thread::sleep(Duration::from_millis(10));
                    }
                }
            }
        });

        Self { event_rx: rx }
    }

    /// Wrap an existing channel, for driving the app without a terminal.
    pub fn from_receiver(event_rx: mpsc::UnboundedReceiver<Event>) -> Self {
        Self { event_rx }
    }
}

impl Stream for EventHandler {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.event_rx.poll_recv(cx)
    }
}
