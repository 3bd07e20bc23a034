//! Application state management.
//!
//! Holds the progress the demo host feeds into its widgets, separate from
//! the widgets themselves so the UI can be torn down and rebuilt while the
//! work being tracked carries on.

pub mod bundle;

pub use bundle::Bundle;

use std::time::Instant;

use crate::monitor::ProgressUpdate;

/// Temporal state of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporality {
    /// Progress updates are applied.
    Live,
    /// Progress updates are dropped.
    Paused,
}

/// Application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Units of work done so far.
    pub completed: f32,
    /// Units of work in total.
    pub total: f32,
    /// Monitoring state.
    pub temporality: Temporality,
    /// Number of progress updates applied.
    pub updates: u64,
    /// Last time progress changed.
    pub last_update: Instant,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates a new application state.
    pub fn new() -> Self {
        Self {
            completed: 0.0,
            total: 100.0,
            temporality: Temporality::Live,
            updates: 0,
            last_update: Instant::now(),
        }
    }

    /// Apply a progress update. Completed work never exceeds the total and
    /// wraps back to zero once the total has been reached.
    pub fn apply(&mut self, update: ProgressUpdate) {
        if self.temporality == Temporality::Paused {
            return;
        }
        if self.is_finished() {
            self.completed = 0.0;
        } else {
            self.completed = (self.completed + update.delta).clamp(0.0, self.total);
        }
        self.updates += 1;
        self.last_update = Instant::now();
    }

    /// Nudge progress by hand, regardless of temporality.
    pub fn adjust(&mut self, delta: f32) {
        self.completed = (self.completed + delta).clamp(0.0, self.total);
        self.last_update = Instant::now();
    }

    /// Halve the total, leaving completed work as it is.
    pub fn halve_total(&mut self) {
        self.total = (self.total / 2.0).max(1.0);
    }

    pub fn toggle_pause(&mut self) {
        self.temporality = match self.temporality {
            Temporality::Live => Temporality::Paused,
            Temporality::Paused => Temporality::Live,
        };
    }

    pub fn is_finished(&self) -> bool {
        self.completed >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn updates_accumulate_up_to_the_total() {
        let mut state = AppState::new();
        state.apply(ProgressUpdate { delta: 60.0 });
        state.apply(ProgressUpdate { delta: 60.0 });
        assert_eq!(state.completed, 100.0);
        assert!(state.is_finished());

        state.apply(ProgressUpdate { delta: 5.0 });
        assert_eq!(state.completed, 0.0);
        assert_eq!(state.updates, 3);
    }

    #[test]
    fn paused_state_drops_updates() {
        let mut state = AppState::new();
        state.toggle_pause();
        state.apply(ProgressUpdate { delta: 10.0 });
        assert_eq!(state.completed, 0.0);
        assert_eq!(state.updates, 0);

        state.adjust(4.0);
        assert_eq!(state.completed, 4.0);
    }

    #[test]
    fn halving_the_total_keeps_completed_work() {
        let mut state = AppState::new();
        state.adjust(80.0);
        state.halve_total();
        assert_eq!(state.total, 50.0);
        assert_eq!(state.completed, 80.0);
    }
}
