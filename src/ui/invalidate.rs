//! Redraw scheduling.
//!
//! Every property write on a widget ends with one call to
//! [`Invalidate::invalidate`]. Coalescing several requests into one frame is
//! the host's job.

use std::cell::Cell;
use std::rc::Rc;

/// Host hook that schedules a repaint of a widget.
#[cfg_attr(test, mockall::automock)]
pub trait Invalidate {
    fn invalidate(&self);
}

impl<F: Fn()> Invalidate for F {
    fn invalidate(&self) {
        self()
    }
}

/// A shared dirty flag. Clones observe the same flag, so a host can hand one
/// clone to each widget and poll the original before drawing a frame.
#[derive(Debug, Clone, Default)]
pub struct RedrawFlag {
    requests: Rc<Cell<u64>>,
    pending: Rc<Cell<bool>>,
}

impl RedrawFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a redraw was requested since the last call, clearing the flag.
    pub fn take(&self) -> bool {
        self.pending.replace(false)
    }

    /// Total number of requests ever made through this flag.
    pub fn requests(&self) -> u64 {
        self.requests.get()
    }
}

impl Invalidate for RedrawFlag {
    fn invalidate(&self) {
        self.requests.set(self.requests.get() + 1);
        self.pending.set(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let flag = RedrawFlag::new();
        let handle = flag.clone();

        assert!(!flag.take());
        handle.invalidate();
        handle.invalidate();
        assert!(flag.take());
        assert!(!flag.take());
        assert_eq!(flag.requests(), 2);
    }

    #[test]
    fn closures_are_invalidators() {
        let hits = Cell::new(0);
        let hook = || hits.set(hits.get() + 1);
        hook.invalidate();
        assert_eq!(hits.get(), 1);
    }
}
