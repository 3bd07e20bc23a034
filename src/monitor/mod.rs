//! Simulated progress feed for the demo host.
//!
//! Stands in for whatever real work a host would track: every poll interval
//! it reports a random amount of completed work.

use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::{Duration, Instant};
use tracing::trace;

/// Default interval between simulated progress updates.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(400);

/// Amount of work completed since the previous update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    pub delta: f32,
}

/// Produces [`ProgressUpdate`]s at a fixed pace.
pub struct ProgressMonitor {
    rng: StdRng,
    step: Range<f32>,
    poll_interval: Duration,
    last_poll: Option<Instant>,
}

impl ProgressMonitor {
    /// Create a monitor reporting steps drawn from `step`.
    pub fn new(step: Range<f32>) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            step,
            poll_interval: DEFAULT_POLL_INTERVAL,
            last_poll: None,
        }
    }

    /// Use a fixed seed, for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// The next update, if a poll interval has passed since the last one.
    pub async fn poll(&mut self) -> Option<ProgressUpdate> {
        let now = Instant::now();
        if let Some(last) = self.last_poll {
            if now.duration_since(last) < self.poll_interval {
                return None;
            }
        }
        self.last_poll = Some(now);

        let delta = if self.step.is_empty() {
            self.step.start
        } else {
            self.rng.gen_range(self.step.clone())
        };
        trace!(delta, "simulated progress");
        Some(ProgressUpdate { delta })
    }
}
