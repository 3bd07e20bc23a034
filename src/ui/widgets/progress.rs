//! Progress value shared by the arc and line widgets.
//!
//! The current value is clamped against the maximum when it is written, not
//! when it is read. Lowering the maximum afterwards leaves a current value
//! above it until the next write to the current value.

use tracing::warn;

use crate::error::StateError;
use crate::state::Bundle;

/// Default maximum progress.
pub const DEFAULT_MAX_PROGRESS: f32 = 100.0;

/// Portion of `max` covered by `current`.
///
/// A zero maximum, or any other ratio that is not a finite number,
/// counts as no progress at all.
pub fn progress_fraction(current: f32, max: f32) -> f32 {
    let fraction = current / max;
    if fraction.is_finite() {
        fraction
    } else {
        0.0
    }
}

/// A size in px that can be stroked or drawn: finite and above zero.
pub(crate) fn is_positive_length(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn is_valid_max(max: f32) -> bool {
    max.is_finite() && max >= 0.0
}

/// Maximum and current progress of a widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    max: f32,
    current: f32,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            max: DEFAULT_MAX_PROGRESS,
            current: 0.0,
        }
    }
}

impl Progress {
    /// Rebuild from saved values without re-clamping. Returns `None` for a
    /// pair no sequence of accepted writes could have produced.
    fn from_saved(max: f32, current: f32) -> Option<Self> {
        (is_valid_max(max) && current.is_finite()).then_some(Self { max, current })
    }

    /// Read a saved pair from `bundle`, verbatim: a current value above max
    /// stays as it was.
    pub(crate) fn restore(bundle: &Bundle, max_key: &str, current_key: &str) -> Result<Self, StateError> {
        let max = bundle.get_f32_where(max_key, "non-negative number", is_valid_max)?;
        let current = bundle.get_f32(current_key)?;
        Self::from_saved(max, current).ok_or_else(|| StateError::TypeMismatch {
            key: current_key.to_string(),
            expected: "finite number",
        })
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// Returns whether the value was accepted. Negative and non-finite
    /// maximums are rejected.
    pub fn set_max(&mut self, max: f32) -> bool {
        if !is_valid_max(max) {
            warn!(max, "rejecting invalid max progress");
            return false;
        }
        self.max = max;
        true
    }

    /// Store `min(current, max)`. Returns whether the value was accepted.
    /// Values that would still be non-finite after the clamp, NaN and
    /// negative infinity, are rejected.
    pub fn set_current(&mut self, current: f32) -> bool {
        let clamped = current.min(self.max);
        if current.is_nan() || !clamped.is_finite() {
            warn!(current, "rejecting non-finite progress");
            return false;
        }
        self.current = clamped;
        true
    }

    pub fn fraction(&self) -> f32 {
        progress_fraction(self.current, self.max)
    }
}
