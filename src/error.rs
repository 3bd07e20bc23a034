//! Error types for the progress widgets library.
//!
//! Neither measurement nor painting can fail. These errors only surface at
//! the edges: parsing declarative style values and restoring saved state.

use thiserror::Error;

/// A style attribute value that could not be interpreted.
///
/// Widgets never propagate these; the attribute lookup logs the error and
/// falls back to the compiled-in default.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StyleError {
    #[error("invalid float value {0:?}")]
    InvalidFloat(String),

    #[error("invalid dimension {0:?} (expected a number with px, dp, dip or sp suffix)")]
    InvalidDimension(String),

    #[error("invalid color {0:?} (expected #RRGGBB or #AARRGGBB)")]
    InvalidColor(String),

    #[error("unknown text appearance {0:?}")]
    UnknownAppearance(String),
}

/// Failure to restore a widget from a saved-state bundle.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("saved state is missing key {0:?}")]
    MissingKey(String),

    #[error("saved state key {key:?} has the wrong type (expected {expected})")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("saved state could not be encoded or decoded: {0}")]
    Json(#[from] serde_json::Error),
}
