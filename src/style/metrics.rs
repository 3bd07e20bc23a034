//! Density-independent units and their conversion to device pixels.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StyleError;

/// Scale factors of the display a widget is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    /// Pixels per dp.
    pub density: f32,
    /// Pixels per sp. Differs from `density` when the user scales fonts.
    pub scaled_density: f32,
}

impl Default for DisplayMetrics {
    fn default() -> Self {
        Self {
            density: 1.0,
            scaled_density: 1.0,
        }
    }
}

impl DisplayMetrics {
    pub fn new(density: f32, scaled_density: f32) -> Self {
        Self { density, scaled_density }
    }

    pub fn dp_to_px(&self, dp: f32) -> f32 {
        dp * self.density
    }

    pub fn px_to_dp(&self, px: f32) -> f32 {
        px / self.density
    }

    pub fn sp_to_px(&self, sp: f32) -> f32 {
        sp * self.scaled_density
    }

    pub fn to_px(&self, dimension: Dimension) -> f32 {
        match dimension {
            Dimension::Px(px) => px,
            Dimension::Dp(dp) => self.dp_to_px(dp),
            Dimension::Sp(sp) => self.sp_to_px(sp),
        }
    }
}

/// A length with its unit, as written in a style source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    Px(f32),
    Dp(f32),
    Sp(f32),
}

const UNITS: [(&str, fn(f32) -> Dimension); 4] = [
    ("px", Dimension::Px),
    ("dip", Dimension::Dp),
    ("dp", Dimension::Dp),
    ("sp", Dimension::Sp),
];

impl FromStr for Dimension {
    type Err = StyleError;

    /// Accepts `12px`, `12dp`, `12dip`, `12sp` or a bare number (px).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || StyleError::InvalidDimension(value.to_string());
        let trimmed = value.trim();
        let (number, unit) = UNITS
            .iter()
            .find_map(|&(suffix, unit)| trimmed.strip_suffix(suffix).map(|number| (number, unit)))
            .unwrap_or((trimmed, Dimension::Px as fn(f32) -> Dimension));

        let amount: f32 = number.trim().parse().map_err(|_| invalid())?;
        if !amount.is_finite() {
            return Err(invalid());
        }
        Ok(unit(amount))
    }
}
