//! Named text appearances.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StyleError;
use crate::graphics::Typeface;

/// A named text style. Applying one to a text paint selects its typeface;
/// explicit size and color properties are layered on top afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextAppearance {
    #[default]
    Caption,
    Body1,
    Body2,
    Button,
    Subhead,
    Title,
    Headline,
    Display1,
}

impl TextAppearance {
    pub fn typeface(self) -> Typeface {
        match self {
            TextAppearance::Body2 | TextAppearance::Button | TextAppearance::Title => Typeface::Medium,
            TextAppearance::Caption
            | TextAppearance::Body1
            | TextAppearance::Subhead
            | TextAppearance::Headline
            | TextAppearance::Display1 => Typeface::Normal,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TextAppearance::Caption => "Caption",
            TextAppearance::Body1 => "Body1",
            TextAppearance::Body2 => "Body2",
            TextAppearance::Button => "Button",
            TextAppearance::Subhead => "Subhead",
            TextAppearance::Title => "Title",
            TextAppearance::Headline => "Headline",
            TextAppearance::Display1 => "Display1",
        }
    }
}

impl FromStr for TextAppearance {
    type Err = StyleError;

    /// Accepts the bare name (`Body2`) or a qualified style reference
    /// (`TextAppearance.Material.Body2`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let name = value.trim().rsplit('.').next().unwrap_or_default();
        match name {
            "Caption" => Ok(TextAppearance::Caption),
            "Body1" => Ok(TextAppearance::Body1),
            "Body2" => Ok(TextAppearance::Body2),
            "Button" => Ok(TextAppearance::Button),
            "Subhead" => Ok(TextAppearance::Subhead),
            "Title" => Ok(TextAppearance::Title),
            "Headline" => Ok(TextAppearance::Headline),
            "Display1" => Ok(TextAppearance::Display1),
            _ => Err(StyleError::UnknownAppearance(value.to_string())),
        }
    }
}
