//! Declarative style attributes.
//!
//! A style source is a flat map from attribute name to its written value,
//! the way a layout file would spell it (`"arc_stroke_width": "12dp"`). The
//! widgets read it once at construction through typed lookups that return
//! `None` for anything missing or malformed, so a bad value never does more
//! than leave the compiled-in default in place.

mod appearance;
mod metrics;

pub use appearance::TextAppearance;
pub use metrics::{Dimension, DisplayMetrics};

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use eyre::{Result, WrapErr};
use serde::Serialize;
use tracing::warn;

use crate::error::StyleError;
use crate::graphics::Color;

/// Typed, fallible-to-`None` lookups over a style source.
///
/// Implementors only provide [`AttributeSource::raw`].
pub trait AttributeSource {
    /// The value written for `name`, if any.
    fn raw(&self, name: &str) -> Option<&str>;

    fn get_float_or_none(&self, name: &str) -> Option<f32> {
        self.parsed(name, |value| {
            value
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| StyleError::InvalidFloat(value.to_string()))
        })
    }

    /// A dimension converted to device pixels.
    fn get_dimension_px_or_none(&self, name: &str, metrics: &DisplayMetrics) -> Option<f32> {
        self.parsed(name, Dimension::from_str).map(|d| metrics.to_px(d))
    }

    fn get_color_or_none(&self, name: &str) -> Option<Color> {
        self.parsed(name, Color::parse)
    }

    fn get_text_appearance_or_none(&self, name: &str) -> Option<TextAppearance> {
        self.parsed(name, TextAppearance::from_str)
    }

    /// The written string, empty or not.
    fn get_string_or_none(&self, name: &str) -> Option<String> {
        self.raw(name).map(str::to_string)
    }

    fn get_not_empty_string_or_none(&self, name: &str) -> Option<String> {
        self.raw(name).filter(|s| !s.is_empty()).map(str::to_string)
    }

    #[doc(hidden)]
    fn parsed<T>(&self, name: &str, parse: impl FnOnce(&str) -> Result<T, StyleError>) -> Option<T> {
        let value = self.raw(name)?;
        match parse(value) {
            Ok(parsed) => Some(parsed),
            Err(error) => {
                warn!(attribute = name, %error, "ignoring malformed style attribute");
                None
            }
        }
    }
}

/// A style source backed by an in-memory map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StyleAttributes {
    values: BTreeMap<String, String>,
}

impl StyleAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a JSON object. String, number and boolean values are kept in
    /// their written form; nested values are skipped.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut attributes = Self::new();
        for (name, value) in raw {
            match value {
                serde_json::Value::String(s) => attributes.insert(name, s),
                serde_json::Value::Number(n) => attributes.insert(name, n.to_string()),
                serde_json::Value::Bool(b) => attributes.insert(name, b.to_string()),
                other => warn!(attribute = %name, value = %other, "skipping non-scalar style attribute"),
            }
        }
        Ok(attributes)
    }

    /// Read a JSON style file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read style file {}", path.display()))?;
        Self::from_json(&json).wrap_err_with(|| format!("failed to parse style file {}", path.display()))
    }
}

impl AttributeSource for StyleAttributes {
    fn raw(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn typed_lookups_parse_written_values() {
        let attrs = StyleAttributes::new()
            .with("angle", "240")
            .with("stroke", "12dp")
            .with("color", "#FF212121")
            .with("appearance", "Body1")
            .with("text", "Loading");
        let metrics = DisplayMetrics::new(2.0, 2.0);

        assert_eq!(attrs.get_float_or_none("angle"), Some(240.0));
        assert_eq!(attrs.get_dimension_px_or_none("stroke", &metrics), Some(24.0));
        assert_eq!(attrs.get_color_or_none("color"), Some(Color(0xFF212121)));
        assert_eq!(attrs.get_text_appearance_or_none("appearance"), Some(TextAppearance::Body1));
        assert_eq!(attrs.get_string_or_none("text").as_deref(), Some("Loading"));
    }

    #[test]
    fn malformed_values_fall_back_to_none() {
        let attrs = StyleAttributes::new()
            .with("angle", "wide")
            .with("stroke", "12 furlongs")
            .with("color", "teal")
            .with("appearance", "Huge")
            .with("max", "inf");
        let metrics = DisplayMetrics::default();

        assert_eq!(attrs.get_float_or_none("angle"), None);
        assert_eq!(attrs.get_dimension_px_or_none("stroke", &metrics), None);
        assert_eq!(attrs.get_color_or_none("color"), None);
        assert_eq!(attrs.get_text_appearance_or_none("appearance"), None);
        assert_eq!(attrs.get_float_or_none("max"), None);
        assert_eq!(attrs.get_float_or_none("missing"), None);
    }

    #[test]
    fn empty_strings_only_pass_the_plain_lookup() {
        let attrs = StyleAttributes::new().with("text", "");
        assert_eq!(attrs.get_string_or_none("text").as_deref(), Some(""));
        assert_eq!(attrs.get_not_empty_string_or_none("text"), None);
    }

    #[test]
    fn json_scalars_keep_their_written_form() {
        let attrs = StyleAttributes::from_json(
            r#"{ "arc_angle": 240, "arc_bottom_text": "Downloads", "flag": true, "nested": { "a": 1 } }"#,
        )
        .unwrap();

        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs.raw("arc_angle"), Some("240"));
        assert_eq!(attrs.raw("arc_bottom_text"), Some("Downloads"));
        assert_eq!(attrs.raw("flag"), Some("true"));
        assert_eq!(attrs.raw("nested"), None);
    }

    #[test]
    fn json_must_be_an_object() {
        assert!(StyleAttributes::from_json("[1, 2, 3]").is_err());
    }
}
