//! Saved widget state.
//!
//! A [`Bundle`] is the opaque key/value set a host keeps across a teardown
//! and rebuild of its UI (a rotation, a theme switch, a resize). Widgets
//! write every configurable property into it and read them all back; the
//! host only moves the bundle around, usually as JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StateError;
use crate::graphics::Color;
use crate::style::TextAppearance;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bundle {
    values: BTreeMap<String, Value>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Prefix every key, so several widgets can share one bundle.
    pub fn nest(self, prefix: &str) -> Bundle {
        Bundle {
            values: self
                .values
                .into_iter()
                .map(|(key, value)| (format!("{prefix}.{key}"), value))
                .collect(),
        }
    }

    /// Inverse of [`Bundle::nest`]: the entries under `prefix`, unprefixed.
    pub fn unnest(&self, prefix: &str) -> Bundle {
        let prefix = format!("{prefix}.");
        Bundle {
            values: self
                .values
                .iter()
                .filter_map(|(key, value)| {
                    key.strip_prefix(&prefix).map(|rest| (rest.to_string(), value.clone()))
                })
                .collect(),
        }
    }

    pub fn extend(&mut self, other: Bundle) {
        self.values.extend(other.values);
    }

    pub fn put_f32(&mut self, key: &str, value: f32) {
        self.values.insert(key.to_string(), Value::from(value));
    }

    pub fn put_color(&mut self, key: &str, value: Color) {
        self.values.insert(key.to_string(), Value::from(value.0));
    }

    pub fn put_text(&mut self, key: &str, value: Option<&str>) {
        self.values.insert(key.to_string(), value.map_or(Value::Null, Value::from));
    }

    pub fn put_appearance(&mut self, key: &str, value: TextAppearance) {
        self.values.insert(key.to_string(), Value::from(value.name()));
    }

    pub fn get_f32(&self, key: &str) -> Result<f32, StateError> {
        self.get(key)?
            .as_f64()
            .map(|v| v as f32)
            .ok_or_else(|| mismatch(key, "number"))
    }

    /// Like [`Bundle::get_f32`], but a number failing `valid` is reported
    /// as a mismatch against `expected`.
    pub fn get_f32_where(
        &self,
        key: &str,
        expected: &'static str,
        valid: impl Fn(f32) -> bool,
    ) -> Result<f32, StateError> {
        let value = self.get_f32(key)?;
        if valid(value) {
            Ok(value)
        } else {
            Err(mismatch(key, expected))
        }
    }

    pub fn get_color(&self, key: &str) -> Result<Color, StateError> {
        self.get(key)?
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .map(Color)
            .ok_or_else(|| mismatch(key, "32-bit color"))
    }

    pub fn get_text(&self, key: &str) -> Result<Option<String>, StateError> {
        match self.get(key)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            _ => Err(mismatch(key, "string or null")),
        }
    }

    pub fn get_appearance(&self, key: &str) -> Result<TextAppearance, StateError> {
        self.get(key)?
            .as_str()
            .and_then(|name| name.parse().ok())
            .ok_or_else(|| mismatch(key, "text appearance name"))
    }

    pub fn to_json(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StateError> {
        Ok(serde_json::from_str(json)?)
    }

    fn get(&self, key: &str) -> Result<&Value, StateError> {
        self.values
            .get(key)
            .ok_or_else(|| StateError::MissingKey(key.to_string()))
    }
}

fn mismatch(key: &str, expected: &'static str) -> StateError {
    StateError::TypeMismatch {
        key: key.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn typed_values_survive_json() {
        let mut bundle = Bundle::new();
        bundle.put_f32("angle", 212.5);
        bundle.put_color("color", Color(0xFF4CAF50));
        bundle.put_text("label", Some("42%"));
        bundle.put_text("caption", None);
        bundle.put_appearance("style", TextAppearance::Body2);

        let restored = Bundle::from_json(&bundle.to_json().unwrap()).unwrap();

        assert_eq!(restored, bundle);
        assert_eq!(restored.get_f32("angle").unwrap(), 212.5);
        assert_eq!(restored.get_color("color").unwrap(), Color(0xFF4CAF50));
        assert_eq!(restored.get_text("label").unwrap().as_deref(), Some("42%"));
        assert_eq!(restored.get_text("caption").unwrap(), None);
        assert_eq!(restored.get_appearance("style").unwrap(), TextAppearance::Body2);
    }

    #[test]
    fn missing_and_mistyped_keys_are_reported() {
        let mut bundle = Bundle::new();
        bundle.put_text("angle", Some("wide"));

        assert!(matches!(bundle.get_f32("max"), Err(StateError::MissingKey(key)) if key == "max"));
        assert!(matches!(
            bundle.get_f32("angle"),
            Err(StateError::TypeMismatch { expected: "number", .. })
        ));
    }

    #[test]
    fn nesting_round_trips() {
        let mut inner = Bundle::new();
        inner.put_f32("max", 100.0);

        let nested = inner.clone().nest("arc");
        assert!(nested.contains_key("arc.max"));
        assert_eq!(nested.unnest("arc"), inner);
        assert!(nested.unnest("line").is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(Bundle::from_json("{ nope"), Err(StateError::Json(_))));
    }
}
