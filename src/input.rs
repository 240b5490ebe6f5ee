//! Raw input records
//!
//! A [`RawInput`] maps feature names to values collected for a single
//! inference request. `None` marks a clinical value the caller did not provide.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};

/// Feature values for one assessment
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawInput {
    values: BTreeMap<String, Option<f64>>,
}

/// A value as it arrives over JSON, before numeric validation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl InputValue {
    /// Convert to a numeric feature value
    ///
    /// Booleans map to 1/0. Text must parse as a number; blank text counts as
    /// not provided.
    pub fn to_feature(&self, feature: &str) -> Result<Option<f64>> {
        match self {
            Self::Flag(b) => Ok(Some(if *b { 1.0 } else { 0.0 })),
            Self::Number(n) => Ok(Some(*n)),
            Self::Text(s) => parse_numeric(feature, s),
        }
    }
}

/// Parse a user-entered numeric value; blank is "not provided"
pub fn parse_numeric(feature: &str, raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(RiskError::MalformedInput {
            feature: feature.to_string(),
            value: raw.to_string(),
        }),
    }
}

impl RawInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a yes/no symptom answer as 1 or 0
    pub fn set_flag(&mut self, feature: impl Into<String>, present: bool) {
        self.values
            .insert(feature.into(), Some(if present { 1.0 } else { 0.0 }));
    }

    /// Record a numeric value, `None` meaning not provided
    pub fn set_value(&mut self, feature: impl Into<String>, value: Option<f64>) {
        self.values.insert(feature.into(), value);
    }

    /// Builder form of [`RawInput::set_value`]
    #[must_use]
    pub fn with(mut self, feature: impl Into<String>, value: Option<f64>) -> Self {
        self.set_value(feature, value);
        self
    }

    /// Value for a feature: outer `None` if absent, inner `None` if not provided
    #[must_use]
    pub fn get(&self, feature: &str) -> Option<Option<f64>> {
        self.values.get(feature).copied()
    }

    #[must_use]
    pub fn contains(&self, feature: &str) -> bool {
        self.values.contains_key(feature)
    }

    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build from JSON-shaped maps, applied in order so later maps win
    pub fn from_json_maps<'a, I>(maps: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a BTreeMap<String, Option<InputValue>>>,
    {
        let mut input = Self::new();
        for map in maps {
            for (feature, value) in map {
                let value = match value {
                    Some(v) => v.to_feature(feature)?,
                    None => None,
                };
                input.set_value(feature.clone(), value);
            }
        }
        Ok(input)
    }
}

impl<'de> Deserialize<'de> for RawInput {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Option<InputValue>>::deserialize(deserializer)?;
        Self::from_json_maps([&raw]).map_err(serde::de::Error::custom)
    }
}

impl FromIterator<(String, Option<f64>)> for RawInput {
    fn from_iter<T: IntoIterator<Item = (String, Option<f64>)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
