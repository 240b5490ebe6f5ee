//! Preprocessing artifact: feature alignment, imputation and scaling
//!
//! The artifact is fitted once during training and is immutable afterwards.
//! At inference time a [`RawInput`] is aligned to the canonical feature order,
//! missing values are imputed, and the result is standardized.

mod fit;

pub use fit::{fit_median_imputer, fit_standard_scaler, impute_matrix, transform_matrix};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};
use crate::input::RawInput;
use crate::store::ArtifactId;

/// Value substituted for an expected feature the caller left out entirely
pub const ABSENT_FEATURE_DEFAULT: f64 = 0.0;

/// Per-feature fill values for missing entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Imputer {
    pub fill_values: Vec<f64>,
}

/// Per-feature standardization parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scaler {
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
}

/// Fitted preprocessing state for one disease
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingArtifact {
    /// Canonical feature order used when the artifact was fitted
    pub features: Vec<String>,
    pub imputer: Imputer,
    pub scaler: Scaler,
}

/// An input record laid out in canonical feature order
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// One entry per canonical feature; `None` is left for the imputer
    pub values: Vec<Option<f64>>,
    /// Expected features absent from the input, filled with [`ABSENT_FEATURE_DEFAULT`]
    pub defaulted: Vec<String>,
    /// Input features the artifact does not know about
    pub ignored: Vec<String>,
}

impl Imputer {
    /// Replace missing entries with the stored fill values
    #[must_use]
    pub fn transform(&self, values: &[Option<f64>]) -> Vec<f64> {
        values
            .iter()
            .zip(&self.fill_values)
            .map(|(v, fill)| v.filter(|x| !x.is_nan()).unwrap_or(*fill))
            .collect()
    }
}

impl Scaler {
    /// Standardize each entry with the stored center and scale
    #[must_use]
    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect()
    }
}

impl PreprocessingArtifact {
    #[must_use]
    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    /// Check structural consistency, as done when the artifact is loaded
    pub fn validate(&self, id: ArtifactId) -> Result<()> {
        let n = self.features.len();
        if n == 0 {
            return Err(RiskError::corrupt(id, "feature list is empty"));
        }
        if let Some(dup) = self.features.iter().duplicates().next() {
            return Err(RiskError::corrupt(id, format!("duplicate feature {dup}")));
        }
        for (name, len) in [
            ("imputer.fill_values", self.imputer.fill_values.len()),
            ("scaler.means", self.scaler.means.len()),
            ("scaler.scales", self.scaler.scales.len()),
        ] {
            if len != n {
                return Err(RiskError::corrupt(
                    id,
                    format!("{name} has {len} entries, expected {n}"),
                ));
            }
        }
        let all_finite = self
            .imputer
            .fill_values
            .iter()
            .chain(&self.scaler.means)
            .chain(&self.scaler.scales)
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(RiskError::corrupt(id, "non-finite parameter"));
        }
        if let Some(i) = self.scaler.scales.iter().position(|s| *s == 0.0) {
            return Err(RiskError::corrupt(
                id,
                format!("zero scale for feature {}", self.features[i]),
            ));
        }
        Ok(())
    }

    /// Lay out an input record in canonical order
    #[must_use]
    pub fn align(&self, input: &RawInput) -> Alignment {
        let mut defaulted = Vec::new();
        let values = self
            .features
            .iter()
            .map(|feature| match input.get(feature) {
                Some(value) => value,
                None => {
                    defaulted.push(feature.clone());
                    Some(ABSENT_FEATURE_DEFAULT)
                }
            })
            .collect();
        let ignored = input
            .features()
            .filter(|f| !self.features.iter().any(|known| known == f))
            .map(str::to_string)
            .collect();
        Alignment {
            values,
            defaulted,
            ignored,
        }
    }

    /// Impute then scale an aligned vector
    #[must_use]
    pub fn transform(&self, aligned: &[Option<f64>]) -> Vec<f64> {
        self.scaler.transform(&self.imputer.transform(aligned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disease::Disease;
    use crate::store::ArtifactKind;

    fn artifact() -> PreprocessingArtifact {
        PreprocessingArtifact {
            features: vec!["fatigue".into(), "age".into(), "bmi".into()],
            imputer: Imputer {
                fill_values: vec![0.0, 50.0, 25.0],
            },
            scaler: Scaler {
                means: vec![0.5, 40.0, 25.0],
                scales: vec![0.5, 10.0, 5.0],
            },
        }
    }

    fn id() -> ArtifactId {
        ArtifactId::new(Disease::Diabetes, ArtifactKind::Preprocessing)
    }

    #[test]
    fn test_align_defaults_absent_and_keeps_missing() {
        let input = RawInput::new()
            .with("age", None)
            .with("bmi", Some(30.0))
            .with("shoe_size", Some(42.0));
        let aligned = artifact().align(&input);

        assert_eq!(aligned.values, vec![Some(0.0), None, Some(30.0)]);
        assert_eq!(aligned.defaulted, vec!["fatigue".to_string()]);
        assert_eq!(aligned.ignored, vec!["shoe_size".to_string()]);
    }

    #[test]
    fn test_transform_imputes_before_scaling() {
        let art = artifact();
        let out = art.transform(&[Some(1.0), None, Some(30.0)]);
        assert_eq!(out, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        let mut art = artifact();
        art.scaler.means.pop();
        let err = art.validate(id()).unwrap_err();
        assert!(err.to_string().contains("scaler.means"));
    }

    #[test]
    fn test_validate_rejects_zero_scale_and_duplicates() {
        let mut art = artifact();
        art.scaler.scales[2] = 0.0;
        assert!(matches!(
            art.validate(id()),
            Err(RiskError::ArtifactCorrupt { .. })
        ));

        let mut art = artifact();
        art.features[2] = "age".into();
        assert!(art.validate(id()).is_err());

        assert!(artifact().validate(id()).is_ok());
    }
}
