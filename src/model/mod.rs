//! Model artifacts
//!
//! A model artifact turns an aligned, scaled feature vector into the
//! probability of the positive ("at risk") class.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};
use crate::store::ArtifactId;

/// Binary classifier producing a positive-class probability
pub trait Classifier: Send + Sync {
    /// Number of features the classifier expects
    fn num_features(&self) -> usize;

    /// Probability in [0, 1] that the sample belongs to the positive class
    fn predict_proba(&self, features: &[f64]) -> f64;
}

/// Logistic regression parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub weights: Vec<f64>,
}

impl LogisticModel {
    /// Same decision boundary with the classes swapped
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            intercept: -self.intercept,
            weights: self.weights.iter().map(|w| -w).collect(),
        }
    }

    fn logit(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .weights
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

impl Classifier for LogisticModel {
    fn num_features(&self) -> usize {
        self.weights.len()
    }

    fn predict_proba(&self, features: &[f64]) -> f64 {
        sigmoid(self.logit(features))
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Persisted classifier for one disease
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Logistic(LogisticModel),
}

impl ModelArtifact {
    fn classifier(&self) -> &dyn Classifier {
        match self {
            Self::Logistic(m) => m,
        }
    }

    /// Check the artifact against the feature count of its preprocessing artifact
    pub fn validate(&self, id: ArtifactId, expected_features: usize) -> Result<()> {
        let n = self.num_features();
        if n != expected_features {
            return Err(RiskError::corrupt(
                id,
                format!("model expects {n} features, preprocessing provides {expected_features}"),
            ));
        }
        let Self::Logistic(m) = self;
        if !m.intercept.is_finite() || m.weights.iter().any(|w| !w.is_finite()) {
            return Err(RiskError::corrupt(id, "non-finite model parameter"));
        }
        Ok(())
    }
}

impl Classifier for ModelArtifact {
    fn num_features(&self) -> usize {
        self.classifier().num_features()
    }

    fn predict_proba(&self, features: &[f64]) -> f64 {
        self.classifier().predict_proba(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disease::Disease;
    use crate::store::ArtifactKind;

    #[test]
    fn test_zero_logit_is_even_odds() {
        let model = LogisticModel {
            intercept: 0.0,
            weights: vec![1.0, -1.0],
        };
        assert_eq!(model.predict_proba(&[2.0, 2.0]), 0.5);
        assert!(model.predict_proba(&[3.0, 0.0]) > 0.9);
        assert!(model.predict_proba(&[0.0, 3.0]) < 0.1);
    }

    #[test]
    fn test_flipped_is_complement() {
        let model = LogisticModel {
            intercept: 0.3,
            weights: vec![0.7, -1.2],
        };
        let x = [1.5, 0.25];
        let p = model.predict_proba(&x);
        let q = model.flipped().predict_proba(&x);
        assert!((p + q - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sigmoid_is_stable_for_large_logits() {
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
    }

    #[test]
    fn test_serialized_form_is_tagged() {
        let artifact = ModelArtifact::Logistic(LogisticModel {
            intercept: 0.5,
            weights: vec![1.0],
        });
        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["kind"], "logistic");
        assert_eq!(json["weights"][0], 1.0);

        let id = ArtifactId::new(Disease::Heart, ArtifactKind::Model);
        assert!(artifact.validate(id, 1).is_ok());
        assert!(matches!(
            artifact.validate(id, 3),
            Err(RiskError::ArtifactCorrupt { .. })
        ));
    }
}
