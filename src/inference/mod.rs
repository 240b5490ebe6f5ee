//! Risk inference
//!
//! The [`InferenceEngine`] aligns a raw input record to the artifact's feature
//! order, imputes and scales it, and asks the model for the positive-class
//! probability. Loaded artifacts are cached behind `Arc` and never mutated,
//! so one engine can serve concurrent requests.

use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, info, warn};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::disease::Disease;
use crate::error::{Result, RiskError};
use crate::input::RawInput;
use crate::model::Classifier;
use crate::store::{ArtifactBundle, ArtifactStore};

/// Round to two decimal places
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Outcome of one risk computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskResult {
    /// Positive-class probability as a percentage, two decimals
    pub risk: f64,
    /// Held-out test accuracy as a percentage, if it was recorded
    pub accuracy: Option<f64>,
}

/// Risk computation with detail about how the input was aligned
#[derive(Debug, Clone, PartialEq)]
pub struct RiskReport {
    pub result: RiskResult,
    /// Expected features the caller did not send, defaulted to zero
    pub defaulted: Vec<String>,
    /// Features the caller sent that the model does not use
    pub ignored: Vec<String>,
}

/// Computes risk scores from stored artifacts
pub struct InferenceEngine {
    store: Arc<dyn ArtifactStore>,
    cache: RwLock<FxHashMap<Disease, Arc<ArtifactBundle>>>,
}

impl InferenceEngine {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            store,
            cache: RwLock::new(FxHashMap::default()),
        }
    }

    /// Load artifacts for the given diseases, returning those that could not be loaded
    pub fn preload(&self, diseases: &[Disease]) -> Vec<(Disease, RiskError)> {
        let mut unavailable = Vec::new();
        for &disease in diseases {
            match self.bundle(disease) {
                Ok(bundle) => info!(
                    "Loaded {disease} model ({} features)",
                    bundle.preprocessing.num_features()
                ),
                Err(e) => {
                    warn!("{disease} model unavailable: {e}");
                    unavailable.push((disease, e));
                }
            }
        }
        unavailable
    }

    /// Artifacts for a disease, loaded from the store on first use
    pub fn bundle(&self, disease: Disease) -> Result<Arc<ArtifactBundle>> {
        if let Some(bundle) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&disease)
        {
            return Ok(Arc::clone(bundle));
        }

        // Loading is idempotent, so two racing loads simply agree
        let loaded = Arc::new(self.store.load(disease)?);
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(disease).or_insert(loaded)))
    }

    /// Drop cached artifacts so the next call reloads them from the store
    pub fn invalidate(&self, disease: Disease) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&disease);
    }

    /// Risk percentage and optional accuracy for one input record
    pub fn compute_risk(&self, disease: Disease, input: &RawInput) -> Result<RiskResult> {
        self.assess(disease, input).map(|report| report.result)
    }

    /// Like [`InferenceEngine::compute_risk`], also reporting defaulted and ignored features
    pub fn assess(&self, disease: Disease, input: &RawInput) -> Result<RiskReport> {
        let bundle = self.bundle(disease)?;
        let preprocessing = &bundle.preprocessing;

        let alignment = preprocessing.align(input);
        if !alignment.defaulted.is_empty() {
            warn!(
                "{disease}: {} of {} expected features missing from input, defaulted to 0: {}",
                alignment.defaulted.len(),
                preprocessing.num_features(),
                alignment.defaulted.join(", ")
            );
        }
        if !alignment.ignored.is_empty() {
            debug!(
                "{disease}: ignoring unknown input features: {}",
                alignment.ignored.join(", ")
            );
        }

        let vector = preprocessing.transform(&alignment.values);
        debug!("{disease}: transformed vector {vector:?}");

        let probability = bundle.model.predict_proba(&vector);
        let result = RiskResult {
            risk: round2(probability * 100.0),
            accuracy: bundle.accuracy.as_ref().map(|a| round2(a.accuracy * 100.0)),
        };

        Ok(RiskReport {
            result,
            defaulted: alignment.defaulted,
            ignored: alignment.ignored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(72.499_9), 72.5);
        assert_eq!(round2(0.813 * 100.0), 81.3);
        assert_eq!(round2(100.0), 100.0);
        assert_eq!(round2(0.0), 0.0);
    }
}
