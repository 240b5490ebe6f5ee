#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::DateTime;
use chronic_risk::model::{LogisticModel, ModelArtifact};
use chronic_risk::preprocess::{Imputer, PreprocessingArtifact, Scaler};
use chronic_risk::store::AccuracyRecord;
use chronic_risk::{
    ArtifactBundle, ArtifactStore, Disease, InferenceEngine, MemoryArtifactStore, RawInput,
};

/// Features of the hand-built diabetes model, in artifact order
pub const DIABETES_FEATURES: [&str; 5] = ["polydipsia", "polyuria", "glucose", "bmi", "hba1c"];

/// A small diabetes bundle where glucose and hba1c dominate the logit
#[must_use]
pub fn diabetes_bundle(accuracy: Option<f64>) -> ArtifactBundle {
    ArtifactBundle {
        model: ModelArtifact::Logistic(LogisticModel {
            intercept: -0.4,
            weights: vec![0.6, 0.5, 1.8, 0.4, 1.2],
        }),
        preprocessing: PreprocessingArtifact {
            features: DIABETES_FEATURES.iter().map(|f| (*f).to_string()).collect(),
            imputer: Imputer {
                fill_values: vec![0.0, 0.0, 117.0, 32.0, 5.8],
            },
            scaler: Scaler {
                means: vec![0.4, 0.45, 121.0, 32.5, 6.1],
                scales: vec![0.49, 0.5, 31.0, 7.8, 1.1],
            },
        },
        accuracy: accuracy.map(|accuracy| AccuracyRecord {
            accuracy,
            test_samples: 116,
            trained_at: DateTime::from_timestamp(1_717_171_717, 0).unwrap(),
        }),
    }
}

/// Engine over an in-memory store holding `bundle` for `disease`
pub fn engine_with(
    disease: Disease,
    bundle: &ArtifactBundle,
) -> chronic_risk::Result<InferenceEngine> {
    let store = MemoryArtifactStore::new();
    store.save(disease, bundle)?;
    Ok(InferenceEngine::new(Arc::new(store)))
}

/// The full diabetes questionnaire answered for a likely positive patient
#[must_use]
pub fn diabetes_answers() -> RawInput {
    [
        ("polydipsia", 1.0),
        ("polyuria", 1.0),
        ("polyphagia", 0.0),
        ("weight_loss", 0.0),
        ("fatigue", 1.0),
        ("blurred_vision", 0.0),
        ("family_history", 1.0),
        ("age", 45.0),
        ("bmi", 31.2),
        ("glucose", 160.0),
        ("hba1c", 7.1),
    ]
    .into_iter()
    .map(|(f, v)| (f.to_string(), Some(v)))
    .collect()
}

/// Write a CSV where high glucose means Outcome 1, with a few missing cells
pub fn write_diabetes_csv(dir: &Path) -> PathBuf {
    let mut csv = String::from("Glucose,BMI,Sex,Outcome\n");
    for i in 0..80 {
        let positive = i % 2 == 0;
        let glucose = if positive { 150 + i % 40 } else { 85 + i % 30 };
        let bmi = if i % 7 == 0 { "?".to_string() } else { format!("{}.5", 24 + i % 10) };
        let sex = if i % 3 == 0 { "F" } else { "M" };
        writeln!(csv, "{glucose},{bmi},{sex},{}", u8::from(positive)).unwrap();
    }
    let path = dir.join("diabetes.csv");
    std::fs::write(&path, csv).unwrap();
    path
}
