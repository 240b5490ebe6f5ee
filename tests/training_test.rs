mod utils;

use std::sync::Arc;

use chronic_risk::config::{DiseaseTrainingConfig, TargetRule, TrainingConfig};
use chronic_risk::{ArtifactStore, Disease, FsArtifactStore, InferenceEngine, RawInput, Trainer};
use pretty_assertions::assert_eq;
use utils::write_diabetes_csv;

fn config_for(dataset: std::path::PathBuf) -> TrainingConfig {
    let mut config = TrainingConfig::default();
    config.threads = 2;
    config.diseases.insert(
        Disease::Diabetes,
        DiseaseTrainingConfig {
            dataset,
            target: "Outcome".to_string(),
            target_rule: TargetRule::Binary,
        },
    );
    config
}

/// Test training on a separable CSV and scoring with the saved artifacts
#[test]
fn test_train_then_predict() -> chronic_risk::Result<()> {
    let data_dir = tempfile::tempdir()?;
    let model_dir = tempfile::tempdir()?;
    let dataset = write_diabetes_csv(data_dir.path());
    let store = Arc::new(FsArtifactStore::new(model_dir.path()));

    let trainer = Trainer::new(config_for(dataset), store.clone());
    let run = trainer.train_all(&[Disease::Diabetes])?;
    assert!(run.is_success());
    assert_eq!(run.succeeded.len(), 1);

    let summary = &run.succeeded[0];
    assert_eq!(summary.features, vec!["Glucose", "BMI", "Sex_M"]);
    assert_eq!(summary.test.samples, 12);
    assert!(summary.test.accuracy > 0.9, "accuracy {}", summary.test.accuracy);

    let bundle = store.load(Disease::Diabetes)?;
    let fill = bundle.preprocessing.imputer.fill_values[1];
    assert!(fill > 24.0 && fill < 34.0);

    let engine = InferenceEngine::new(store);
    let high = RawInput::new().with("Glucose", Some(185.0)).with("BMI", Some(28.5));
    let low = RawInput::new().with("Glucose", Some(90.0)).with("BMI", Some(28.5));
    let high = engine.compute_risk(Disease::Diabetes, &high)?;
    let low = engine.compute_risk(Disease::Diabetes, &low)?;
    assert!(high.risk > 50.0, "high risk {}", high.risk);
    assert!(low.risk < 50.0, "low risk {}", low.risk);
    assert!(high.accuracy.is_some());
    Ok(())
}

/// Test that one bad dataset does not stop the other diseases
#[test]
fn test_failure_is_isolated() -> chronic_risk::Result<()> {
    let data_dir = tempfile::tempdir()?;
    let model_dir = tempfile::tempdir()?;
    let mut config = config_for(write_diabetes_csv(data_dir.path()));
    config.diseases.insert(
        Disease::Heart,
        DiseaseTrainingConfig {
            dataset: data_dir.path().join("heart.csv"),
            target: "num".to_string(),
            target_rule: TargetRule::NonZero,
        },
    );

    let trainer = Trainer::new(config, Arc::new(FsArtifactStore::new(model_dir.path())));
    let run = trainer.train_all(&[Disease::Diabetes, Disease::Heart])?;
    assert_eq!(run.succeeded.len(), 1);
    assert_eq!(run.succeeded[0].disease, Disease::Diabetes);
    assert_eq!(run.failed.len(), 1);
    assert_eq!(run.failed[0].0, Disease::Heart);
    Ok(())
}
