//! Model training
//!
//! Each disease is trained independently: load the configured dataset, encode
//! it, split it, fit the preprocessing and a logistic regression on the
//! training rows, report validation and test metrics, and persist the
//! artifacts. Diseases run in parallel on a rayon pool and a failure for one
//! disease does not stop the others.

pub mod dataset;
pub mod encode;
pub mod metrics;
pub mod split;

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use linfa::Dataset;
use linfa::traits::{Fit, Predict};
use linfa_logistic::LogisticRegression;
use log::{error, info, warn};
use ndarray::Array1;
use rayon::prelude::*;

use crate::config::{DiseaseTrainingConfig, TrainingConfig};
use crate::disease::Disease;
use crate::error::{Result, RiskError};
use crate::model::{Classifier, LogisticModel, ModelArtifact};
use crate::preprocess::{
    PreprocessingArtifact, fit_median_imputer, fit_standard_scaler, impute_matrix,
    transform_matrix,
};
use crate::schema::FeatureSchema;
use crate::store::{AccuracyRecord, ArtifactBundle, ArtifactStore};
use crate::utils::logging::{create_main_progress_bar, finish_progress_bar};

pub use dataset::{TabularDataset, load_dataset};
pub use encode::EncodedDataset;
pub use metrics::ClassificationReport;
pub use split::{Split, SplitIndices, stratified_split};

/// Outcome of training one disease
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub disease: Disease,
    pub features: Vec<String>,
    pub train_samples: usize,
    pub validation: ClassificationReport,
    pub test: ClassificationReport,
    /// Questionnaire features the dataset does not provide
    pub missing_schema_features: Vec<String>,
}

/// Outcome of a multi-disease training run
#[derive(Debug, Default)]
pub struct TrainingRun {
    pub succeeded: Vec<TrainingSummary>,
    pub failed: Vec<(Disease, RiskError)>,
}

impl TrainingRun {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fits and persists artifacts for configured diseases
pub struct Trainer {
    config: TrainingConfig,
    store: Arc<dyn ArtifactStore>,
}

impl Trainer {
    pub fn new(config: TrainingConfig, store: Arc<dyn ArtifactStore>) -> Self {
        Self { config, store }
    }

    /// Train every listed disease on a dedicated thread pool
    pub fn train_all(&self, diseases: &[Disease]) -> Result<TrainingRun> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads.min(diseases.len()).max(1))
            .build()
            .map_err(|e| RiskError::Io(std::io::Error::other(e)))?;

        let pb = create_main_progress_bar(diseases.len() as u64, Some("Training models"));
        let results: Vec<(Disease, Result<TrainingSummary>)> = pool.install(|| {
            diseases
                .par_iter()
                .map(|&disease| {
                    let result = self.train_disease(disease);
                    pb.inc(1);
                    (disease, result)
                })
                .collect()
        });
        finish_progress_bar(&pb, Some("Training complete"));

        let mut run = TrainingRun::default();
        for (disease, result) in results {
            match result {
                Ok(summary) => run.succeeded.push(summary),
                Err(e) => {
                    error!("Training {disease} failed: {e}");
                    run.failed.push((disease, e));
                }
            }
        }
        info!(
            "Trained {} of {} models",
            run.succeeded.len(),
            diseases.len()
        );
        Ok(run)
    }

    /// Train one disease from its configured dataset and save the artifacts
    pub fn train_disease(&self, disease: Disease) -> Result<TrainingSummary> {
        let settings = self.config.diseases.get(&disease).ok_or_else(|| {
            RiskError::training(disease, "no dataset configured")
        })?;
        let dataset = load_dataset(&settings.dataset)?;
        self.train_on(disease, dataset, settings)
    }

    /// Train one disease from an already loaded dataset and save the artifacts
    pub fn train_on(
        &self,
        disease: Disease,
        dataset: TabularDataset,
        settings: &DiseaseTrainingConfig,
    ) -> Result<TrainingSummary> {
        let start = Instant::now();
        let (bundle, summary) = self.fit(disease, dataset, settings)?;
        self.store.save(disease, &bundle)?;
        info!(
            "Saved {disease} artifacts (test accuracy {:.2}%) in {:?}",
            summary.test.accuracy * 100.0,
            start.elapsed()
        );
        Ok(summary)
    }

    /// Fit artifacts without persisting them
    pub fn fit(
        &self,
        disease: Disease,
        dataset: TabularDataset,
        settings: &DiseaseTrainingConfig,
    ) -> Result<(ArtifactBundle, TrainingSummary)> {
        let encoded = encode::encode_dataset(dataset, &settings.target, &settings.target_rule)?;
        let positives = encoded.labels.iter().filter(|l| **l).count();
        if positives == 0 || positives == encoded.labels.len() {
            return Err(RiskError::training(
                disease,
                format!("target {} has a single class", settings.target),
            ));
        }

        let missing_schema_features = schema_coverage(disease, &encoded.feature_names);

        let indices = stratified_split(
            &encoded.labels,
            self.config.test_fraction,
            self.config.validation_fraction,
            self.config.seed,
        );
        let train = Split::select(&encoded.features, &encoded.labels, &indices.train);
        let validation = Split::select(&encoded.features, &encoded.labels, &indices.validation);
        let test = Split::select(&encoded.features, &encoded.labels, &indices.test);
        info!(
            "{disease}: {} features, {} train / {} validation / {} test rows",
            encoded.feature_names.len(),
            train.len(),
            validation.len(),
            test.len()
        );

        let imputer = fit_median_imputer(&train.features);
        let scaler = fit_standard_scaler(&impute_matrix(&train.features, &imputer));
        let x_train = transform_matrix(&train.features, &imputer, &scaler);

        let model = self.fit_logistic(disease, x_train, &train.labels)?;

        let evaluate = |split: &Split| {
            let x = transform_matrix(&split.features, &imputer, &scaler);
            let predicted: Vec<bool> = x
                .rows()
                .into_iter()
                .map(|row| model.predict_proba(&row.to_vec()) >= 0.5)
                .collect();
            ClassificationReport::new(&split.labels, &predicted)
        };
        let validation_report = evaluate(&validation);
        let test_report = evaluate(&test);
        info!("{disease} validation report:\n{validation_report}");
        info!("{disease} test report:\n{test_report}");

        let accuracy = if test.is_empty() {
            warn!("{disease}: test split is empty, no accuracy recorded");
            None
        } else {
            Some(AccuracyRecord {
                accuracy: test_report.accuracy,
                test_samples: test.len(),
                trained_at: Utc::now(),
            })
        };

        let bundle = ArtifactBundle {
            model: ModelArtifact::Logistic(model),
            preprocessing: PreprocessingArtifact {
                features: encoded.feature_names.clone(),
                imputer,
                scaler,
            },
            accuracy,
        };
        let summary = TrainingSummary {
            disease,
            features: encoded.feature_names,
            train_samples: train.len(),
            validation: validation_report,
            test: test_report,
            missing_schema_features,
        };
        Ok((bundle, summary))
    }

    /// Fit a logistic regression whose probability is that of the `true` class
    fn fit_logistic(
        &self,
        disease: Disease,
        x: ndarray::Array2<f64>,
        labels: &[bool],
    ) -> Result<LogisticModel> {
        let targets = Array1::from(labels.to_vec());
        let data = Dataset::new(x, targets);
        let fitted = LogisticRegression::default()
            .alpha(self.config.alpha)
            .max_iterations(self.config.max_iterations)
            .fit(&data)
            .map_err(|e| RiskError::training(disease, e.to_string()))?;

        let model = LogisticModel {
            intercept: fitted.intercept(),
            weights: fitted.params().to_vec(),
        };

        // The fitted parameters describe whichever class linfa treats as
        // positive. Compare against its hard predictions to orient them.
        let predicted = fitted.predict(data.records());
        let agreeing = data
            .records()
            .rows()
            .into_iter()
            .zip(predicted.iter())
            .filter(|(row, label)| (model.predict_proba(&row.to_vec()) >= 0.5) == **label)
            .count();
        if agreeing * 2 >= labels.len() {
            Ok(model)
        } else {
            Ok(model.flipped())
        }
    }
}

/// Warn about questionnaire features the dataset cannot supply
fn schema_coverage(disease: Disease, features: &[String]) -> Vec<String> {
    let missing: Vec<String> = FeatureSchema::for_disease(disease)
        .feature_names()
        .iter()
        .filter(|name| !features.iter().any(|f| f == *name))
        .map(|name| (*name).to_string())
        .collect();
    if !missing.is_empty() {
        warn!(
            "{disease}: dataset lacks {} questionnaire features, \
             they will be defaulted at inference: {}",
            missing.len(),
            missing.join(", ")
        );
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetRule;
    use crate::store::MemoryArtifactStore;
    use crate::training::dataset::Column;

    fn separable() -> TabularDataset {
        let mut glucose = Vec::new();
        let mut outcome = Vec::new();
        for i in 0..60 {
            let positive = i % 2 == 0;
            let value = if positive { 160 + i } else { 80 + i / 2 };
            glucose.push(Some(value.to_string()));
            outcome.push(Some(u8::from(positive).to_string()));
        }
        TabularDataset::new(vec![
            Column::new("glucose", glucose),
            Column::new("Outcome", outcome),
        ])
        .unwrap()
    }

    fn settings() -> DiseaseTrainingConfig {
        DiseaseTrainingConfig {
            dataset: "unused.csv".into(),
            target: "Outcome".into(),
            target_rule: TargetRule::Binary,
        }
    }

    #[test]
    fn test_fit_orients_towards_positive_class() {
        let trainer = Trainer::new(TrainingConfig::default(), Arc::new(MemoryArtifactStore::new()));
        let (bundle, summary) = trainer.fit(Disease::Diabetes, separable(), &settings()).unwrap();

        assert_eq!(bundle.preprocessing.features, vec!["glucose"]);
        assert!(summary.test.accuracy > 0.9);
        assert!(summary.missing_schema_features.contains(&"bmi".to_string()));

        let scale = |v: f64| bundle.preprocessing.transform(&[Some(v)]);
        let proba = |v: f64| bundle.model.predict_proba(&scale(v));
        assert!(proba(200.0) > proba(80.0));
    }

    #[test]
    fn test_single_class_is_rejected() {
        let trainer = Trainer::new(TrainingConfig::default(), Arc::new(MemoryArtifactStore::new()));
        let dataset = TabularDataset::new(vec![
            Column::new("glucose", vec![Some("1".into()), Some("2".into())]),
            Column::new("Outcome", vec![Some("1".into()), Some("1".into())]),
        ])
        .unwrap();
        assert!(matches!(
            trainer.fit(Disease::Diabetes, dataset, &settings()),
            Err(RiskError::Training { .. })
        ));
    }

    #[test]
    fn test_missing_dataset_fails_only_that_disease() {
        let mut config = TrainingConfig::default();
        for settings in config.diseases.values_mut() {
            settings.dataset = "does/not/exist.csv".into();
        }
        let trainer = Trainer::new(config, Arc::new(MemoryArtifactStore::new()));
        let run = trainer.train_all(&[Disease::Heart, Disease::Liver]).unwrap();
        assert!(run.succeeded.is_empty());
        assert_eq!(run.failed.len(), 2);
        assert!(!run.is_success());
    }
}
