//! Per-disease feature schema
//!
//! A schema lists the yes/no symptom questions and the numeric clinical tests
//! asked for a disease. Symptom features come first in [`FeatureSchema::feature_names`],
//! followed by clinical features, each in table order.

mod tables;

use std::sync::LazyLock;

use serde::Serialize;

use crate::disease::Disease;
use crate::error::Result;

/// A yes/no question, answered as 1 (yes) or 0 (no)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SymptomQuestion {
    pub prompt: &'static str,
    pub feature: &'static str,
}

/// A numeric clinical measurement that may be left out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClinicalTest {
    pub label: &'static str,
    pub feature: &'static str,
}

/// The questions and tests that make up the input record for one disease
#[derive(Debug, Serialize)]
pub struct FeatureSchema {
    pub disease: Disease,
    symptoms: &'static [SymptomQuestion],
    clinical_tests: &'static [ClinicalTest],
    #[serde(skip)]
    feature_names: Vec<&'static str>,
}

static SCHEMAS: LazyLock<[FeatureSchema; 5]> = LazyLock::new(|| {
    use tables::*;
    [
        FeatureSchema::new(Disease::Diabetes, DIABETES_SYMPTOMS, DIABETES_TESTS),
        FeatureSchema::new(Disease::Heart, HEART_SYMPTOMS, HEART_TESTS),
        FeatureSchema::new(Disease::Kidney, KIDNEY_SYMPTOMS, KIDNEY_TESTS),
        FeatureSchema::new(Disease::Liver, LIVER_SYMPTOMS, LIVER_TESTS),
        FeatureSchema::new(Disease::Asthma, ASTHMA_SYMPTOMS, ASTHMA_TESTS),
    ]
});

impl FeatureSchema {
    fn new(
        disease: Disease,
        symptoms: &'static [SymptomQuestion],
        clinical_tests: &'static [ClinicalTest],
    ) -> Self {
        let feature_names = symptoms
            .iter()
            .map(|q| q.feature)
            .chain(clinical_tests.iter().map(|t| t.feature))
            .collect();
        Self {
            disease,
            symptoms,
            clinical_tests,
            feature_names,
        }
    }

    /// Schema for a disease
    #[must_use]
    pub fn for_disease(disease: Disease) -> &'static Self {
        // SCHEMAS is laid out in declaration order of `Disease`
        &SCHEMAS[disease as usize]
    }

    /// Schema for a disease identifier, failing with `InvalidDisease` if unknown
    pub fn lookup(disease: &str) -> Result<&'static Self> {
        Ok(Self::for_disease(disease.parse()?))
    }

    /// Yes/no symptom questions in asking order
    #[must_use]
    pub fn symptoms(&self) -> &'static [SymptomQuestion] {
        self.symptoms
    }

    /// Numeric clinical tests in asking order
    #[must_use]
    pub fn clinical_tests(&self) -> &'static [ClinicalTest] {
        self.clinical_tests
    }

    /// Ordered feature names: symptoms, then clinical tests
    #[must_use]
    pub fn feature_names(&self) -> &[&'static str] {
        &self.feature_names
    }

    #[must_use]
    pub fn contains(&self, feature: &str) -> bool {
        self.feature_names.contains(&feature)
    }

    /// Whether the feature is a yes/no symptom
    #[must_use]
    pub fn is_symptom(&self, feature: &str) -> bool {
        self.symptoms.iter().any(|q| q.feature == feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RiskError;

    #[test]
    fn test_every_disease_has_questions() {
        for disease in Disease::ALL {
            let schema = FeatureSchema::for_disease(disease);
            assert_eq!(schema.disease, disease);
            assert!(!schema.symptoms().is_empty());
            assert!(!schema.clinical_tests().is_empty());
        }
    }

    #[test]
    fn test_feature_order_is_symptoms_then_tests() {
        let schema = FeatureSchema::for_disease(Disease::Diabetes);
        assert_eq!(
            schema.feature_names(),
            &[
                "polydipsia",
                "polyuria",
                "polyphagia",
                "weight_loss",
                "fatigue",
                "blurred_vision",
                "family_history",
                "age",
                "bmi",
                "glucose",
                "hba1c",
            ]
        );
        assert!(schema.is_symptom("fatigue"));
        assert!(!schema.is_symptom("bmi"));
        assert!(schema.contains("hba1c"));
    }

    #[test]
    fn test_feature_names_are_unique() {
        for disease in Disease::ALL {
            let names = FeatureSchema::for_disease(disease).feature_names();
            let mut sorted = names.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), names.len(), "duplicate feature in {disease}");
        }
    }

    #[test]
    fn test_lookup_unknown_disease() {
        assert!(matches!(
            FeatureSchema::lookup("flu"),
            Err(RiskError::InvalidDisease(_))
        ));
        assert_eq!(
            FeatureSchema::lookup("Heart").unwrap().disease,
            Disease::Heart
        );
    }
}
