//! Advice and confidence banding
//!
//! Maps a risk percentage to a risk level and a fixed list of advice lines,
//! and a model accuracy to a confidence label. The band thresholds are fixed.

use std::fmt;

use serde::Serialize;

use crate::disease::Disease;

/// Last line of every advice list
pub const CLOSING_DISCLAIMER: &str = "Consult a healthcare professional for proper diagnosis.";

/// Band of a risk percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// `< 30` is low, `< 60` is moderate, anything else is high
    #[must_use]
    pub fn from_percentage(risk: f64) -> Self {
        if risk < 30.0 {
            Self::Low
        } else if risk < 60.0 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence label derived from the model's test accuracy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfidenceLevel {
    High,
    Moderate,
    Low,
    Unknown,
}

impl ConfidenceLevel {
    /// `>= 80` is high, `>= 65` is moderate, lower is low, absent is unknown
    #[must_use]
    pub fn from_accuracy(accuracy: Option<f64>) -> Self {
        match accuracy {
            Some(a) if a >= 80.0 => Self::High,
            Some(a) if a >= 65.0 => Self::Moderate,
            Some(_) => Self::Low,
            None => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Moderate => "Moderate",
            Self::Low => "Low",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Disease-specific advice lines
#[must_use]
pub const fn disease_advice(disease: Disease) -> &'static [&'static str; 4] {
    match disease {
        Disease::Diabetes => &[
            "Maintain a balanced diet with limited sugar intake",
            "Engage in regular physical activity",
            "Monitor blood glucose levels regularly",
            "Avoid excessive processed foods",
        ],
        Disease::Heart => &[
            "Avoid smoking and excessive alcohol consumption",
            "Reduce salt and saturated fat intake",
            "Exercise at least 30 minutes daily",
            "Monitor blood pressure and cholesterol levels",
        ],
        Disease::Kidney => &[
            "Stay well hydrated",
            "Limit salt and protein intake",
            "Monitor blood pressure regularly",
            "Avoid unnecessary painkillers",
        ],
        Disease::Liver => &[
            "Avoid alcohol consumption",
            "Maintain a healthy weight",
            "Eat a liver-friendly diet",
            "Get liver function tests periodically",
        ],
        Disease::Asthma => &[
            "Avoid known allergens and triggers",
            "Use prescribed inhalers properly",
            "Monitor breathing symptoms",
            "Exercise cautiously in clean environments",
        ],
    }
}

fn level_line(risk: f64) -> String {
    format!("Risk Level: {}", RiskLevel::from_percentage(risk))
}

/// Advice for a known disease: level line, four advice lines, closing disclaimer
#[must_use]
pub fn advice_for(disease: Disease, risk: f64) -> Vec<String> {
    std::iter::once(level_line(risk))
        .chain(disease_advice(disease).iter().map(|s| (*s).to_string()))
        .chain(std::iter::once(CLOSING_DISCLAIMER.to_string()))
        .collect()
}

/// Advice for a disease identifier
///
/// An unrecognized identifier yields only the level line and the disclaimer.
#[must_use]
pub fn generate_advice(disease: &str, risk: f64) -> Vec<String> {
    match disease.parse::<Disease>() {
        Ok(d) => advice_for(d, risk),
        Err(_) => vec![level_line(risk), CLOSING_DISCLAIMER.to_string()],
    }
}
