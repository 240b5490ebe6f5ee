//! User-facing surfaces: interactive console and HTTP service

pub mod console;
pub mod http;

use serde::Serialize;

use crate::advice::{ConfidenceLevel, advice_for};
use crate::disease::Disease;
use crate::inference::RiskResult;

/// Risk score with its confidence label and advice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub disease: Disease,
    /// Risk percentage, two decimals
    pub risk: f64,
    /// Test accuracy percentage, absent if never recorded
    pub accuracy: Option<f64>,
    pub confidence: ConfidenceLevel,
    pub advice: Vec<String>,
}

impl Assessment {
    #[must_use]
    pub fn new(disease: Disease, result: RiskResult) -> Self {
        Self {
            disease,
            risk: result.risk,
            accuracy: result.accuracy,
            confidence: ConfidenceLevel::from_accuracy(result.accuracy),
            advice: advice_for(disease, result.risk),
        }
    }
}
