//! Supported disease identifiers
//!
//! Every schema, artifact and advice table is keyed by a [`Disease`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RiskError;

/// Diseases with a trained classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disease {
    /// Type 2 diabetes
    Diabetes,
    /// Heart disease
    Heart,
    /// Chronic kidney disease
    Kidney,
    /// Liver disease
    Liver,
    /// Asthma
    Asthma,
}

impl Disease {
    /// All supported diseases in display order
    pub const ALL: [Self; 5] = [
        Self::Diabetes,
        Self::Heart,
        Self::Kidney,
        Self::Liver,
        Self::Asthma,
    ];

    /// Lowercase identifier used in file names, URLs and JSON
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Diabetes => "diabetes",
            Self::Heart => "heart",
            Self::Kidney => "kidney",
            Self::Liver => "liver",
            Self::Asthma => "asthma",
        }
    }

    /// Human readable name
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Diabetes => "Diabetes",
            Self::Heart => "Heart Disease",
            Self::Kidney => "Chronic Kidney Disease",
            Self::Liver => "Liver Disease",
            Self::Asthma => "Asthma",
        }
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Disease {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == needle)
            .ok_or_else(|| RiskError::InvalidDisease(s.trim().to_string()))
    }
}
