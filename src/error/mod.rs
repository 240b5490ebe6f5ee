//! Error handling for risk assessment, artifact storage and training.

use std::io;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

use crate::disease::Disease;
use crate::store::{ArtifactId, ArtifactKind};

/// Errors raised anywhere in the crate
#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    /// Disease identifier outside the supported set
    #[error("Unknown disease: {0}")]
    InvalidDisease(String),

    /// A required persisted artifact does not exist
    #[error("No {kind} artifact stored for {disease}")]
    ArtifactNotFound {
        disease: Disease,
        kind: ArtifactKind,
    },

    /// A persisted artifact was found but failed validation
    #[error("Artifact {id} is corrupt: {reason}")]
    ArtifactCorrupt { id: ArtifactId, reason: String },

    /// A value that should be numeric could not be parsed
    #[error("Invalid value for {feature}: {value:?} is not a number")]
    MalformedInput { feature: String, value: String },

    /// Dataset could not be interpreted
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Training failed for a disease
    #[error("Training failed for {disease}: {reason}")]
    Training { disease: Disease, reason: String },

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),
}

impl RiskError {
    /// Create a corrupt-artifact error
    pub fn corrupt(id: ArtifactId, reason: impl Into<String>) -> Self {
        Self::ArtifactCorrupt {
            id,
            reason: reason.into(),
        }
    }

    /// Create a training error for a disease
    pub fn training(disease: Disease, reason: impl Into<String>) -> Self {
        Self::Training {
            disease,
            reason: reason.into(),
        }
    }

    /// Create a dataset error
    pub fn dataset(reason: impl Into<String>) -> Self {
        Self::Dataset(reason.into())
    }

    /// Whether the error was caused by the caller's request rather than the service
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidDisease(_) | Self::MalformedInput { .. })
    }
}

/// Result type for crate operations
pub type Result<T> = std::result::Result<T, RiskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_subject() {
        let err = RiskError::ArtifactNotFound {
            disease: Disease::Liver,
            kind: ArtifactKind::Model,
        };
        assert_eq!(err.to_string(), "No model artifact stored for liver");

        let err = RiskError::MalformedInput {
            feature: "bmi".to_string(),
            value: "tall".to_string(),
        };
        assert!(err.to_string().contains("bmi"));
        assert!(err.is_client_error());
    }
}
