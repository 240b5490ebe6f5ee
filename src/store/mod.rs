//! Artifact storage
//!
//! Artifacts are addressed by an explicit [`ArtifactId`] (disease + kind) and
//! stored as JSON blobs. Any [`BlobStore`] is an [`ArtifactStore`]; the blanket
//! implementation owns decoding and load-time validation so every storage
//! backend rejects the same malformed artifacts.

mod fs;
mod memory;

pub use fs::FsArtifactStore;
pub use memory::MemoryArtifactStore;

use std::fmt;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::disease::Disease;
use crate::error::{Result, RiskError};
use crate::model::ModelArtifact;
use crate::preprocess::PreprocessingArtifact;

/// The kinds of artifact persisted per disease
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Model,
    Preprocessing,
    Accuracy,
}

impl ArtifactKind {
    pub const ALL: [Self; 3] = [Self::Model, Self::Preprocessing, Self::Accuracy];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Preprocessing => "preprocessing",
            Self::Accuracy => "accuracy",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of one persisted artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId {
    pub disease: Disease,
    pub kind: ArtifactKind,
}

impl ArtifactId {
    #[must_use]
    pub const fn new(disease: Disease, kind: ArtifactKind) -> Self {
        Self { disease, kind }
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.disease, self.kind)
    }
}

/// Held-out test accuracy measured at training time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyRecord {
    /// Fraction of correctly classified test samples, in [0, 1]
    pub accuracy: f64,
    pub test_samples: usize,
    pub trained_at: DateTime<Utc>,
}

/// Everything inference needs for one disease
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactBundle {
    pub model: ModelArtifact,
    pub preprocessing: PreprocessingArtifact,
    pub accuracy: Option<AccuracyRecord>,
}

/// Raw blob persistence keyed by artifact id
pub trait BlobStore: Send + Sync {
    /// Read a blob, `Ok(None)` if it does not exist
    fn read(&self, id: ArtifactId) -> Result<Option<Vec<u8>>>;

    /// Write a blob, replacing any previous content
    fn write(&self, id: ArtifactId, bytes: &[u8]) -> Result<()>;
}

/// Typed access to the artifacts of a disease
pub trait ArtifactStore: Send + Sync {
    /// Load and validate the artifacts for a disease
    fn load(&self, disease: Disease) -> Result<ArtifactBundle>;

    /// Persist the artifacts for a disease
    fn save(&self, disease: Disease, bundle: &ArtifactBundle) -> Result<()>;
}

impl<B: BlobStore> ArtifactStore for B {
    fn load(&self, disease: Disease) -> Result<ArtifactBundle> {
        let preprocessing: PreprocessingArtifact =
            read_required(self, ArtifactId::new(disease, ArtifactKind::Preprocessing))?;
        let model: ModelArtifact =
            read_required(self, ArtifactId::new(disease, ArtifactKind::Model))?;

        preprocessing.validate(ArtifactId::new(disease, ArtifactKind::Preprocessing))?;
        model.validate(
            ArtifactId::new(disease, ArtifactKind::Model),
            preprocessing.num_features(),
        )?;

        let accuracy_id = ArtifactId::new(disease, ArtifactKind::Accuracy);
        let accuracy: Option<AccuracyRecord> = read_optional(self, accuracy_id)?;
        match &accuracy {
            Some(record) if !(0.0..=1.0).contains(&record.accuracy) => {
                return Err(RiskError::corrupt(
                    accuracy_id,
                    format!("accuracy {} outside [0, 1]", record.accuracy),
                ));
            }
            Some(_) => {}
            None => {
                info!("No accuracy record for {disease}; confidence will be reported as unknown")
            }
        }

        debug!(
            "Loaded artifacts for {disease} ({} features)",
            preprocessing.num_features()
        );
        Ok(ArtifactBundle {
            model,
            preprocessing,
            accuracy,
        })
    }

    fn save(&self, disease: Disease, bundle: &ArtifactBundle) -> Result<()> {
        write_json(self, ArtifactId::new(disease, ArtifactKind::Model), &bundle.model)?;
        write_json(
            self,
            ArtifactId::new(disease, ArtifactKind::Preprocessing),
            &bundle.preprocessing,
        )?;
        if let Some(accuracy) = &bundle.accuracy {
            write_json(self, ArtifactId::new(disease, ArtifactKind::Accuracy), accuracy)?;
        }
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(id: ArtifactId, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| RiskError::corrupt(id, e.to_string()))
}

fn read_optional<T: DeserializeOwned>(store: &impl BlobStore, id: ArtifactId) -> Result<Option<T>> {
    store.read(id)?.map(|bytes| decode(id, &bytes)).transpose()
}

fn read_required<T: DeserializeOwned>(store: &impl BlobStore, id: ArtifactId) -> Result<T> {
    read_optional(store, id)?.ok_or(RiskError::ArtifactNotFound {
        disease: id.disease,
        kind: id.kind,
    })
}

fn write_json<T: Serialize>(store: &impl BlobStore, id: ArtifactId, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    store.write(id, &bytes)
}
