//! Chronic disease risk assessment: questionnaire schemas, trained logistic
//! classifiers, artifact storage, advice generation and a small HTTP service.

pub mod advice;
pub mod config;
pub mod disease;
pub mod error;
pub mod inference;
pub mod input;
pub mod model;
pub mod preprocess;
pub mod schema;
pub mod shell;
pub mod store;
pub mod training;
pub mod utils;

// Core types
pub use config::AppConfig;
pub use disease::Disease;
pub use error::{Result, RiskError};
pub use input::RawInput;

// Inference and advice
pub use advice::{ConfidenceLevel, RiskLevel, advice_for, generate_advice};
pub use inference::{InferenceEngine, RiskResult};
pub use schema::FeatureSchema;

// Storage
pub use store::{
    ArtifactBundle, ArtifactId, ArtifactKind, ArtifactStore, FsArtifactStore, MemoryArtifactStore,
};

// Training
pub use training::{Trainer, TrainingRun, TrainingSummary};
