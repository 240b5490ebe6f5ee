//! Configuration for training, artifact storage and the HTTP server.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `CHRONIC_RISK__<SECTION>__<KEY>` environment variables.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File as ConfigFile, FileFormat};
use log::info;
use serde::{Deserialize, Serialize};

use crate::disease::Disease;
use crate::error::{Result, RiskError};

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "chronic-risk.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "CHRONIC_RISK";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the persisted artifacts
    pub artifact_dir: PathBuf,
    pub server: ServerConfig,
    pub training: TrainingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on, e.g. `127.0.0.1:8000`
    pub bind: String,
}

/// How the target column is turned into a positive/negative label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "value", rename_all = "snake_case")]
pub enum TargetRule {
    /// Values are already 0/1
    Binary,
    /// Any value above zero is positive
    NonZero,
    /// Cells equal to the label are positive
    Equals(String),
}

/// Dataset settings for one disease
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseTrainingConfig {
    /// CSV or Parquet file
    pub dataset: PathBuf,
    /// Name of the label column
    pub target: String,
    pub target_rule: TargetRule,
}

/// Model fitting settings
///
/// Diseases missing from `diseases` keep their built-in dataset settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Seed for the train/validation/test shuffle
    pub seed: u64,
    /// Fraction of rows held out for the test split
    pub test_fraction: f64,
    /// Fraction of rows held out for the validation split
    pub validation_fraction: f64,
    /// Maximum optimizer iterations for logistic regression
    pub max_iterations: u64,
    /// L2 regularization strength
    pub alpha: f64,
    /// Worker threads for training diseases in parallel
    pub threads: usize,
    pub diseases: BTreeMap<Disease, DiseaseTrainingConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        let dataset = |disease: Disease, target: &str, target_rule: TargetRule| {
            (
                disease,
                DiseaseTrainingConfig {
                    dataset: PathBuf::from(format!("data/{disease}.csv")),
                    target: target.to_string(),
                    target_rule,
                },
            )
        };

        Self {
            seed: 42,
            test_fraction: 0.15,
            validation_fraction: 0.15,
            max_iterations: 300,
            alpha: 1.0,
            threads: num_cpus::get().min(Disease::ALL.len()),
            diseases: BTreeMap::from([
                dataset(Disease::Diabetes, "Outcome", TargetRule::Binary),
                dataset(Disease::Heart, "num", TargetRule::NonZero),
                dataset(Disease::Kidney, "classification", TargetRule::Equals("ckd".into())),
                dataset(Disease::Liver, "Dataset", TargetRule::Equals("1".into())),
                dataset(Disease::Asthma, "Diagnosis", TargetRule::Binary),
            ]),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("models"),
            server: ServerConfig::default(),
            training: TrainingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                info!("Loading config from {}", path.display());
                builder = builder.add_source(ConfigFile::from(path).format(FileFormat::Toml));
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                info!("Loading config from {DEFAULT_CONFIG_FILE}");
                builder = builder.add_source(
                    ConfigFile::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
                );
            }
            None => {}
        }

        let config: Self = builder
            .add_source(env.prefix_separator("__").separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.finish()
    }

    /// Parse configuration from a TOML string layered over the defaults
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(ConfigFile::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.finish()
    }

    fn finish(mut self) -> Result<Self> {
        for (disease, defaults) in TrainingConfig::default().diseases {
            self.training.diseases.entry(disease).or_insert(defaults);
        }
        self.validate()?;
        Ok(self)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        let t = &self.training;
        let in_unit = |v: f64| v > 0.0 && v < 1.0;
        if !in_unit(t.test_fraction) || !in_unit(t.validation_fraction) {
            return Err(invalid("training fractions must be between 0 and 1"));
        }
        if t.test_fraction + t.validation_fraction >= 1.0 {
            return Err(invalid("test and validation fractions leave no training rows"));
        }
        if t.max_iterations == 0 {
            return Err(invalid("max_iterations must be positive"));
        }
        if !(t.alpha.is_finite() && t.alpha >= 0.0) {
            return Err(invalid("alpha must be a non-negative number"));
        }
        if t.threads == 0 {
            return Err(invalid("threads must be positive"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> RiskError {
    RiskError::Config(config::ConfigError::Message(msg.to_string()))
}
