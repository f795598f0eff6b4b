//! Configuration management for the wellness assistant
//!
//! Layering: built-in defaults, then an optional TOML file, then
//! `WELLNESS_*` environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use wellness_forest_core::ZeroVariancePolicy;
use wellness_forest_trainer::ForestParams;

use crate::condition::{Condition, ModelSettings};
use crate::errors::ConfigError;

pub const ENV_DATA_DIR: &str = "WELLNESS_DATA_DIR";
pub const ENV_TREES: &str = "WELLNESS_TREES";
pub const ENV_SEED: &str = "WELLNESS_SEED";
pub const ENV_LOG_LEVEL: &str = "WELLNESS_LOG_LEVEL";

/// Wellness assistant configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WellnessConfig {
    pub datasets: DatasetConfig,
    pub forest: ForestParams,
    pub evaluation: EvaluationConfig,
    pub scaler: ScalerConfig,
    pub logging: LoggingConfig,
}

/// One labelled CSV file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSource {
    /// Relative to `data_dir` unless absolute
    pub file: PathBuf,
    pub label_column: String,
}

impl DatasetSource {
    fn new(file: &str, condition: Condition) -> Self {
        Self {
            file: PathBuf::from(file),
            label_column: condition.default_label_column().to_string(),
        }
    }
}

/// Dataset locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub data_dir: PathBuf,
    pub diabetes: DatasetSource,
    pub heart: DatasetSource,
    pub hypertension: DatasetSource,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            diabetes: DatasetSource::new("diabetes.csv", Condition::Diabetes),
            heart: DatasetSource::new("heart.csv", Condition::Heart),
            hypertension: DatasetSource::new("hypertension.csv", Condition::Hypertension),
        }
    }
}

impl DatasetConfig {
    pub fn source(&self, condition: Condition) -> &DatasetSource {
        match condition {
            Condition::Diabetes => &self.diabetes,
            Condition::Heart => &self.heart,
            Condition::Hypertension => &self.hypertension,
        }
    }

    pub fn path_for(&self, condition: Condition) -> PathBuf {
        self.data_dir.join(&self.source(condition).file)
    }
}

/// Held-out evaluation split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub test_fraction: f64,
    pub split_seed: u64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            split_seed: 42,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalerConfig {
    pub zero_variance: ZeroVariancePolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl WellnessConfig {
    /// Defaults, then `path` if given, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keyed by the `WELLNESS_*` names
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_DATA_DIR) {
            self.datasets.data_dir = PathBuf::from(val);
        }
        if let Some(val) = lookup(ENV_TREES) {
            self.forest.tree_count = parse_env(ENV_TREES, val)?;
        }
        if let Some(val) = lookup(ENV_SEED) {
            self.forest.seed = parse_env(ENV_SEED, val)?;
        }
        if let Some(val) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = val;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.forest
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        let fraction = self.evaluation.test_fraction;
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "test_fraction must be in (0, 1), got {}",
                fraction
            )));
        }
        Ok(())
    }

    pub fn settings(&self) -> ModelSettings {
        ModelSettings {
            forest: self.forest.clone(),
            test_fraction: self.evaluation.test_fraction,
            split_seed: self.evaluation.split_seed,
            zero_variance: self.scaler.zero_variance,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env {
        key: key.to_string(),
        value,
    })
}
