//! Error types for the assistant

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use wellness_forest_core::ModelError;
use wellness_forest_trainer::TrainerError;

use crate::condition::Condition;

/// A caller-side failure scoped to one condition's pipeline
#[derive(Debug, Error)]
#[error("{condition} assessment failed: {source}")]
pub struct ConditionError {
    pub condition: Condition,
    #[source]
    pub source: ModelError,
}

/// One or more conditions could not be assessed
#[derive(Debug, Error)]
pub struct AssessmentError {
    pub failures: Vec<ConditionError>,
}

impl AssessmentError {
    pub fn failed_conditions(&self) -> Vec<Condition> {
        self.failures.iter().map(|f| f.condition).collect()
    }
}

impl fmt::Display for AssessmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "assessment failed for ")?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} ({})", failure.condition.key(), failure.source)?;
        }
        Ok(())
    }
}

/// A condition model could not be built at startup
#[derive(Debug, Error)]
#[error("failed to build {condition} model: {source}")]
pub struct StartupError {
    pub condition: Condition,
    #[source]
    pub source: TrainerError,
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid environment override {key}={value}")]
    Env { key: String, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
