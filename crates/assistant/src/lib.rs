//! Multi-condition wellness risk assistant
//!
//! Trains one random forest per condition (diabetes, heart disease,
//! hypertension) and combines their predictions with rule-based advice
//! and per-feature attributions.
//!
//! Modules:
//! - `condition`: Per-condition pipeline from dataset to explainer
//! - `assistant`: Orchestrates the three condition models
//! - `recommendations`: Fixed advisory rules
//! - `records`: Typed input records and collaborator ranges
//! - `config`: TOML plus environment configuration
//! - `errors`: Condition-scoped and startup errors

pub mod assistant;
pub mod condition;
pub mod config;
pub mod errors;
pub mod recommendations;
pub mod records;

pub use assistant::{Assessment, ConditionAssessment, ConditionOutcomes, WellnessAssistant};
pub use condition::{Condition, ConditionModel, Explanation, ModelSettings};
pub use config::{DatasetConfig, DatasetSource, WellnessConfig};
pub use errors::{AssessmentError, ConditionError, ConfigError, StartupError};
pub use recommendations::{
    diabetes_recommendations, heart_recommendations, hypertension_recommendations,
    recommendations_for,
};
pub use records::{validate_ranges, DiabetesInput, FieldRange, HeartInput, HypertensionInput};

pub use wellness_forest_core::{FeatureMap, Prediction};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
