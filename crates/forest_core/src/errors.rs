//! Error types for the forest core

use thiserror::Error;

/// Errors raised while scaling, scoring or explaining a sample
#[derive(Error, Debug)]
pub enum ModelError {
    /// Input vector does not match the fitted feature schema
    #[error("schema mismatch: expected {expected} features, got {found}")]
    SchemaMismatch { expected: usize, found: usize },

    /// Input record lacks a feature the model was trained on
    #[error("missing feature `{0}`")]
    MissingFeature(String),

    /// Feature has zero variance and the scaler was told to reject it
    #[error("feature `{0}` has zero variance")]
    DegenerateFeature(String),

    /// Invalid model or scaler parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Model validation failed
    #[error("model validation failed: {0}")]
    ValidationFailed(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Canonical serialization error
    #[error("canonical serialization error: {0}")]
    Canonical(#[from] crate::serde_canon::CanonicalError),
}

/// Result type for forest core operations
pub type Result<T> = std::result::Result<T, ModelError>;
