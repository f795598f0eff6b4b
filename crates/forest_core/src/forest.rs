//! Random-forest classifier over standardized features
//!
//! The positive-class probability is the mean of the per-tree leaf
//! fractions. The risk label is derived from that probability with a single
//! documented threshold, so label and probability never disagree.

use crate::errors::{ModelError, Result};
use crate::serde_canon::{hash_canonical_hex, to_canonical_json};
use crate::tree::Tree;
use serde::{Deserialize, Serialize};

/// `label == 1` iff `probability > DECISION_THRESHOLD`; an exact tie is 0
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Model format version
pub const FOREST_VERSION: i32 = 1;

/// Binary decision plus positive-class probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// 1 when the condition is predicted present
    pub label: u8,
    /// Estimated probability of the positive class
    pub probability: f64,
}

impl Prediction {
    pub fn from_probability(probability: f64) -> Self {
        let probability = probability.clamp(0.0, 1.0);
        Self {
            label: u8::from(probability > DECISION_THRESHOLD),
            probability,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.label == 1
    }
}

/// Trained ensemble of classification trees
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForestModel {
    /// Model format version
    pub version: i32,

    /// Dimensionality of the scaled feature vectors the trees split on
    pub feature_count: usize,

    /// Trees in the ensemble, all weighted equally
    pub trees: Vec<Tree>,
}

impl ForestModel {
    pub fn new(trees: Vec<Tree>, feature_count: usize) -> Result<Self> {
        let model = Self {
            version: FOREST_VERSION,
            feature_count,
            trees,
        };
        model.validate()?;
        Ok(model)
    }

    /// Validate model structure
    pub fn validate(&self) -> Result<()> {
        if self.version != FOREST_VERSION {
            return Err(ModelError::ValidationFailed(format!(
                "Unsupported model version: {}",
                self.version
            )));
        }
        if self.trees.is_empty() {
            return Err(ModelError::ValidationFailed(
                "Model must have at least one tree".to_string(),
            ));
        }
        if self.feature_count == 0 {
            return Err(ModelError::ValidationFailed(
                "Model must have at least one feature".to_string(),
            ));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.feature_count).map_err(|e| {
                ModelError::ValidationFailed(format!("Tree {} validation failed: {}", i, e))
            })?;
        }
        Ok(())
    }

    pub fn check_features(&self, features: &[f64]) -> Result<()> {
        if features.len() != self.feature_count {
            return Err(ModelError::SchemaMismatch {
                expected: self.feature_count,
                found: features.len(),
            });
        }
        Ok(())
    }

    /// Positive-class probability for a scaled feature vector
    pub fn predict_proba(&self, features: &[f64]) -> Result<f64> {
        self.check_features(features)?;
        let sum: f64 = self.trees.iter().map(|t| t.evaluate(features)).sum();
        Ok(sum / self.trees.len() as f64)
    }

    /// Label and probability for a scaled feature vector
    pub fn predict(&self, features: &[f64]) -> Result<Prediction> {
        Ok(Prediction::from_probability(self.predict_proba(features)?))
    }

    pub fn predict_labels(&self, rows: &[Vec<f64>]) -> Result<Vec<u8>> {
        rows.iter()
            .map(|row| self.predict(row).map(|p| p.label))
            .collect()
    }

    /// Mean model output over the training distribution
    pub fn expected_value(&self) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        self.trees.iter().map(Tree::expected_value).sum::<f64>() / self.trees.len() as f64
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn max_depth(&self) -> usize {
        self.trees.iter().map(Tree::depth).max().unwrap_or(0)
    }

    /// Serialize model to canonical JSON (sorted keys, no whitespace)
    pub fn to_canonical_json(&self) -> Result<String> {
        Ok(to_canonical_json(self)?)
    }

    /// Blake3 fingerprint of the canonical JSON form
    pub fn hash_hex(&self) -> Result<String> {
        Ok(hash_canonical_hex(self)?)
    }
}
