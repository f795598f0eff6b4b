//! Feature schema and raw input records
//!
//! A [`FeatureSchema`] is the ordered list of feature names a model was
//! trained on. Raw records arrive as a [`FeatureMap`] keyed by name and are
//! re-keyed into schema order before scaling.

use crate::errors::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw (unscaled) input record keyed by feature name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureMap(BTreeMap<String, f64>);

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the record for chaining
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<f64> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Value for `name`, or `default` when the record does not carry it
    pub fn get_or(&self, name: &str, default: f64) -> f64 {
        self.get(name).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Ordered feature names fixed at training time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Build a schema; names must be non-empty and unique
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(ModelError::InvalidParameters(
                "feature schema has no columns".to_string(),
            ));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(ModelError::InvalidParameters(format!(
                    "duplicate feature `{name}`"
                )));
            }
        }
        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Re-key a raw record into schema order
    ///
    /// Missing features fail with [`ModelError::MissingFeature`]; keys the
    /// schema does not know are ignored.
    pub fn align(&self, record: &FeatureMap) -> Result<Vec<f64>> {
        self.names
            .iter()
            .map(|name| {
                record
                    .get(name)
                    .ok_or_else(|| ModelError::MissingFeature(name.clone()))
            })
            .collect()
    }

    /// Check that a dense vector has the schema's dimensionality
    pub fn check_len(&self, found: usize) -> Result<()> {
        if found != self.names.len() {
            return Err(ModelError::SchemaMismatch {
                expected: self.names.len(),
                found,
            });
        }
        Ok(())
    }
}
