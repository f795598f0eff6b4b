//! Per-feature standardization (zero mean, unit variance)
//!
//! Parameters are fitted once on the training split and then applied
//! unchanged to evaluation rows and every inference sample.

use crate::errors::{ModelError, Result};
use crate::schema::FeatureSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// What to do with a feature whose training values are all identical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroVariancePolicy {
    /// Use a standard deviation of 1, so the column scales to `x - mean`
    #[default]
    UnitScale,
    /// Fail with [`ModelError::DegenerateFeature`]
    Reject,
}

/// Fitted per-feature mean and standard deviation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingParameters {
    pub means: Vec<f64>,
    pub stds: Vec<f64>,
}

pub struct StandardScaler;

impl StandardScaler {
    /// Fit population mean and standard deviation for every column
    pub fn fit(
        schema: &FeatureSchema,
        rows: &[Vec<f64>],
        policy: ZeroVariancePolicy,
    ) -> Result<ScalingParameters> {
        if rows.is_empty() {
            return Err(ModelError::InvalidParameters(
                "cannot fit scaler on an empty matrix".to_string(),
            ));
        }

        let width = schema.len();
        for row in rows {
            schema.check_len(row.len())?;
        }

        let n = rows.len() as f64;
        let mut means = vec![0.0; width];
        for row in rows {
            for (mean, value) in means.iter_mut().zip(row) {
                *mean += value;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        let mut stds = vec![0.0; width];
        for row in rows {
            for ((var, value), mean) in stds.iter_mut().zip(row).zip(&means) {
                let d = value - mean;
                *var += d * d;
            }
        }

        for (i, std) in stds.iter_mut().enumerate() {
            *std = (*std / n).sqrt();
            // Rounding leaves a tiny non-zero std on constant columns, so test the values.
            let first = rows[0][i];
            let constant = rows.iter().all(|row| row[i] == first);
            if constant || !std.is_finite() {
                let name = &schema.names()[i];
                match policy {
                    ZeroVariancePolicy::Reject => {
                        return Err(ModelError::DegenerateFeature(name.clone()))
                    }
                    ZeroVariancePolicy::UnitScale => {
                        warn!(feature = %name, "zero variance feature, using unit scale");
                        *std = 1.0;
                        if constant {
                            means[i] = first;
                        }
                    }
                }
            }
        }

        Ok(ScalingParameters { means, stds })
    }
}

impl ScalingParameters {
    pub fn feature_count(&self) -> usize {
        self.means.len()
    }

    /// Apply `(x - mean) / std` elementwise
    pub fn transform(&self, vector: &[f64]) -> Result<Vec<f64>> {
        if vector.len() != self.means.len() {
            return Err(ModelError::SchemaMismatch {
                expected: self.means.len(),
                found: vector.len(),
            });
        }
        Ok(vector
            .iter()
            .zip(self.means.iter().zip(&self.stds))
            .map(|(x, (mean, std))| (x - mean) / std)
            .collect())
    }

    pub fn transform_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|row| self.transform(row)).collect()
    }
}
