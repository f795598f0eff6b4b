//! Offline classification metrics
//!
//! Per-class precision, recall, F1 and support plus accuracy, macro and
//! weighted averages. Used for reporting after training only.

use crate::errors::{ModelError, Result};
use crate::forest::ForestModel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Precision/recall/F1 for one class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Indexed by class label (0, 1)
    pub classes: [ClassMetrics; 2],
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

/// Zero when the denominator is zero
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl ClassificationReport {
    /// Build a report from true and predicted labels
    pub fn from_labels(truth: &[u8], predicted: &[u8]) -> Result<Self> {
        if truth.len() != predicted.len() {
            return Err(ModelError::InvalidParameters(format!(
                "{} true labels but {} predictions",
                truth.len(),
                predicted.len()
            )));
        }
        if truth.is_empty() {
            return Err(ModelError::InvalidParameters(
                "cannot evaluate on an empty set".to_string(),
            ));
        }

        // confusion[actual][predicted]
        let mut confusion = [[0usize; 2]; 2];
        for (&t, &p) in truth.iter().zip(predicted) {
            if t > 1 || p > 1 {
                return Err(ModelError::InvalidParameters(format!(
                    "labels must be 0 or 1, got ({t}, {p})"
                )));
            }
            confusion[t as usize][p as usize] += 1;
        }

        let class = |c: usize| {
            let tp = confusion[c][c];
            let predicted_c = confusion[0][c] + confusion[1][c];
            let support = confusion[c][0] + confusion[c][1];
            let precision = ratio(tp, predicted_c);
            let recall = ratio(tp, support);
            let f1 = if precision + recall == 0.0 {
                0.0
            } else {
                2.0 * precision * recall / (precision + recall)
            };
            ClassMetrics {
                precision,
                recall,
                f1,
                support,
            }
        };
        let classes = [class(0), class(1)];

        let total = truth.len();
        let accuracy = ratio(confusion[0][0] + confusion[1][1], total);

        let macro_avg = ClassMetrics {
            precision: (classes[0].precision + classes[1].precision) / 2.0,
            recall: (classes[0].recall + classes[1].recall) / 2.0,
            f1: (classes[0].f1 + classes[1].f1) / 2.0,
            support: total,
        };
        let weighted = |pick: &dyn Fn(&ClassMetrics) -> f64| {
            classes
                .iter()
                .map(|m| pick(m) * m.support as f64)
                .sum::<f64>()
                / total as f64
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(&|m: &ClassMetrics| m.precision),
            recall: weighted(&|m: &ClassMetrics| m.recall),
            f1: weighted(&|m: &ClassMetrics| m.f1),
            support: total,
        };

        Ok(Self {
            classes,
            accuracy,
            macro_avg,
            weighted_avg,
        })
    }
}

/// Score a forest on scaled rows
pub fn evaluate(
    model: &ForestModel,
    rows: &[Vec<f64>],
    labels: &[u8],
) -> Result<ClassificationReport> {
    let predicted = model.predict_labels(rows)?;
    ClassificationReport::from_labels(labels, &predicted)
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>14} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (label, m) in self.classes.iter().enumerate() {
            writeln!(
                f,
                "{:>14} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                label, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        for (name, m) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>14} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, m.precision, m.recall, m.f1, m.support
            )?;
        }
        Ok(())
    }
}
