//! CSV dataset loading and splitting
//!
//! Reads a headered CSV of numeric columns, separates the named label
//! column from the features and provides a seeded train/test split.

use std::io::Read;
use std::path::Path;

use crate::deterministic::LcgRng;
use crate::errors::TrainerError;

/// Labelled dataset with named numeric features
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    /// Header order with the label column removed
    pub feature_names: Vec<String>,
    pub label_column: String,
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<u8>,
}

/// Per-feature summary for logging
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl Dataset {
    /// Load dataset from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P, label_column: &str) -> Result<Self, TrainerError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|err| {
            TrainerError::DataLoad(format!("failed to open {}: {}", path.display(), err))
        })?;
        Self::from_reader(file, label_column).map_err(|err| match err {
            TrainerError::DataLoad(msg) => {
                TrainerError::DataLoad(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Load dataset from any CSV source
    pub fn from_reader<R: Read>(reader: R, label_column: &str) -> Result<Self, TrainerError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let label_idx = headers
            .iter()
            .position(|h| h == label_column)
            .ok_or_else(|| {
                TrainerError::DataLoad(format!("label column `{}` not found", label_column))
            })?;

        let feature_names: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != label_idx)
            .map(|(_, h)| h.to_string())
            .collect();
        if feature_names.is_empty() {
            return Err(TrainerError::DataLoad(
                "dataset has no feature columns".to_string(),
            ));
        }

        let mut features = Vec::new();
        let mut labels = Vec::new();

        for (row_idx, record) in reader.records().enumerate() {
            let record = record?;
            // Header is line 1.
            let line = row_idx + 2;

            let mut row = Vec::with_capacity(feature_names.len());
            let mut label = None;
            for (col, field) in record.iter().enumerate() {
                let value = field
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| {
                        TrainerError::DataLoad(format!(
                            "line {}, column `{}`: invalid number `{}`",
                            line, &headers[col], field
                        ))
                    })?;
                if col == label_idx {
                    label = Some(value);
                } else {
                    row.push(value);
                }
            }

            let label = match label {
                Some(v) if v == 0.0 => 0,
                Some(v) if v == 1.0 => 1,
                Some(v) => {
                    return Err(TrainerError::DataLoad(format!(
                        "line {}: label must be 0 or 1, got {}",
                        line, v
                    )))
                }
                None => {
                    return Err(TrainerError::DataLoad(format!("line {}: missing label", line)))
                }
            };

            features.push(row);
            labels.push(label);
        }

        if features.is_empty() {
            return Err(TrainerError::DataLoad("dataset is empty".to_string()));
        }

        Ok(Self {
            feature_names,
            label_column: label_column.to_string(),
            features,
            labels,
        })
    }

    /// Get number of samples
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Check if dataset is empty
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    /// Fraction of rows labelled 1
    pub fn positive_rate(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        self.labels.iter().filter(|&&l| l == 1).count() as f64 / self.labels.len() as f64
    }

    /// Shuffle with `seed`, then split off `ceil(test_fraction * n)` test rows
    ///
    /// Both parts always keep at least one row.
    pub fn train_test_split(
        &self,
        test_fraction: f64,
        seed: u64,
    ) -> Result<(Dataset, Dataset), TrainerError> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(TrainerError::Training(format!(
                "test fraction must be in (0, 1), got {}",
                test_fraction
            )));
        }
        let n = self.len();
        if n < 2 {
            return Err(TrainerError::Training(format!(
                "need at least 2 rows to split, got {}",
                n
            )));
        }

        let test_n = ((test_fraction * n as f64).ceil() as usize).clamp(1, n - 1);

        let mut indices: Vec<usize> = (0..n).collect();
        LcgRng::new(seed).shuffle(&mut indices);
        let (test_idx, train_idx) = indices.split_at(test_n);

        Ok((self.subset(train_idx), self.subset(test_idx)))
    }

    fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            feature_names: self.feature_names.clone(),
            label_column: self.label_column.clone(),
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Get feature statistics for logging
    pub fn feature_stats(&self) -> Vec<FeatureStats> {
        let n = self.len().max(1) as f64;
        (0..self.feature_count())
            .map(|col| {
                let mut stats = FeatureStats {
                    min: f64::INFINITY,
                    max: f64::NEG_INFINITY,
                    mean: 0.0,
                };
                for row in &self.features {
                    stats.min = stats.min.min(row[col]);
                    stats.max = stats.max.max(row[col]);
                    stats.mean += row[col];
                }
                stats.mean /= n;
                stats
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv() -> anyhow::Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "Glucose,BMI,Outcome,Age")?;
        writeln!(file, "148,33.6,1,50")?;
        writeln!(file, "85,26.6,0,31")?;
        writeln!(file, "183,23.3,1,32")?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_load_csv() -> anyhow::Result<()> {
        let file = create_test_csv()?;
        let dataset = Dataset::from_csv(file.path(), "Outcome")?;

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.feature_names, vec!["Glucose", "BMI", "Age"]);
        assert_eq!(dataset.features[0], vec![148.0, 33.6, 50.0]);
        assert_eq!(dataset.labels, vec![1, 0, 1]);
        assert!((dataset.positive_rate() - 2.0 / 3.0).abs() < 1e-12);

        Ok(())
    }

    #[test]
    fn test_missing_label_column() -> anyhow::Result<()> {
        let file = create_test_csv()?;
        let err = Dataset::from_csv(file.path(), "target").unwrap_err();
        assert!(matches!(err, TrainerError::DataLoad(ref msg) if msg.contains("target")));
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let err = Dataset::from_csv("/nonexistent/diabetes.csv", "Outcome").unwrap_err();
        assert!(matches!(err, TrainerError::DataLoad(_)));
    }

    #[test]
    fn test_malformed_rows() {
        let bad_number = "a,target\nx,1\n";
        assert!(matches!(
            Dataset::from_reader(bad_number.as_bytes(), "target"),
            Err(TrainerError::DataLoad(_))
        ));

        let bad_label = "a,target\n1.0,2\n";
        assert!(matches!(
            Dataset::from_reader(bad_label.as_bytes(), "target"),
            Err(TrainerError::DataLoad(ref msg)) if msg.contains("label")
        ));

        let ragged = "a,b,target\n1,2,0\n1,0\n";
        assert!(Dataset::from_reader(ragged.as_bytes(), "target").is_err());

        let empty = "a,target\n";
        assert!(Dataset::from_reader(empty.as_bytes(), "target").is_err());

        let label_only = "target\n1\n";
        assert!(Dataset::from_reader(label_only.as_bytes(), "target").is_err());

        let non_finite = "a,b,target\n3,3,0\nnan,1,0\ninf,2,1\n";
        match Dataset::from_reader(non_finite.as_bytes(), "target") {
            Err(TrainerError::DataLoad(msg)) => {
                assert!(msg.contains("line 3"), "{msg}");
                assert!(msg.contains("`a`"), "{msg}");
            }
            other => panic!("expected data load error, got {other:?}"),
        }
        for cell in ["-inf", "NaN", "infinity"] {
            let csv = format!("a,target\n{cell},1\n");
            assert!(Dataset::from_reader(csv.as_bytes(), "target").is_err(), "{cell}");
        }
    }

    #[test]
    fn test_split_sizes_and_determinism() -> anyhow::Result<()> {
        let mut csv = String::from("x,target\n");
        for i in 0..10 {
            csv.push_str(&format!("{},{}\n", i, i % 2));
        }
        let dataset = Dataset::from_reader(csv.as_bytes(), "target")?;

        let (train, test) = dataset.train_test_split(0.2, 42)?;
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);

        let (train2, test2) = dataset.train_test_split(0.2, 42)?;
        assert_eq!(train, train2);
        assert_eq!(test, test2);

        let mut all: Vec<f64> = train
            .features
            .iter()
            .chain(&test.features)
            .map(|r| r[0])
            .collect();
        all.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(all, (0..10).map(|i| i as f64).collect::<Vec<_>>());

        assert!(dataset.train_test_split(0.0, 42).is_err());
        assert!(dataset.train_test_split(1.0, 42).is_err());
        Ok(())
    }

    #[test]
    fn test_feature_stats() -> anyhow::Result<()> {
        let file = create_test_csv()?;
        let dataset = Dataset::from_csv(file.path(), "Outcome")?;

        let stats = dataset.feature_stats();
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].min, 85.0);
        assert_eq!(stats[0].max, 183.0);
        assert!((stats[2].mean - 113.0 / 3.0).abs() < 1e-12);

        Ok(())
    }
}
