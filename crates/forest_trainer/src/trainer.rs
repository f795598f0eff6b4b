//! Random-forest trainer
//!
//! Grows `tree_count` CART trees, each on its own bootstrap sample with a
//! per-tree RNG derived from the base seed. Given the same rows, labels and
//! parameters, training always yields the same forest.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wellness_forest_core::ForestModel;

use crate::cart::{CartBuilder, TreeConfig};
use crate::deterministic::{derive_seed, LcgRng};
use crate::errors::TrainerError;

/// Number of features drawn per split
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// `max(1, floor(sqrt(p)))`
    Sqrt,
    /// `max(1, floor(log2(p)))`
    Log2,
    /// Every feature
    All,
    /// A fixed count, capped at `p`
    Count(usize),
}

impl MaxFeatures {
    pub fn resolve(self, feature_count: usize) -> usize {
        let n = match self {
            MaxFeatures::Sqrt => (feature_count as f64).sqrt().floor() as usize,
            MaxFeatures::Log2 => (feature_count as f64).log2().floor() as usize,
            MaxFeatures::All => feature_count,
            MaxFeatures::Count(n) => n.min(feature_count),
        };
        n.max(1)
    }
}

/// Forest training configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    pub tree_count: usize,
    /// Reproducibility seed; not security relevant
    pub seed: u64,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            tree_count: 200,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
        }
    }
}

impl ForestParams {
    pub fn validate(&self) -> Result<(), TrainerError> {
        if self.tree_count == 0 {
            return Err(TrainerError::Training("tree_count must be at least 1".into()));
        }
        if self.min_samples_split < 2 {
            return Err(TrainerError::Training(
                "min_samples_split must be at least 2".into(),
            ));
        }
        if self.min_samples_leaf < 1 {
            return Err(TrainerError::Training(
                "min_samples_leaf must be at least 1".into(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(TrainerError::Training("max_depth must be at least 1".into()));
        }
        Ok(())
    }
}

/// Random-forest trainer
pub struct ForestTrainer {
    params: ForestParams,
}

impl ForestTrainer {
    pub fn new(params: ForestParams) -> Self {
        Self { params }
    }

    /// Train a forest on scaled rows and 0/1 labels
    pub fn train(&self, rows: &[Vec<f64>], labels: &[u8]) -> Result<ForestModel, TrainerError> {
        self.params.validate()?;

        if rows.is_empty() {
            return Err(TrainerError::Training("training set is empty".into()));
        }
        if rows.len() != labels.len() {
            return Err(TrainerError::Training(format!(
                "{} rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }
        let feature_count = rows[0].len();
        if feature_count == 0 || rows.iter().any(|r| r.len() != feature_count) {
            return Err(TrainerError::Training(
                "rows must share a non-zero width".into(),
            ));
        }
        if let Some(bad) = labels.iter().find(|&&l| l > 1) {
            return Err(TrainerError::Training(format!(
                "labels must be 0 or 1, got {}",
                bad
            )));
        }

        let tree_config = TreeConfig {
            max_depth: self.params.max_depth,
            min_samples_split: self.params.min_samples_split,
            min_samples_leaf: self.params.min_samples_leaf,
            max_features: self.params.max_features.resolve(feature_count),
        };

        info!(
            samples = rows.len(),
            features = feature_count,
            trees = self.params.tree_count,
            max_features = tree_config.max_features,
            seed = self.params.seed,
            "training random forest"
        );

        let mut trees = Vec::with_capacity(self.params.tree_count);
        for tree_idx in 0..self.params.tree_count {
            let mut rng = LcgRng::new(derive_seed(self.params.seed, tree_idx as u64));
            let weights = self.sample_weights(rows.len(), &mut rng);

            let tree = CartBuilder::new(rows, labels, weights, tree_config.clone()).build(&mut rng);
            debug!(
                tree = tree_idx + 1,
                nodes = tree.nodes.len(),
                depth = tree.depth(),
                "tree trained"
            );
            trees.push(tree);
        }

        let model = ForestModel::new(trees, feature_count)?;
        info!(
            trees = model.num_trees(),
            max_depth = model.max_depth(),
            "training complete"
        );
        Ok(model)
    }

    /// Bootstrap draw counts per row, or all ones without bootstrapping
    fn sample_weights(&self, n: usize, rng: &mut LcgRng) -> Vec<f64> {
        if !self.params.bootstrap {
            return vec![1.0; n];
        }
        let mut weights = vec![0.0; n];
        for _ in 0..n {
            weights[rng.next_range(n)] += 1.0;
        }
        weights
    }
}
