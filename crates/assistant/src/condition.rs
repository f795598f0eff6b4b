//! Per-condition modelling pipeline
//!
//! A [`ConditionModel`] is built once from a labelled dataset: split,
//! fit the scaler on the training rows, train the forest on scaled rows,
//! report on the held-out rows, then derive the explainer. The order is
//! fixed; each step consumes the previous one's output.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wellness_forest_core::{
    evaluate, ClassificationReport, FeatureMap, FeatureSchema, ForestModel, ModelError,
    Prediction, ScalingParameters, StandardScaler, TreeExplainer, ZeroVariancePolicy,
};
use wellness_forest_trainer::{Dataset, ForestParams, ForestTrainer, TrainerError};

/// One of the three modelled conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Diabetes,
    Heart,
    Hypertension,
}

impl Condition {
    pub const ALL: [Condition; 3] = [
        Condition::Diabetes,
        Condition::Heart,
        Condition::Hypertension,
    ];

    /// Key used in configuration and JSON output
    pub fn key(self) -> &'static str {
        match self {
            Condition::Diabetes => "diabetes",
            Condition::Heart => "heart",
            Condition::Hypertension => "hypertension",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Condition::Diabetes => "Diabetes",
            Condition::Heart => "Heart Disease",
            Condition::Hypertension => "Hypertension",
        }
    }

    pub fn default_label_column(self) -> &'static str {
        match self {
            Condition::Diabetes => "Outcome",
            Condition::Heart | Condition::Hypertension => "target",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Training settings shared by all condition models
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub forest: ForestParams,
    pub test_fraction: f64,
    pub split_seed: u64,
    pub zero_variance: ZeroVariancePolicy,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            forest: ForestParams::default(),
            test_fraction: 0.2,
            split_seed: 42,
            zero_variance: ZeroVariancePolicy::UnitScale,
        }
    }
}

/// Attribution of one prediction, ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub feature_names: Vec<String>,
    /// Aligned with `feature_names`
    pub contributions: Vec<f64>,
    pub baseline: f64,
    /// Unscaled input values, aligned with `feature_names`
    pub display_values: Vec<f64>,
}

impl Explanation {
    /// `baseline + sum(contributions)`, the explained probability
    pub fn raw_output(&self) -> f64 {
        self.baseline + self.contributions.iter().sum::<f64>()
    }

    /// (feature, contribution) pairs sorted by descending magnitude
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut pairs: Vec<(&str, f64)> = self
            .feature_names
            .iter()
            .map(String::as_str)
            .zip(self.contributions.iter().copied())
            .collect();
        pairs.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
        pairs
    }
}

/// Trained pipeline for one condition; immutable after construction
#[derive(Debug, Clone)]
pub struct ConditionModel {
    condition: Condition,
    schema: FeatureSchema,
    scaling: ScalingParameters,
    model: Arc<ForestModel>,
    explainer: TreeExplainer,
    report: ClassificationReport,
}

impl ConditionModel {
    /// Load `path` and train
    pub fn from_csv(
        condition: Condition,
        path: &Path,
        label_column: &str,
        settings: &ModelSettings,
    ) -> Result<Self, TrainerError> {
        info!(%condition, path = %path.display(), "loading dataset");
        let dataset = Dataset::from_csv(path, label_column)?;
        Self::train(condition, &dataset, settings)
    }

    /// Split, scale, train, evaluate and build the explainer
    pub fn train(
        condition: Condition,
        dataset: &Dataset,
        settings: &ModelSettings,
    ) -> Result<Self, TrainerError> {
        info!(
            %condition,
            samples = dataset.len(),
            features = dataset.feature_count(),
            positive_rate = dataset.positive_rate(),
            "training condition model"
        );
        for (name, stats) in dataset.feature_names.iter().zip(dataset.feature_stats()) {
            debug!(feature = %name, min = stats.min, max = stats.max, mean = stats.mean);
        }

        let schema = FeatureSchema::new(dataset.feature_names.clone())?;
        let (train, test) = dataset.train_test_split(settings.test_fraction, settings.split_seed)?;

        let scaling = StandardScaler::fit(&schema, &train.features, settings.zero_variance)?;
        let train_rows = scaling.transform_rows(&train.features)?;
        let model = ForestTrainer::new(settings.forest.clone()).train(&train_rows, &train.labels)?;

        let test_rows = scaling.transform_rows(&test.features)?;
        let report = evaluate(&model, &test_rows, &test.labels)?;
        info!("Model Performance for {}:\n{}", condition, report);

        let model = Arc::new(model);
        let explainer = TreeExplainer::build(model.clone());

        Ok(Self {
            condition,
            schema,
            scaling,
            model,
            explainer,
            report,
        })
    }

    /// Re-key a raw record into the model's feature order
    pub fn align(&self, raw: &FeatureMap) -> Result<Vec<f64>, ModelError> {
        self.schema.align(raw)
    }

    /// Risk label and positive-class probability for a raw record
    pub fn predict(&self, raw: &FeatureMap) -> Result<Prediction, ModelError> {
        let aligned = self.align(raw)?;
        let scaled = self.scaling.transform(&aligned)?;
        self.model.predict(&scaled)
    }

    /// Additive attribution of the probability for a raw record
    pub fn explain(&self, raw: &FeatureMap) -> Result<Explanation, ModelError> {
        let aligned = self.align(raw)?;
        let scaled = self.scaling.transform(&aligned)?;
        let attribution = self.explainer.explain(&scaled)?;

        Ok(Explanation {
            feature_names: self.schema.names().to_vec(),
            contributions: attribution.contributions,
            baseline: attribution.baseline,
            display_values: aligned,
        })
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn feature_names(&self) -> &[String] {
        self.schema.names()
    }

    /// Baseline of the positive-class channel
    pub fn expected_value(&self) -> f64 {
        self.explainer.expected_value()
    }

    pub fn forest(&self) -> &ForestModel {
        &self.model
    }

    /// Held-out classification report from training time
    pub fn report(&self) -> &ClassificationReport {
        &self.report
    }

    /// Blake3 fingerprint of the trained forest
    pub fn fingerprint(&self) -> Result<String, ModelError> {
        self.model.hash_hex()
    }
}
