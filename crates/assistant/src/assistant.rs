//! Wellness orchestrator
//!
//! Holds the three condition models and runs each assessment pipeline
//! independently: a failure in one condition is reported without
//! preventing the other two from being assessed.

use serde::Serialize;
use tracing::{debug, info, warn};
use wellness_forest_core::{FeatureMap, ModelError};

use crate::condition::{Condition, ConditionModel, Explanation};
use crate::config::WellnessConfig;
use crate::errors::{AssessmentError, ConditionError, StartupError};
use crate::recommendations::recommendations_for;
use crate::records::{validate_ranges, DiabetesInput, HeartInput, HypertensionInput};

/// Result of assessing one condition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionAssessment {
    pub condition: Condition,
    pub label: u8,
    pub probability: f64,
    pub recommendations: Vec<String>,
    pub attribution: Explanation,
}

/// Combined result for all three conditions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub diabetes: ConditionAssessment,
    pub heart: ConditionAssessment,
    pub hypertension: ConditionAssessment,
}

impl Assessment {
    pub fn get(&self, condition: Condition) -> &ConditionAssessment {
        match condition {
            Condition::Diabetes => &self.diabetes,
            Condition::Heart => &self.heart,
            Condition::Hypertension => &self.hypertension,
        }
    }
}

/// Per-condition outcomes, each independent of the others
#[derive(Debug)]
pub struct ConditionOutcomes {
    pub diabetes: Result<ConditionAssessment, ConditionError>,
    pub heart: Result<ConditionAssessment, ConditionError>,
    pub hypertension: Result<ConditionAssessment, ConditionError>,
}

impl ConditionOutcomes {
    pub fn is_complete(&self) -> bool {
        self.diabetes.is_ok() && self.heart.is_ok() && self.hypertension.is_ok()
    }

    /// All three assessments, or every failure with its cause
    pub fn into_result(self) -> Result<Assessment, AssessmentError> {
        match (self.diabetes, self.heart, self.hypertension) {
            (Ok(diabetes), Ok(heart), Ok(hypertension)) => Ok(Assessment {
                diabetes,
                heart,
                hypertension,
            }),
            (d, h, ht) => Err(AssessmentError {
                failures: [d.err(), h.err(), ht.err()].into_iter().flatten().collect(),
            }),
        }
    }
}

/// Immutable assistant context built once at startup
#[derive(Debug, Clone)]
pub struct WellnessAssistant {
    diabetes: ConditionModel,
    heart: ConditionModel,
    hypertension: ConditionModel,
}

impl WellnessAssistant {
    pub fn new(
        diabetes: ConditionModel,
        heart: ConditionModel,
        hypertension: ConditionModel,
    ) -> Self {
        Self {
            diabetes,
            heart,
            hypertension,
        }
    }

    /// Train all three models from the configured datasets
    pub fn from_config(config: &WellnessConfig) -> Result<Self, StartupError> {
        let settings = config.settings();
        let build = |condition: Condition| {
            let source = config.datasets.source(condition);
            ConditionModel::from_csv(
                condition,
                &config.datasets.path_for(condition),
                &source.label_column,
                &settings,
            )
            .map_err(|source| StartupError { condition, source })
        };

        let assistant = Self::new(
            build(Condition::Diabetes)?,
            build(Condition::Heart)?,
            build(Condition::Hypertension)?,
        );
        info!("wellness assistant ready");
        Ok(assistant)
    }

    pub fn model(&self, condition: Condition) -> &ConditionModel {
        match condition {
            Condition::Diabetes => &self.diabetes,
            Condition::Heart => &self.heart,
            Condition::Hypertension => &self.hypertension,
        }
    }

    /// Predict, recommend and explain for one condition
    pub fn assess_condition(
        &self,
        condition: Condition,
        raw: &FeatureMap,
    ) -> Result<ConditionAssessment, ConditionError> {
        let scoped = |source: ModelError| ConditionError { condition, source };
        let model = self.model(condition);

        let out_of_range = validate_ranges(condition, raw);
        if !out_of_range.is_empty() {
            warn!(%condition, fields = ?out_of_range, "input outside expected range");
        }

        let prediction = model.predict(raw).map_err(scoped)?;
        let attribution = model.explain(raw).map_err(scoped)?;
        let recommendations = recommendations_for(condition, raw, prediction.label);
        debug!(
            %condition,
            label = prediction.label,
            probability = prediction.probability,
            "assessed"
        );

        Ok(ConditionAssessment {
            condition,
            label: prediction.label,
            probability: prediction.probability,
            recommendations,
            attribution,
        })
    }

    /// Run all three pipelines, keeping each outcome separate
    pub fn assess_each(
        &self,
        diabetes: &FeatureMap,
        heart: &FeatureMap,
        hypertension: &FeatureMap,
    ) -> ConditionOutcomes {
        ConditionOutcomes {
            diabetes: self.assess_condition(Condition::Diabetes, diabetes),
            heart: self.assess_condition(Condition::Heart, heart),
            hypertension: self.assess_condition(Condition::Hypertension, hypertension),
        }
    }

    pub fn assess(
        &self,
        diabetes: &FeatureMap,
        heart: &FeatureMap,
        hypertension: &FeatureMap,
    ) -> Result<Assessment, AssessmentError> {
        self.assess_each(diabetes, heart, hypertension).into_result()
    }

    pub fn assess_records(
        &self,
        diabetes: &DiabetesInput,
        heart: &HeartInput,
        hypertension: &HypertensionInput,
    ) -> Result<Assessment, AssessmentError> {
        self.assess(&diabetes.into(), &heart.into(), &hypertension.into())
    }
}
